//! Analysis orchestrator: the state machine behind the analyze button.
//!
//! One `AnalysisSession` per open page. It owns the form inputs, the in-flight
//! flag and the current result. `analyze` makes exactly one remote call and
//! turns every outcome into a notification; errors never escape it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::client::{run_analysis, AnalysisFunction};
use super::models::{AnalysisRequest, AnalysisResult};
use crate::ui::gate::{self, GateState};
use crate::ui::lock;
use crate::ui::notify::{Notification, Notifier};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormInputs {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub company_name: Option<String>,
}

impl FormInputs {
    fn to_request(&self) -> AnalysisRequest {
        AnalysisRequest::new(
            &self.resume_text,
            &self.job_description,
            self.company_name.as_deref(),
        )
    }
}

/// Clears the in-flight flag however the analyze future ends: success,
/// handled error, panic, or being dropped mid-await.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug, Default)]
pub struct AnalysisSession {
    inputs: Mutex<FormInputs>,
    in_flight: AtomicBool,
    result: Mutex<Option<AnalysisResult>>,
    scroll_pending: AtomicBool,
}

impl AnalysisSession {
    pub fn set_inputs(&self, inputs: FormInputs) {
        *lock(&self.inputs) = inputs;
    }

    pub fn inputs(&self) -> FormInputs {
        lock(&self.inputs).clone()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn gate(&self) -> GateState {
        let inputs = lock(&self.inputs);
        gate::evaluate(
            &inputs.resume_text,
            &inputs.job_description,
            self.is_in_flight(),
        )
    }

    pub fn result(&self) -> Option<AnalysisResult> {
        lock(&self.result).clone()
    }

    /// Whether the results region still needs to be scrolled into view.
    pub fn scroll_requested(&self) -> bool {
        self.scroll_pending.load(Ordering::Acquire)
    }

    /// True exactly once after each successful analysis.
    pub fn take_scroll_request(&self) -> bool {
        self.scroll_pending.swap(false, Ordering::AcqRel)
    }

    fn begin(&self) -> Option<InFlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(&self.in_flight))
    }

    fn store_result(&self, result: Option<AnalysisResult>) {
        *lock(&self.result) = result;
    }

    /// Runs one analysis with the current inputs.
    ///
    /// Does not re-check the gate; callers do that. Returns `None` when a
    /// request is already in flight or when the attempt failed (the failure
    /// has been reported through `notifier`).
    pub async fn analyze(
        &self,
        function: &dyn AnalysisFunction,
        notifier: &dyn Notifier,
    ) -> Option<AnalysisResult> {
        let Some(_guard) = self.begin() else {
            debug!("Analyze ignored: a request is already in flight");
            return None;
        };

        self.store_result(None);
        self.scroll_pending.store(false, Ordering::Release);
        let request = self.inputs().to_request();

        info!(
            resume_chars = request.resume_text.chars().count(),
            jd_chars = request.job_description.chars().count(),
            has_company = !request.company_name.is_empty(),
            "Submitting analysis request"
        );

        match run_analysis(function, &request).await {
            Ok(result) => {
                notifier.notify(Notification::success(
                    "Analysis complete",
                    format!(
                        "Found {} matching skills and {} missing skills.",
                        result.matched_skills.len(),
                        result.missing_skills.len()
                    ),
                ));
                self.store_result(Some(result.clone()));
                self.scroll_pending.store(true, Ordering::Release);
                Some(result)
            }
            Err(e) => {
                notifier.notify(Notification::error(e.title(), e.to_string()));
                None
            }
        }
    }
}
