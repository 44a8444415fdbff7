//! Input validation gate for the analyze action.

use serde::Serialize;

/// Minimum job-description length, in characters, before analysis is allowed.
pub const MIN_JOB_DESCRIPTION_CHARS: usize = 100;

/// Why the analyze action is disabled. Only one reason is ever reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisabledReason {
    MissingInputs,
    MissingResume,
    JobDescriptionTooShort { current: usize },
}

impl DisabledReason {
    pub fn message(&self) -> String {
        match self {
            DisabledReason::MissingInputs => {
                "Upload your resume and paste a job description to get started.".to_string()
            }
            DisabledReason::MissingResume => "Upload your resume to continue.".to_string(),
            DisabledReason::JobDescriptionTooShort { current } => format!(
                "Job description must be at least {MIN_JOB_DESCRIPTION_CHARS} characters ({current}/{MIN_JOB_DESCRIPTION_CHARS})."
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateState {
    pub enabled: bool,
    pub in_flight: bool,
    pub reason: Option<DisabledReason>,
    /// Human-readable text for the disabled state, or the busy label.
    pub hint: Option<String>,
}

/// Checks only the inputs; `None` means both are acceptable.
pub fn input_problem(resume_text: &str, job_description: &str) -> Option<DisabledReason> {
    let has_resume = !resume_text.is_empty();
    let jd_len = job_description.chars().count();
    let jd_long_enough = jd_len >= MIN_JOB_DESCRIPTION_CHARS;

    match (has_resume, jd_long_enough) {
        (true, true) => None,
        (false, false) => Some(DisabledReason::MissingInputs),
        (false, true) => Some(DisabledReason::MissingResume),
        (true, false) => Some(DisabledReason::JobDescriptionTooShort { current: jd_len }),
    }
}

pub fn evaluate(resume_text: &str, job_description: &str, in_flight: bool) -> GateState {
    let reason = input_problem(resume_text, job_description);
    let hint = match (&reason, in_flight) {
        (Some(r), _) => Some(r.message()),
        (None, true) => Some("Analyzing...".to_string()),
        (None, false) => None,
    };

    GateState {
        enabled: reason.is_none() && !in_flight,
        in_flight,
        reason,
        hint,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jd(len: usize) -> String {
        "x".repeat(len)
    }

    #[test]
    fn test_enabled_when_inputs_valid_and_idle() {
        let state = evaluate("resume", &jd(100), false);
        assert!(state.enabled);
        assert_eq!(state.reason, None);
        assert_eq!(state.hint, None);
    }

    #[test]
    fn test_both_missing_reports_generic_prompt() {
        let state = evaluate("", &jd(10), false);
        assert!(!state.enabled);
        assert_eq!(state.reason, Some(DisabledReason::MissingInputs));
    }

    #[test]
    fn test_missing_resume_with_long_jd() {
        let state = evaluate("", &jd(250), false);
        assert_eq!(state.reason, Some(DisabledReason::MissingResume));
    }

    #[test]
    fn test_short_jd_reports_length_with_count() {
        let state = evaluate("resume", &jd(99), false);
        assert!(!state.enabled);
        assert_eq!(
            state.reason,
            Some(DisabledReason::JobDescriptionTooShort { current: 99 })
        );
        assert!(state.hint.unwrap().contains("99/100"));
    }

    #[test]
    fn test_every_failing_input_is_disabled() {
        for resume in ["", "r"] {
            for len in [0, 1, 50, 99, 100, 101] {
                let state = evaluate(resume, &jd(len), false);
                let should_enable = !resume.is_empty() && len >= 100;
                assert_eq!(state.enabled, should_enable, "resume={resume:?} len={len}");
                assert_eq!(state.reason.is_none(), should_enable);
            }
        }
    }

    #[test]
    fn test_in_flight_disables_without_input_reason() {
        let state = evaluate("resume", &jd(120), true);
        assert!(!state.enabled);
        assert_eq!(state.reason, None);
        assert_eq!(state.hint.as_deref(), Some("Analyzing..."));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let state = evaluate("resume", &"é".repeat(100), false);
        assert!(state.enabled);
    }
}
