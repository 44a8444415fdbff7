//! Result renderer: maps an `AnalysisResult` to a deterministic view model.
//!
//! The JSON API returns `ResultView` directly; `html` turns the same view into
//! the fragment the page shell injects.

pub mod html;

use serde::Serialize;

use crate::analysis::models::{AnalysisResult, NoteKind, TokenUsage};
use crate::analysis::pricing::{estimate_cost, format_cost, CURRENCY_SYMBOL};

pub const NO_MATCHED_SKILLS: &str = "No matching skills were found in your resume.";
pub const NO_MISSING_SKILLS: &str =
    "No missing skills. Your resume covers everything this job asks for.";
pub const NO_SUGGESTIONS: &str = "No rewrite suggestions for this job description.";

const WARNING_TITLE: &str = "Review these notes before relying on the results";
const SUCCESS_TITLE: &str = "Analysis completed with no ambiguities";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerKind {
    Success,
    Warning,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoteLine {
    pub kind: NoteKind,
    pub quoted: String,
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Banner {
    pub kind: BannerKind,
    pub title: &'static str,
    pub notes: Vec<NoteLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillList {
    pub items: Vec<String>,
    /// Set only when `items` is empty.
    pub fallback: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuggestionItem {
    pub index: usize,
    pub original: String,
    pub suggested: String,
    pub copied: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Suggestions {
    pub items: Vec<SuggestionItem>,
    pub fallback: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CostLine {
    pub currency: &'static str,
    /// Four decimal places, e.g. `"0.0383"`.
    pub amount: String,
    pub estimate: f64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
}

impl CostLine {
    fn from_usage(usage: &TokenUsage) -> Self {
        Self {
            currency: CURRENCY_SYMBOL,
            amount: format_cost(usage),
            estimate: estimate_cost(usage),
            input_tokens: usage.input,
            output_tokens: usage.output,
            total_tokens: usage.total,
        }
    }

    pub fn text(&self) -> String {
        format!(
            "Estimated cost: {}{} ({} input + {} output = {} tokens)",
            self.currency, self.amount, self.input_tokens, self.output_tokens, self.total_tokens
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultView {
    pub banner: Banner,
    pub matched: SkillList,
    pub missing: SkillList,
    pub suggestions: Suggestions,
    pub cost: Option<CostLine>,
    /// Bring the results region into view (smooth scroll) on first display.
    pub scroll_into_view: bool,
}

fn skill_list(items: &[String], fallback: &'static str) -> SkillList {
    SkillList {
        items: items.to_vec(),
        fallback: items.is_empty().then_some(fallback),
    }
}

pub fn build_view(
    result: &AnalysisResult,
    copied_index: Option<usize>,
    scroll_into_view: bool,
) -> ResultView {
    let notes: Vec<NoteLine> = result
        .notes()
        .iter()
        .map(|n| NoteLine {
            kind: n.kind,
            quoted: n.text.clone(),
            explanation: n.note.clone(),
        })
        .collect();

    let banner = if notes.is_empty() {
        Banner {
            kind: BannerKind::Success,
            title: SUCCESS_TITLE,
            notes,
        }
    } else {
        Banner {
            kind: BannerKind::Warning,
            title: WARNING_TITLE,
            notes,
        }
    };

    let items: Vec<SuggestionItem> = result
        .suggestions()
        .iter()
        .enumerate()
        .map(|(index, s)| SuggestionItem {
            index,
            original: s.original_text.clone(),
            suggested: s.suggested_rewrite.clone(),
            copied: copied_index == Some(index),
        })
        .collect();

    ResultView {
        banner,
        matched: skill_list(&result.matched_skills, NO_MATCHED_SKILLS),
        missing: skill_list(&result.missing_skills, NO_MISSING_SKILLS),
        suggestions: Suggestions {
            fallback: items.is_empty().then_some(NO_SUGGESTIONS),
            items,
        },
        cost: result.usage.as_ref().map(CostLine::from_usage),
        scroll_into_view,
    }
}
