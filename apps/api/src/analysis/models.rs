//! Wire types exchanged with the remote analysis function.

use serde::{Deserialize, Serialize};

/// Request body sent to the analysis function. Built right before submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub resume_text: String,
    pub job_description: String,
    /// Sent as `""` when the user leaves the field blank.
    pub company_name: String,
}

impl AnalysisRequest {
    pub fn new(resume_text: &str, job_description: &str, company_name: Option<&str>) -> Self {
        Self {
            resume_text: resume_text.to_string(),
            job_description: job_description.to_string(),
            company_name: company_name.unwrap_or_default().to_string(),
        }
    }
}

/// Structured skills-match report returned by the analysis function.
///
/// The skill lists default to empty so a payload that omits them still
/// decodes; every other optional section renders a fallback when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(rename = "matchedSkills", default)]
    pub matched_skills: Vec<String>,
    #[serde(rename = "missingSkills", default)]
    pub missing_skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewrite_suggestions: Option<Vec<RewriteSuggestion>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_notes: Option<Vec<AnalysisNote>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

impl AnalysisResult {
    pub fn suggestions(&self) -> &[RewriteSuggestion] {
        self.rewrite_suggestions.as_deref().unwrap_or_default()
    }

    pub fn notes(&self) -> &[AnalysisNote] {
        self.analysis_notes.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewriteSuggestion {
    pub original_text: String,
    pub suggested_rewrite: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    Ambiguity,
    Warning,
}

/// A flagged ambiguity or warning about the analysis's own confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisNote {
    #[serde(rename = "type")]
    pub kind: NoteKind,
    /// The quoted fragment the note refers to.
    pub text: String,
    /// Explanation of why the fragment was flagged.
    pub note: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input: u64,
    pub output: u64,
    pub total: u64,
}
