//! ATS evaluation and scoring: builds the request context, calls the model and
//! turns the reply into an `AtsResult`.

use tracing::{info, warn};

use crate::ats::extract::{extract_percentage, to_match_score};
use crate::ats::insights::parse_insights;
use crate::ats::prompts::{ats_score_instruction, EVALUATION_INSTRUCTION};
use crate::errors::AppError;
use crate::generation::orchestrator::{flatten_fields, generate};
use crate::llm_client::TextCompleter;
use crate::models::ats::{AtsResult, InsightsStatus};

/// Reply text plus everything parsed out of it.
#[derive(Debug, Clone)]
pub struct ScoredReply {
    pub raw_response: String,
    pub result: AtsResult,
    /// Shown to the user next to the score; empty when parsing went cleanly.
    pub warnings: Vec<String>,
}

/// Context block for both ATS calls. The uploaded file is identified by name;
/// recovered text is appended when extraction succeeded.
pub fn evaluation_context(file_name: &str, job_description: &str, resume_text: Option<&str>) -> String {
    let mut entries = vec![("Resume", file_name), ("Job Description", job_description)];
    if let Some(text) = resume_text.filter(|t| !t.trim().is_empty()) {
        entries.push(("Resume Text", text));
    }
    flatten_fields(entries)
}

/// Parses a score reply. Never fails: a missing percentage scores 0 and a
/// missing JSON block leaves the structured fields empty, each with a warning.
pub fn build_result(raw: &str) -> (AtsResult, Vec<String>) {
    let mut warnings = Vec::new();

    let match_score = match extract_percentage(raw) {
        Ok(value) => to_match_score(value),
        Err(e) => {
            warn!("Score extraction failed: {e}");
            warnings.push(e.to_string());
            0
        }
    };

    let result = match parse_insights(raw) {
        Ok(insights) => AtsResult {
            match_score,
            missing_skills: insights.missing_skills,
            present_skills: insights.present_skills,
            keyword_match: insights.keyword_match,
            experience_timeline: insights.experience_timeline,
            competencies: insights.competencies,
            insights: InsightsStatus::Parsed,
        },
        Err(e) => {
            warn!("Structured insights unavailable: {e}");
            warnings.push(format!("Detailed insights are unavailable: {e}."));
            AtsResult::score_only(match_score, e.to_string())
        }
    };

    (result, warnings)
}

/// Hire / no-hire narrative. The reply is returned as-is.
pub async fn evaluate_resume(completer: &dyn TextCompleter, context: &str) -> Result<String, AppError> {
    generate(completer, context, EVALUATION_INSTRUCTION).await
}

pub async fn score_resume(completer: &dyn TextCompleter, context: &str) -> Result<ScoredReply, AppError> {
    let raw_response = generate(completer, context, &ats_score_instruction()).await?;
    let (result, warnings) = build_result(&raw_response);
    info!(
        "ATS score computed: match_score={}, warnings={}",
        result.match_score,
        warnings.len()
    );
    Ok(ScoredReply {
        raw_response,
        result,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use async_trait::async_trait;

    struct FixedReply(&'static str);

    #[async_trait]
    impl TextCompleter for FixedReply {
        async fn complete(&self, _context: &str, _instruction: &str) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    struct Unreachable;

    #[async_trait]
    impl TextCompleter for Unreachable {
        async fn complete(&self, _context: &str, _instruction: &str) -> Result<String, LlmError> {
            Err(LlmError::Api {
                status: 503,
                message: "service unavailable".to_string(),
            })
        }
    }

    #[test]
    fn test_evaluation_context_lists_entries_in_order() {
        let ctx = evaluation_context("cv.pdf", "Rust engineer", None);
        assert_eq!(ctx, "Resume: cv.pdf\nJob Description: Rust engineer");

        let ctx = evaluation_context("cv.pdf", "Rust engineer", Some("Ada Lovelace"));
        assert!(ctx.ends_with("\nResume Text: Ada Lovelace"));

        let ctx = evaluation_context("cv.pdf", "Rust engineer", Some("  "));
        assert!(!ctx.contains("Resume Text"));
    }

    #[test]
    fn test_build_result_without_percentage_scores_zero_with_warning() {
        let (result, warnings) = build_result("Looks like a decent fit.");
        assert_eq!(result.match_score, 0);
        assert_eq!(warnings[0], "No percentage score found in the response.");
        assert!(matches!(result.insights, InsightsStatus::Unavailable { .. }));
    }

    #[test]
    fn test_build_result_with_block_is_parsed() {
        let raw = "Match: 81%\n```json\n{\"present_skills\": [\"Rust\"], \"keyword_match\": {\"Rust\": 3}}\n```";
        let (result, warnings) = build_result(raw);
        assert!(warnings.is_empty());
        assert_eq!(result.match_score, 81);
        assert_eq!(result.insights, InsightsStatus::Parsed);
        assert_eq!(result.keyword_match.get("Rust"), Some(&3));
    }

    #[test]
    fn test_build_result_clamps_score() {
        let (result, _) = build_result("Fit: 140% {}");
        assert_eq!(result.match_score, 100);
    }

    #[tokio::test]
    async fn test_score_resume_keeps_raw_reply() {
        let completer = FixedReply("Match: 64%");
        let scored = score_resume(&completer, "Resume: cv.pdf").await.unwrap();
        assert_eq!(scored.raw_response, "Match: 64%");
        assert_eq!(scored.result.match_score, 64);
        assert_eq!(scored.warnings.len(), 1, "missing JSON block is reported");
    }

    #[tokio::test]
    async fn test_model_failure_is_llm_error() {
        let err = evaluate_resume(&Unreachable, "ctx").await.unwrap_err();
        assert!(matches!(err, AppError::Llm(msg) if msg.contains("service unavailable")));
    }
}
