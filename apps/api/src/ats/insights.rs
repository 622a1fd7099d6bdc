//! Structured insight parsing for ATS score replies.
//!
//! The score instruction asks the model to end its reply with a fenced JSON
//! object. This module finds that object and turns it into typed fields. It
//! never invents values: a reply without a parsable object yields an error and
//! the caller stores empty fields marked as unavailable. Inside a parsed object
//! a badly typed field empties only itself.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::models::ats::{CompetencyScore, TimelineEntry, COMPETENCY_AXES};

#[derive(Debug, Error)]
pub enum InsightsError {
    #[error("reply contains no JSON block")]
    NoBlock,

    #[error("JSON block is invalid: {0}")]
    Invalid(#[from] serde_json::Error),

    #[error("JSON block is not an object")]
    NotObject,
}

/// Fields recovered from the reply's JSON block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredInsights {
    pub missing_skills: BTreeSet<String>,
    pub present_skills: BTreeSet<String>,
    pub keyword_match: BTreeMap<String, u32>,
    pub experience_timeline: Vec<TimelineEntry>,
    pub competencies: Option<Vec<CompetencyScore>>,
}

// ────────────────────────────────────────────────────────────────────────────
// Field readers
//
// Each field is read on its own from the parsed object. A field with an
// unexpected shape comes back empty; entries that cannot be read are skipped.
// ────────────────────────────────────────────────────────────────────────────

/// Text of a string or number value. Numbers print without a fraction when whole.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        }),
        _ => None,
    }
}

/// A non-negative finite number, given as a JSON number or a numeric string.
fn scalar_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (n.is_finite() && n >= 0.0).then_some(n)
}

fn string_set(value: Option<&Value>) -> BTreeSet<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
        Some(other) => {
            warn!("Ignoring skill list of unexpected shape: {other}");
            BTreeSet::new()
        }
        None => BTreeSet::new(),
    }
}

/// Keyword counts; fractional counts are rounded.
fn keyword_counts(value: Option<&Value>) -> BTreeMap<String, u32> {
    match value {
        Some(Value::Object(map)) => map
            .iter()
            .filter_map(|(keyword, count)| {
                let keyword = keyword.trim();
                let count = scalar_number(count)?.round().min(u32::MAX as f64) as u32;
                (!keyword.is_empty()).then(|| (keyword.to_string(), count))
            })
            .collect(),
        Some(other) => {
            warn!("Ignoring keyword_match of unexpected shape: {other}");
            BTreeMap::new()
        }
        None => BTreeMap::new(),
    }
}

/// The timeline arrives either as `{"2020": "Job A"}` or as `[{"year", "label"}]`.
/// Years may be strings or numbers.
fn timeline(value: Option<&Value>) -> Vec<TimelineEntry> {
    match value {
        Some(Value::Object(map)) => map
            .iter()
            .filter_map(|(year, label)| {
                Some(TimelineEntry {
                    year: year.trim().to_string(),
                    label: scalar_text(label)?,
                })
            })
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| {
                Some(TimelineEntry {
                    year: scalar_text(item.get("year")?)?,
                    label: scalar_text(item.get("label")?)?,
                })
            })
            .collect(),
        Some(other) => {
            warn!("Ignoring experience_timeline of unexpected shape: {other}");
            Vec::new()
        }
        None => Vec::new(),
    }
}

/// Maps the model's competency object onto the fixed radar axes.
/// Returns `None` unless every axis is scored; scores are rounded and clamped to 1–5.
fn competency_scores(value: Option<&Value>) -> Option<Vec<CompetencyScore>> {
    let raw = value?.as_object()?;
    COMPETENCY_AXES
        .iter()
        .map(|axis| {
            raw.iter()
                .find(|(k, _)| k.trim().eq_ignore_ascii_case(axis))
                .and_then(|(_, v)| scalar_number(v))
                .map(|score| CompetencyScore {
                    axis: axis.to_string(),
                    score: score.round().clamp(1.0, 5.0) as u8,
                })
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Parsing
// ────────────────────────────────────────────────────────────────────────────

/// Locates the JSON object in a reply: the body of the last ```json fence, or
/// failing that the outermost `{ ... }` span.
fn locate_json_block(text: &str) -> Option<&str> {
    if let Some(start) = text.rfind("```json") {
        let body = &text[start + "```json".len()..];
        let body = body.find("```").map(|end| &body[..end]).unwrap_or(body);
        return Some(body.trim());
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

pub fn parse_insights(reply: &str) -> Result<StructuredInsights, InsightsError> {
    let block = locate_json_block(reply).ok_or(InsightsError::NoBlock)?;
    let value: Value = serde_json::from_str(block)?;
    let object = value.as_object().ok_or(InsightsError::NotObject)?;

    Ok(StructuredInsights {
        missing_skills: string_set(object.get("missing_skills")),
        present_skills: string_set(object.get("present_skills")),
        keyword_match: keyword_counts(object.get("keyword_match")),
        experience_timeline: timeline(object.get("experience_timeline")),
        competencies: competency_scores(object.get("competencies")),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = r#"Match: 72%

Strong backend profile, light on orchestration.

```json
{
  "match_score": 72,
  "missing_skills": ["Kubernetes", " "],
  "present_skills": ["Rust", "PostgreSQL", "Rust"],
  "keyword_match": {"Rust": 4, "distributed systems": 2},
  "experience_timeline": {"2021": "Backend Engineer at Acme", "2019": "Intern at Initech"},
  "competencies": {"communication": 4, "Technical Skills": 5, "Teamwork": 3, "Problem Solving": 4, "Creativity": 9}
}
```"#;

    #[test]
    fn test_parses_fenced_block() {
        let insights = parse_insights(REPLY).unwrap();
        assert_eq!(
            insights.missing_skills,
            BTreeSet::from(["Kubernetes".to_string()])
        );
        assert_eq!(insights.present_skills.len(), 2, "duplicates collapse");
        assert_eq!(insights.keyword_match.get("Rust"), Some(&4));
        assert_eq!(insights.experience_timeline.len(), 2);
    }

    #[test]
    fn test_competencies_follow_axis_order_and_clamp() {
        let insights = parse_insights(REPLY).unwrap();
        let scores: Vec<u8> = insights
            .competencies
            .unwrap()
            .iter()
            .map(|c| c.score)
            .collect();
        assert_eq!(scores, vec![4, 5, 3, 4, 5]);
    }

    #[test]
    fn test_partial_competencies_are_dropped() {
        let reply = r#"{"competencies": {"Communication": 4}}"#;
        let insights = parse_insights(reply).unwrap();
        assert!(insights.competencies.is_none());
    }

    #[test]
    fn test_timeline_list_form_keeps_duplicates() {
        let reply = r#"Score 60%. {"experience_timeline": [
            {"year": "2020", "label": "Job A"},
            {"year": "2020", "label": "Job B"}
        ]}"#;
        let insights = parse_insights(reply).unwrap();
        assert_eq!(insights.experience_timeline.len(), 2);
        assert_eq!(insights.experience_timeline[1].label, "Job B");
    }

    #[test]
    fn test_bare_object_without_fence() {
        let reply = r#"Overall 55%. {"present_skills": ["Go"]} Thanks!"#;
        let insights = parse_insights(reply).unwrap();
        assert!(insights.present_skills.contains("Go"));
        assert!(insights.keyword_match.is_empty());
    }

    #[test]
    fn test_reply_without_block_is_error() {
        assert!(matches!(
            parse_insights("Match: 40%. Needs more Rust."),
            Err(InsightsError::NoBlock)
        ));
    }

    #[test]
    fn test_malformed_block_is_error() {
        let reply = "```json\n{\"present_skills\": [\"Go\",]}\n```";
        assert!(matches!(parse_insights(reply), Err(InsightsError::Invalid(_))));
    }

    #[test]
    fn test_unterminated_fence_still_parses() {
        let reply = "Score 70%\n```json\n{\"missing_skills\": [\"Terraform\"]}";
        let insights = parse_insights(reply).unwrap();
        assert!(insights.missing_skills.contains("Terraform"));
    }

    #[test]
    fn test_numeric_years_in_list_timeline() {
        let reply = "Match: 70%\n```json\n{\"present_skills\":[\"Rust\",\"Go\"],\
            \"experience_timeline\":[{\"year\":2020,\"label\":\"Job A\"},{\"year\":\"2022\",\"label\":\"Job B\"}]}\n```";
        let insights = parse_insights(reply).unwrap();
        assert_eq!(insights.present_skills.len(), 2);
        assert_eq!(insights.experience_timeline[0].year, "2020");
        assert_eq!(insights.experience_timeline[1].year, "2022");
    }

    #[test]
    fn test_fractional_competencies_are_rounded() {
        let reply = r#"{"present_skills": ["Rust", "Go"], "competencies": {
            "Communication": 4.5, "Technical Skills": 3.2, "Teamwork": "4",
            "Problem Solving": 0.4, "Creativity": 2
        }}"#;
        let insights = parse_insights(reply).unwrap();
        assert_eq!(insights.present_skills.len(), 2);
        let scores: Vec<u8> = insights
            .competencies
            .unwrap()
            .iter()
            .map(|c| c.score)
            .collect();
        assert_eq!(scores, vec![5, 3, 4, 1, 2]);
    }

    #[test]
    fn test_fractional_keyword_counts_are_rounded() {
        let reply = r#"{"keyword_match": {"Rust": 2.6, "Go": "3", "SQL": -1, "AWS": null}}"#;
        let insights = parse_insights(reply).unwrap();
        assert_eq!(
            insights.keyword_match,
            BTreeMap::from([("Go".to_string(), 3), ("Rust".to_string(), 3)])
        );
    }

    #[test]
    fn test_badly_typed_field_only_drops_itself() {
        let reply = r#"{
            "present_skills": ["Rust", "Go"],
            "missing_skills": "Kubernetes",
            "keyword_match": ["Rust"],
            "experience_timeline": 2020,
            "competencies": {"Communication": "high"}
        }"#;
        let insights = parse_insights(reply).unwrap();
        assert_eq!(insights.present_skills.len(), 2);
        assert!(insights.missing_skills.is_empty());
        assert!(insights.keyword_match.is_empty());
        assert!(insights.experience_timeline.is_empty());
        assert!(insights.competencies.is_none());
    }

    #[test]
    fn test_non_object_block_is_error() {
        let reply = "```json\n[\"Rust\"]\n```";
        assert!(matches!(parse_insights(reply), Err(InsightsError::NotObject)));
    }
}
