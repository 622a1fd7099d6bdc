use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// One row of the experience timeline. Years are kept as text because the model
/// may emit ranges ("2019-2021"); duplicate years are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub year: String,
    pub label: String,
}

/// Radar axes, in display order.
pub const COMPETENCY_AXES: [&str; 5] = [
    "Communication",
    "Technical Skills",
    "Teamwork",
    "Problem Solving",
    "Creativity",
];

/// A single competency axis score on the 1–5 scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetencyScore {
    pub axis: String,
    pub score: u8,
}

/// Whether the structured fields of an `AtsResult` came from the model's reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InsightsStatus {
    Parsed,
    /// The reply carried no usable structured block; the skill, keyword and
    /// timeline fields are empty rather than filled with stand-in values.
    Unavailable { reason: String },
}

/// Outcome of one ATS scoring call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsResult {
    /// 0–100. Zero when the reply carried no usable percentage.
    pub match_score: u8,
    pub missing_skills: BTreeSet<String>,
    pub present_skills: BTreeSet<String>,
    pub keyword_match: BTreeMap<String, u32>,
    pub experience_timeline: Vec<TimelineEntry>,
    /// Present only when the model scored the competency axes itself.
    pub competencies: Option<Vec<CompetencyScore>>,
    pub insights: InsightsStatus,
}

impl AtsResult {
    /// A result carrying only a score; every structured field is empty.
    pub fn score_only(match_score: u8, reason: impl Into<String>) -> Self {
        Self {
            match_score,
            missing_skills: BTreeSet::new(),
            present_skills: BTreeSet::new(),
            keyword_match: BTreeMap::new(),
            experience_timeline: Vec::new(),
            competencies: None,
            insights: InsightsStatus::Unavailable {
                reason: reason.into(),
            },
        }
    }
}

/// Match scores recorded in one session, oldest first. Append-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoricalScoreSeries(Vec<u8>);

impl HistoricalScoreSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, score: u8) {
        self.0.push(score);
    }

    pub fn scores(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for HistoricalScoreSeries {
    fn from(scores: Vec<u8>) -> Self {
        Self(scores)
    }
}
