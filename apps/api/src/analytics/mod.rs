//! Analytics projection: turns a stored `AtsResult` and the session's score
//! history into chart specifications for the client's charting widget.
//!
//! Every chart is built by its own pure function. Nothing here draws; the
//! client decides how a `ChartSpec` is rendered.

pub mod handlers;

use std::cmp::Ordering;

use serde::Serialize;

use crate::models::ats::{AtsResult, CompetencyScore, HistoricalScoreSeries, TimelineEntry, COMPETENCY_AXES};

/// Shown on the radar when the model did not score the competencies.
pub const EXAMPLE_COMPETENCY_SCORES: [u8; 5] = [4, 5, 3, 4, 2];

pub const PRESENT_SKILLS_LABEL: &str = "Present Skills";
pub const MISSING_SKILLS_LABEL: &str = "Missing Skills";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BandColor {
    Red,
    Yellow,
    Green,
}

/// A gauge band covering `[from, to)`; the last band also includes `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GaugeBand {
    pub from: u8,
    pub to: u8,
    pub color: BandColor,
}

pub const GAUGE_BANDS: [GaugeBand; 3] = [
    GaugeBand { from: 0, to: 50, color: BandColor::Red },
    GaugeBand { from: 50, to: 75, color: BandColor::Yellow },
    GaugeBand { from: 75, to: 100, color: BandColor::Green },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    Bar {
        title: String,
        x_label: String,
        y_label: String,
        x: Vec<usize>,
        y: Vec<u8>,
        color: String,
    },
    Pie {
        title: String,
        labels: Vec<String>,
        values: Vec<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        colors: Option<Vec<String>>,
    },
    Table {
        title: String,
        columns: [String; 2],
        rows: Vec<(String, u32)>,
    },
    Radar {
        title: String,
        /// Closed polygon: the first axis is repeated at the end.
        axes: Vec<String>,
        values: Vec<u8>,
        min: u8,
        max: u8,
        /// True when `values` are example scores rather than the model's.
        placeholder: bool,
    },
    Gauge {
        title: String,
        value: u8,
        min: u8,
        max: u8,
        bands: Vec<GaugeBand>,
        active_band: BandColor,
    },
    Timeline {
        title: String,
        entries: Vec<TimelineEntry>,
    },
}

// ────────────────────────────────────────────────────────────────────────────
// Individual charts
// ────────────────────────────────────────────────────────────────────────────

pub fn score_trend(history: &HistoricalScoreSeries) -> ChartSpec {
    ChartSpec::Bar {
        title: "ATS Scores over Time".to_string(),
        x_label: "Evaluation Index".to_string(),
        y_label: "ATS Score (%)".to_string(),
        x: (1..=history.len()).collect(),
        y: history.scores().to_vec(),
        color: "indigo".to_string(),
    }
}

pub fn keyword_distribution(result: &AtsResult) -> ChartSpec {
    let (labels, values): (Vec<String>, Vec<u32>) = result
        .keyword_match
        .iter()
        .map(|(k, v)| (k.clone(), *v))
        .unzip();
    ChartSpec::Pie {
        title: "Keyword Match Distribution".to_string(),
        labels,
        values,
        colors: None,
    }
}

fn skill_counts(result: &AtsResult) -> [(String, u32); 2] {
    [
        (PRESENT_SKILLS_LABEL.to_string(), result.present_skills.len() as u32),
        (MISSING_SKILLS_LABEL.to_string(), result.missing_skills.len() as u32),
    ]
}

pub fn skills_table(result: &AtsResult) -> ChartSpec {
    ChartSpec::Table {
        title: "Skills Analysis".to_string(),
        columns: ["Skill Type".to_string(), "Count".to_string()],
        rows: skill_counts(result).to_vec(),
    }
}

pub fn skills_pie(result: &AtsResult) -> ChartSpec {
    let (labels, values): (Vec<String>, Vec<u32>) = skill_counts(result).into_iter().unzip();
    ChartSpec::Pie {
        title: "Skills Present vs Missing".to_string(),
        labels,
        values,
        colors: Some(vec!["green".to_string(), "red".to_string()]),
    }
}

pub fn competency_radar(competencies: Option<&[CompetencyScore]>) -> ChartSpec {
    let (mut axes, mut values, placeholder): (Vec<String>, Vec<u8>, bool) = match competencies {
        Some(scores) if !scores.is_empty() => (
            scores.iter().map(|c| c.axis.clone()).collect(),
            scores.iter().map(|c| c.score).collect(),
            false,
        ),
        _ => (
            COMPETENCY_AXES.iter().map(|a| a.to_string()).collect(),
            EXAMPLE_COMPETENCY_SCORES.to_vec(),
            true,
        ),
    };

    if let (Some(first_axis), Some(first_value)) = (axes.first().cloned(), values.first().copied()) {
        axes.push(first_axis);
        values.push(first_value);
    }

    ChartSpec::Radar {
        title: "Competency Mapping".to_string(),
        axes,
        values,
        min: 1,
        max: 5,
        placeholder,
    }
}

/// Band containing `score`. Lower bounds are inclusive; 100 falls in the last band.
pub fn band_for(score: u8) -> BandColor {
    GAUGE_BANDS
        .iter()
        .find(|band| score >= band.from && score < band.to)
        .map(|band| band.color)
        .unwrap_or(BandColor::Green)
}

pub fn fit_gauge(match_score: u8) -> ChartSpec {
    ChartSpec::Gauge {
        title: "Overall Resume Fit Score".to_string(),
        value: match_score,
        min: 0,
        max: 100,
        bands: GAUGE_BANDS.to_vec(),
        active_band: band_for(match_score),
    }
}

/// Leading ASCII digits of a year key ("2019-2021" → 2019).
fn year_prefix(year: &str) -> Option<u32> {
    let digits: String = year.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

fn compare_years(a: &str, b: &str) -> Ordering {
    match (year_prefix(a), year_prefix(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Timeline sorted by year. Entries sharing a year keep their input order.
pub fn experience_timeline(entries: &[TimelineEntry]) -> ChartSpec {
    let mut entries = entries.to_vec();
    entries.sort_by(|a, b| compare_years(&a.year, &b.year));
    ChartSpec::Timeline {
        title: "Experience Timeline".to_string(),
        entries,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Projection
// ────────────────────────────────────────────────────────────────────────────

/// History-only projection, for sessions that have scores but no stored result.
pub fn project_history(history: &HistoricalScoreSeries) -> Vec<ChartSpec> {
    if history.is_empty() {
        Vec::new()
    } else {
        vec![score_trend(history)]
    }
}

pub fn project(result: &AtsResult, history: &HistoricalScoreSeries) -> Vec<ChartSpec> {
    let mut charts = project_history(history);
    charts.extend([
        keyword_distribution(result),
        skills_table(result),
        skills_pie(result),
        competency_radar(result.competencies.as_deref()),
        fit_gauge(result.match_score),
        experience_timeline(&result.experience_timeline),
    ]);
    charts
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn result_with_skills(present: &[&str], missing: &[&str]) -> AtsResult {
        let mut result = AtsResult::score_only(60, "test");
        result.present_skills = present.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>();
        result.missing_skills = missing.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>();
        result
    }

    fn entry(year: &str, label: &str) -> TimelineEntry {
        TimelineEntry {
            year: year.to_string(),
            label: label.to_string(),
        }
    }

    #[test]
    fn test_skills_table_and_pie_agree() {
        let result = result_with_skills(&["Rust", "SQL", "Docker"], &["Kubernetes", "Terraform"]);

        let ChartSpec::Table { rows, .. } = skills_table(&result) else {
            panic!("expected table");
        };
        assert_eq!(
            rows,
            vec![
                ("Present Skills".to_string(), 3),
                ("Missing Skills".to_string(), 2)
            ]
        );

        let ChartSpec::Pie { values, colors, .. } = skills_pie(&result) else {
            panic!("expected pie");
        };
        assert_eq!(values, vec![3, 2]);
        assert_eq!(values.iter().sum::<u32>(), 5);
        assert_eq!(colors, Some(vec!["green".to_string(), "red".to_string()]));
    }

    #[test]
    fn test_gauge_band_boundaries() {
        assert_eq!(band_for(0), BandColor::Red);
        assert_eq!(band_for(49), BandColor::Red);
        assert_eq!(band_for(50), BandColor::Yellow);
        assert_eq!(band_for(74), BandColor::Yellow);
        assert_eq!(band_for(75), BandColor::Green);
        assert_eq!(band_for(100), BandColor::Green);
    }

    #[test]
    fn test_trend_indexes_start_at_one() {
        let history = HistoricalScoreSeries::from(vec![40, 55, 70]);
        let ChartSpec::Bar { x, y, color, .. } = score_trend(&history) else {
            panic!("expected bar");
        };
        assert_eq!(x, vec![1, 2, 3]);
        assert_eq!(y, vec![40, 55, 70]);
        assert_eq!(color, "indigo");
    }

    #[test]
    fn test_radar_placeholder_is_closed_and_flagged() {
        let ChartSpec::Radar {
            axes,
            values,
            placeholder,
            ..
        } = competency_radar(None)
        else {
            panic!("expected radar");
        };
        assert!(placeholder);
        assert_eq!(values, vec![4, 5, 3, 4, 2, 4]);
        assert_eq!(axes.len(), 6);
        assert_eq!(axes.first(), axes.last());
    }

    #[test]
    fn test_radar_uses_model_scores() {
        let scores: Vec<CompetencyScore> = COMPETENCY_AXES
            .iter()
            .map(|a| CompetencyScore {
                axis: a.to_string(),
                score: 3,
            })
            .collect();
        let ChartSpec::Radar {
            values, placeholder, ..
        } = competency_radar(Some(&scores))
        else {
            panic!("expected radar");
        };
        assert!(!placeholder);
        assert_eq!(values, vec![3; 6]);
    }

    #[test]
    fn test_timeline_sorted_by_year_and_stable() {
        let entries = vec![
            entry("2021", "Senior"),
            entry("Earlier", "Volunteer"),
            entry("2019-2020", "Junior"),
            entry("2021", "Mentor"),
        ];
        let ChartSpec::Timeline { entries, .. } = experience_timeline(&entries) else {
            panic!("expected timeline");
        };
        let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Junior", "Senior", "Mentor", "Volunteer"]);
    }

    #[test]
    fn test_project_without_history_skips_trend() {
        let charts = project(&result_with_skills(&[], &[]), &HistoricalScoreSeries::new());
        assert_eq!(charts.len(), 6);
        assert!(!charts.iter().any(|c| matches!(c, ChartSpec::Bar { .. })));
    }

    #[test]
    fn test_chart_serializes_with_kind_tag() {
        let json = serde_json::to_value(fit_gauge(80)).unwrap();
        assert_eq!(json["kind"], "gauge");
        assert_eq!(json["active_band"], "green");
    }
}
