//! Percentage extraction from free-form model output.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PercentageError {
    #[error("No percentage score found in the response.")]
    NotFound,

    #[error("Could not extract score from response: '{0}%' is not a valid integer.")]
    Malformed(String),
}

fn percentage_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([0-9]+)%").expect("static regex"))
}

/// Returns the integer in front of the first `%` sign that directly follows a
/// digit run. First match wins; later percentages are ignored.
pub fn extract_percentage(text: &str) -> Result<u32, PercentageError> {
    let caps = percentage_pattern()
        .captures(text)
        .ok_or(PercentageError::NotFound)?;
    let digits = &caps[1];
    digits
        .parse::<u32>()
        .map_err(|_| PercentageError::Malformed(digits.to_string()))
}

/// Converts an extracted percentage into a 0–100 match score.
pub fn to_match_score(value: u32) -> u8 {
    value.min(100) as u8
}
