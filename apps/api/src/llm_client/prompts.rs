// Shared prompt fragments.
// Each feature that calls the model keeps its own prompts.rs alongside it.

/// Appended to instructions whose replies are parsed mechanically.
/// The block must be the last thing in the reply so prose above it can stay free-form.
pub const STRUCTURED_BLOCK_INSTRUCTION: &str = "\
    After your written evaluation, finish the reply with ONE fenced code block tagged `json` \
    containing a single JSON object with exactly these fields:
```json
{
  \"match_score\": 72,
  \"missing_skills\": [\"Kubernetes\"],
  \"present_skills\": [\"Rust\", \"PostgreSQL\"],
  \"keyword_match\": {\"Rust\": 4, \"distributed systems\": 2},
  \"experience_timeline\": {\"2021\": \"Backend Engineer at Acme\"},
  \"competencies\": {\"Communication\": 4, \"Technical Skills\": 5, \"Teamwork\": 3, \"Problem Solving\": 4, \"Creativity\": 2}
}
```
    Use integers for counts and scores. Competency scores are on a 1-5 scale. \
    Do NOT add any text after the code block.";
