// Resume builder: prompt orchestration for the generated resume text and the
// PDF download of the same form data.
// All model calls go through llm_client, never direct HTTP calls here.

pub mod handlers;
pub mod orchestrator;
pub mod prompts;
