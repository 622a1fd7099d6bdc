pub mod extract;
pub mod handlers;
pub mod insights;
pub mod prompts;
pub mod scoring;
