//! Prompt orchestration: flattens request data into a key:value context block
//! and sends it with a fixed instruction to the text-completion collaborator.
//!
//! The orchestrator never interprets the reply. Score extraction and structured
//! parsing live in `ats`.

use tracing::info;

use crate::errors::AppError;
use crate::llm_client::TextCompleter;

/// Joins `key: value` pairs with newlines, in the order given.
///
/// Values are not escaped: a value containing newlines spans several lines of
/// the block, exactly as typed.
pub fn flatten_fields<'a, I>(fields: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    fields
        .into_iter()
        .map(|(key, value)| format!("{key}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Sends one completion request and returns the reply text unmodified.
///
/// Single attempt; a transport or API failure becomes `AppError::Llm` carrying
/// the collaborator's message so the client can display it.
pub async fn generate(
    completer: &dyn TextCompleter,
    context: &str,
    instruction: &str,
) -> Result<String, AppError> {
    info!(
        "Requesting completion: context_chars={}, instruction_chars={}",
        context.len(),
        instruction.len()
    );

    completer
        .complete(context, instruction)
        .await
        .map_err(|e| AppError::Llm(format!("Completion request failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingCompleter {
        reply: Result<String, ()>,
        seen: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl TextCompleter for RecordingCompleter {
        async fn complete(&self, context: &str, instruction: &str) -> Result<String, LlmError> {
            self.seen
                .lock()
                .unwrap()
                .push((context.to_string(), instruction.to_string()));
            self.reply.clone().map_err(|_| LlmError::EmptyContent)
        }
    }

    #[test]
    fn test_flatten_fields_joins_pairs_in_order() {
        let block = flatten_fields([("full_name", "Ada"), ("key_skills", "Rust, Go")]);
        assert_eq!(block, "full_name: Ada\nkey_skills: Rust, Go");
    }

    #[test]
    fn test_flatten_fields_does_not_escape_newlines() {
        let block = flatten_fields([("work_experience", "Engineer at Acme\nFreelancer")]);
        assert_eq!(block, "work_experience: Engineer at Acme\nFreelancer");
    }

    #[test]
    fn test_flatten_fields_empty() {
        assert_eq!(flatten_fields(Vec::<(&str, &str)>::new()), "");
    }

    #[tokio::test]
    async fn test_generate_returns_reply_unmodified() {
        let completer = RecordingCompleter {
            reply: Ok("  **Ada Lovelace**\n".to_string()),
            seen: Mutex::new(Vec::new()),
        };
        let text = generate(&completer, "full_name: Ada", "build it").await.unwrap();
        assert_eq!(text, "  **Ada Lovelace**\n");

        let seen = completer.seen.lock().unwrap();
        assert_eq!(seen.len(), 1, "exactly one call, no retry");
        assert_eq!(seen[0].0, "full_name: Ada");
        assert_eq!(seen[0].1, "build it");
    }

    #[tokio::test]
    async fn test_generate_maps_failure_to_llm_error() {
        let completer = RecordingCompleter {
            reply: Err(()),
            seen: Mutex::new(Vec::new()),
        };
        let err = generate(&completer, "ctx", "instr").await.unwrap_err();
        assert!(matches!(err, AppError::Llm(msg) if msg.contains("empty content")));
        assert_eq!(completer.seen.lock().unwrap().len(), 1);
    }
}
