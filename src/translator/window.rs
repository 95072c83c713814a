//! Conversation window construction

use crate::openai::types::{ChatMessage, MessageRole};
use serde::Deserialize;
use serde_json::Value;

/// Build the outgoing message list
///
/// Layout: the system preamble, then whichever of the last `window` context
/// entries decode as a turn (original order), then `message` as a user turn.
/// The window is taken over raw entries before filtering, so malformed entries
/// inside it reduce the number of forwarded turns.
pub fn build_messages(
    system_prompt: &str,
    context: &[Value],
    message: &str,
    window: usize,
) -> Vec<ChatMessage> {
    let start = context.len().saturating_sub(window);
    let tail = &context[start..];

    let mut messages = Vec::with_capacity(tail.len() + 2);
    messages.push(ChatMessage::new(MessageRole::System, system_prompt));
    messages.extend(
        tail.iter()
            .enumerate()
            .filter_map(|(offset, entry)| decode_turn(start + offset, entry)),
    );
    messages.push(ChatMessage::new(MessageRole::User, message));
    messages
}

fn decode_turn(index: usize, entry: &Value) -> Option<ChatMessage> {
    match ChatMessage::deserialize(entry) {
        Ok(turn) => Some(turn),
        Err(e) => {
            tracing::debug!(index, error = %e, "Dropping malformed context entry");
            None
        }
    }
}
