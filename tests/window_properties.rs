//! Property tests for conversation window construction

use chat_bridge::openai::{ChatMessage, MessageRole};
use chat_bridge::translator::build_messages;
use proptest::prelude::*;
use serde_json::{Value, json};

const PREAMBLE: &str = "You are a helpful assistant.";

/// A context entry plus whether it should survive filtering
fn context_entry() -> impl Strategy<Value = (Value, bool)> {
    let role = prop_oneof![Just("system"), Just("user"), Just("assistant")];
    prop_oneof![
        (role, ".{0,12}").prop_map(|(r, c)| (json!({"role": r, "content": c}), true)),
        ".{0,12}".prop_map(|c| (json!({"content": c}), false)),
        Just((json!({"role": "user"}), false)),
        Just((json!({"role": "tool", "content": "x"}), false)),
        any::<i64>().prop_map(|n| (json!(n), false)),
    ]
}

proptest! {
    #[test]
    fn frame_is_preamble_then_context_then_user(
        entries in prop::collection::vec(context_entry(), 0..20),
        message in ".{0,20}",
        window in 0usize..10,
    ) {
        let context: Vec<Value> = entries.iter().map(|(v, _)| v.clone()).collect();
        let messages = build_messages(PREAMBLE, &context, &message, window);

        prop_assert!(messages.len() >= 2);
        prop_assert_eq!(&messages[0], &ChatMessage::new(MessageRole::System, PREAMBLE));
        prop_assert_eq!(
            messages.last().expect("non-empty"),
            &ChatMessage::new(MessageRole::User, message.as_str())
        );
        prop_assert!(messages.len() - 2 <= window);
    }

    #[test]
    fn forwarded_turns_are_valid_tail_entries_in_order(
        entries in prop::collection::vec(context_entry(), 0..20),
        window in 0usize..10,
    ) {
        let context: Vec<Value> = entries.iter().map(|(v, _)| v.clone()).collect();
        let messages = build_messages(PREAMBLE, &context, "q", window);

        let start = entries.len().saturating_sub(window);
        let expected: Vec<ChatMessage> = entries[start..]
            .iter()
            .filter(|(_, valid)| *valid)
            .map(|(v, _)| serde_json::from_value(v.clone()).expect("valid entry decodes"))
            .collect();

        prop_assert_eq!(&messages[1..messages.len() - 1], expected.as_slice());
    }
}

#[test]
fn all_valid_context_keeps_exactly_last_six() {
    let context: Vec<Value> = (0..10)
        .map(|i| json!({"role": "user", "content": i.to_string()}))
        .collect();
    let messages = build_messages(PREAMBLE, &context, "q", 6);
    let forwarded: Vec<&str> = messages[1..messages.len() - 1]
        .iter()
        .map(ChatMessage::content)
        .collect();
    assert_eq!(forwarded, vec!["4", "5", "6", "7", "8", "9"]);
}
