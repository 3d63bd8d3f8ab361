//! Conversation history shared between the caller and the interpreter.
//!
//! The interpreter only ever reads history; appending turns is the caller's
//! job. Wire format is camelCase JSON to match the chat surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who spoke a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    Customer,
    Assistant,
}

impl std::fmt::Display for ChatRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatRole::Customer => f.write_str("Customer"),
            ChatRole::Assistant => f.write_str("Assistant"),
        }
    }
}

/// One utterance in the running conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationTurn {
    pub role: ChatRole,
    pub text: String,
    /// Stamped at creation; fills in as "now" when the wire omits it.
    #[serde(default = "Utc::now")]
    pub at: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn customer(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Customer,
            text: text.into(),
            at: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
            at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_stamp_roles() {
        assert_eq!(ConversationTurn::customer("hi").role, ChatRole::Customer);
        assert_eq!(ConversationTurn::assistant("hello").role, ChatRole::Assistant);
    }

    #[test]
    fn role_serializes_lowercase() {
        let turn = ConversationTurn::customer("two slices");
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["role"], "customer");
        assert_eq!(json["text"], "two slices");
    }

    #[test]
    fn timestamp_defaults_when_wire_omits_it() {
        let turn: ConversationTurn =
            serde_json::from_str(r#"{"role": "assistant", "text": "Anything else?"}"#).unwrap();
        assert_eq!(turn.role, ChatRole::Assistant);
        assert!(turn.at <= Utc::now());
    }
}
