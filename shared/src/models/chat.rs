//! Chat log models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who produced a chat turn
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One turn in the conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
    pub order_index: usize,
}

/// Ordered, append-only sequence of chat turns
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatLog {
    turns: Vec<ChatTurn>,
}

/// A persisted query and the advice given for it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryRecord {
    pub id: Uuid,
    pub farmer_id: Uuid,
    pub query: String,
    pub response: String,
    pub created_at: DateTime<Utc>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a log from query history given newest first
    pub fn from_history(records: &[QueryRecord]) -> Self {
        let mut log = Self::new();
        for record in records.iter().rev() {
            log.push_user(record.query.clone());
            log.push_assistant(record.response.clone());
        }
        log
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> &ChatTurn {
        self.push(ChatRole::User, text.into())
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) -> &ChatTurn {
        self.push(ChatRole::Assistant, text.into())
    }

    fn push(&mut self, role: ChatRole, text: String) -> &ChatTurn {
        let order_index = self.turns.len();
        self.turns.push(ChatTurn {
            role,
            text,
            order_index,
        });
        &self.turns[order_index]
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The most recent user turn, if any
    pub fn last_user_turn(&self) -> Option<&ChatTurn> {
        self.turns.iter().rev().find(|t| t.role == ChatRole::User)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_turns_are_indexed_in_order() {
        let mut log = ChatLog::new();
        log.push_user("rain?");
        log.push_assistant("Rain 70% in Thrissur.");
        log.push_user("pest?");

        let indexes: Vec<usize> = log.turns().iter().map(|t| t.order_index).collect();
        assert_eq!(indexes, vec![0, 1, 2]);
        assert_eq!(log.last_user_turn().unwrap().text, "pest?");
    }

    #[test]
    fn test_empty_log() {
        let log = ChatLog::new();
        assert!(log.is_empty());
        assert!(log.last_user_turn().is_none());
    }

    #[test]
    fn test_from_history_is_chronological() {
        let farmer_id = Uuid::new_v4();
        let now = Utc::now();
        let newest_first = vec![
            QueryRecord {
                id: Uuid::new_v4(),
                farmer_id,
                query: "second".into(),
                response: "answer two".into(),
                created_at: now,
            },
            QueryRecord {
                id: Uuid::new_v4(),
                farmer_id,
                query: "first".into(),
                response: "answer one".into(),
                created_at: now - Duration::minutes(5),
            },
        ];

        let log = ChatLog::from_history(&newest_first);
        let texts: Vec<&str> = log.turns().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "answer one", "second", "answer two"]);
        assert_eq!(log.turns()[1].role, ChatRole::Assistant);
    }
}
