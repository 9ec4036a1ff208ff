//! Append-only conversation log with retraction by identity.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::message::{Message, Role};

/// A change to the conversation log.
///
/// Nodes never mutate the log directly; they return updates and the log
/// applies them in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MessageUpdate {
    /// Append a message, or replace the entry that has the same id.
    Append(Message),
    /// Remove the entry with this id.
    Retract {
        /// Id of the message to remove.
        id: String,
    },
}

impl MessageUpdate {
    /// Create a retraction for `id`.
    #[must_use]
    pub fn retract(id: impl Into<String>) -> Self {
        Self::Retract { id: id.into() }
    }
}

impl From<Message> for MessageUpdate {
    fn from(msg: Message) -> Self {
        Self::Append(msg)
    }
}

/// Ordered conversation history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one update.
    pub fn apply(&mut self, update: MessageUpdate) {
        match update {
            MessageUpdate::Append(msg) => {
                if let Some(existing) = self.messages.iter_mut().find(|m| m.id == msg.id) {
                    *existing = msg;
                } else {
                    self.messages.push(msg);
                }
            }
            MessageUpdate::Retract { id } => {
                let before = self.messages.len();
                self.messages.retain(|m| m.id != id);
                if self.messages.len() == before {
                    debug!(id = %id, "Retraction of unknown message ignored");
                }
            }
        }
    }

    /// Apply several updates in order.
    pub fn apply_all(&mut self, updates: impl IntoIterator<Item = MessageUpdate>) {
        for update in updates {
            self.apply(update);
        }
    }

    /// Append a message.
    pub fn push(&mut self, msg: Message) {
        self.apply(MessageUpdate::Append(msg));
    }

    /// Build the retractions that remove the last `n` entries.
    #[must_use]
    pub fn retract_last(&self, n: usize) -> Vec<MessageUpdate> {
        let start = self.messages.len().saturating_sub(n);
        self.messages[start..]
            .iter()
            .map(|m| MessageUpdate::retract(m.id.clone()))
            .collect()
    }

    /// Get a message by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Get the most recent message.
    #[must_use]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Iterate over the entries.
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    /// Borrow the entries as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }

    /// Render the last `n` user/assistant turns as `role: content` lines.
    ///
    /// System and tool turns are skipped.
    #[must_use]
    pub fn transcript(&self, n: usize) -> String {
        let turns: Vec<&Message> = self
            .messages
            .iter()
            .filter(|m| matches!(m.role, Role::User | Role::Assistant) && !m.content.is_empty())
            .collect();
        let start = turns.len().saturating_sub(n);
        turns[start..]
            .iter()
            .map(|m| format!("{}: {}", m.role, m.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<Vec<Message>> for MessageLog {
    fn from(messages: Vec<Message>) -> Self {
        let mut log = Self::new();
        log.apply_all(messages.into_iter().map(MessageUpdate::Append));
        log
    }
}

impl FromIterator<Message> for MessageLog {
    fn from_iter<I: IntoIterator<Item = Message>>(iter: I) -> Self {
        iter.into_iter().collect::<Vec<_>>().into()
    }
}

impl<'a> IntoIterator for &'a MessageLog {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn log_of(ids: &[&str]) -> MessageLog {
        ids.iter()
            .map(|id| Message::user(format!("text {id}")).with_id(*id))
            .collect()
    }

    #[test]
    fn test_append_and_replace_by_id() {
        let mut log = log_of(&["a", "b"]);
        log.apply(Message::assistant("new b").with_id("b").into());

        assert_eq!(log.len(), 2);
        assert_eq!(log.get("b").unwrap().content, "new b");
        assert_eq!(log.get("b").unwrap().role, Role::Assistant);
    }

    #[test]
    fn test_retract_by_id() {
        let mut log = log_of(&["a", "b", "c"]);
        log.apply(MessageUpdate::retract("b"));

        let ids: Vec<&str> = log.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_iter_from_newest() {
        let log = log_of(&["a", "b", "c"]);
        let newest = log.iter().rev().find(|m| m.id != "c").unwrap();
        assert_eq!(newest.id, "b");
    }

    #[test]
    fn test_retract_unknown_is_ignored() {
        let mut log = log_of(&["a"]);
        log.apply(MessageUpdate::retract("zzz"));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_retract_last_two() {
        let mut log = log_of(&["a", "b", "c"]);
        let updates = log.retract_last(2);
        assert_eq!(
            updates,
            vec![MessageUpdate::retract("b"), MessageUpdate::retract("c")]
        );

        log.apply_all(updates);
        assert_eq!(log.len(), 1);
        assert_eq!(log.last().unwrap().id, "a");
    }

    #[test]
    fn test_retract_last_more_than_len() {
        let log = log_of(&["a"]);
        assert_eq!(log.retract_last(5).len(), 1);
    }

    #[test]
    fn test_transcript_skips_tool_turns() {
        let mut log = MessageLog::new();
        log.push(Message::system("be nice"));
        log.push(Message::user("I want running shoes"));
        log.push(Message::assistant("Sure, what size?"));
        log.push(Message::tool("ads", "call_1", "{}"));

        assert_eq!(
            log.transcript(10),
            "user: I want running shoes\nassistant: Sure, what size?"
        );
        assert_eq!(log.transcript(1), "assistant: Sure, what size?");
    }

    #[test]
    fn test_serializes_as_array() {
        let log = log_of(&["a"]);
        let json = serde_json::to_value(&log).unwrap();
        assert!(json.is_array());
    }
}
