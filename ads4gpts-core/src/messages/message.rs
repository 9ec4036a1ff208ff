//! A single conversation turn.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::identifier::{generate_message_id, generate_tool_call_id, now_utc};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions.
    System,
    /// The human user.
    User,
    /// The assistant (chat model).
    Assistant,
    /// A tool result.
    Tool,
}

impl Role {
    /// Get the wire name of this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tool invocation requested by an assistant turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Correlation id echoed back by the tool result.
    pub id: String,
    /// Tool name.
    pub name: String,
    /// JSON arguments.
    pub args: JsonValue,
}

impl ToolCall {
    /// Create a tool call with a fresh id.
    #[must_use]
    pub fn new(name: impl Into<String>, args: JsonValue) -> Self {
        Self {
            id: generate_tool_call_id(),
            name: name.into(),
            args,
        }
    }

    /// Override the call id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// One entry in the conversation log.
///
/// Every message carries an `id`; the log uses it to replace and retract
/// entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Identity within the log.
    pub id: String,
    /// Producer of the turn.
    pub role: Role,
    /// Text content.
    #[serde(default)]
    pub content: String,
    /// Tool calls requested by an assistant turn.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// For tool turns, the call this result answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Optional author name (tool name for tool turns).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// When the turn was created.
    #[serde(default = "now_utc")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message with a fresh id.
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: generate_message_id(),
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
            name: None,
            timestamp: now_utc(),
        }
    }

    /// Create a system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create a tool result message answering `tool_call_id`.
    #[must_use]
    pub fn tool(
        name: impl Into<String>,
        tool_call_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let mut msg = Self::new(Role::Tool, content);
        msg.name = Some(name.into());
        msg.tool_call_id = Some(tool_call_id.into());
        msg
    }

    /// Override the id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Attach a tool call request.
    #[must_use]
    pub fn with_tool_call(mut self, call: ToolCall) -> Self {
        self.tool_calls.push(call);
        self
    }

    /// Check whether this turn requests any tool calls.
    #[must_use]
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_role() {
        assert_eq!(Message::system("s").role, Role::System);
        assert_eq!(Message::user("u").role, Role::User);
        assert_eq!(Message::assistant("a").role, Role::Assistant);
    }

    #[test]
    fn test_tool_message_carries_call_id() {
        let msg = Message::tool("ads", "call_1", "{}");
        assert_eq!(msg.role, Role::Tool);
        assert_eq!(msg.tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(msg.name.as_deref(), Some("ads"));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_value(Role::Assistant).unwrap();
        assert_eq!(json, serde_json::json!("assistant"));
    }

    #[test]
    fn test_deserialize_without_optional_fields() {
        let msg: Message =
            serde_json::from_value(serde_json::json!({"id": "m1", "role": "user", "content": "hi"}))
                .unwrap();
        assert_eq!(msg.id, "m1");
        assert!(msg.tool_calls.is_empty());
        assert!(msg.tool_call_id.is_none());
    }

    #[test]
    fn test_with_tool_call() {
        let msg = Message::assistant("")
            .with_tool_call(ToolCall::new("ads", serde_json::json!({})).with_id("call_9"));
        assert!(msg.has_tool_calls());
        assert_eq!(msg.tool_calls[0].id, "call_9");
    }
}
