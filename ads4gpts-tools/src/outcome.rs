//! What an ad tool hands back to its caller.

use ads4gpts_core::Message;
use serde_json::Value as JsonValue;

use crate::response::AdResponse;

/// Result of an ad tool call.
///
/// Either the plain response, or an instruction to continue at another
/// node carrying the response as a tool turn.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    /// Return the response to the caller.
    Value(AdResponse),
    /// Continue at `goto` with `message` appended to the conversation.
    Redirect {
        /// Node to continue at.
        goto: String,
        /// The response carried by `message`.
        response: AdResponse,
        /// Id of the tool call being answered.
        tool_call_id: String,
        /// Tool-role turn holding the serialized response.
        message: Message,
    },
}

impl ToolOutcome {
    /// Build a redirect whose message answers `tool_call_id`.
    #[must_use]
    pub fn redirect(
        goto: impl Into<String>,
        tool_name: impl Into<String>,
        tool_call_id: impl Into<String>,
        response: AdResponse,
    ) -> Self {
        let tool_call_id = tool_call_id.into();
        let message =
            Message::tool(tool_name, tool_call_id.clone(), response.to_json().to_string());
        Self::Redirect {
            goto: goto.into(),
            response,
            tool_call_id,
            message,
        }
    }

    /// The response, whichever variant.
    #[must_use]
    pub fn response(&self) -> &AdResponse {
        match self {
            Self::Value(response) | Self::Redirect { response, .. } => response,
        }
    }

    /// Consume into the response.
    #[must_use]
    pub fn into_response(self) -> AdResponse {
        match self {
            Self::Value(response) | Self::Redirect { response, .. } => response,
        }
    }

    /// Redirect target, if any.
    #[must_use]
    pub fn goto(&self) -> Option<&str> {
        match self {
            Self::Value(_) => None,
            Self::Redirect { goto, .. } => Some(goto),
        }
    }

    /// The response as JSON.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        self.response().to_json()
    }
}

impl From<AdResponse> for ToolOutcome {
    fn from(response: AdResponse) -> Self {
        Self::Value(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ads4gpts_core::Role;
    use serde_json::json;

    #[test]
    fn test_value_has_no_goto() {
        let outcome = ToolOutcome::from(AdResponse::Ads(json!({"ads": []})));
        assert!(outcome.goto().is_none());
        assert_eq!(outcome.to_json(), json!({"ads": []}));
    }

    #[test]
    fn test_redirect_message_tagged_with_call_id() {
        let outcome = ToolOutcome::redirect(
            "render_agent",
            "ads4gpts_chat_tool",
            "call_7",
            AdResponse::error("boom"),
        );

        assert_eq!(outcome.goto(), Some("render_agent"));
        match &outcome {
            ToolOutcome::Redirect {
                tool_call_id,
                message,
                ..
            } => {
                assert_eq!(tool_call_id, "call_7");
                assert_eq!(message.role, Role::Tool);
                assert_eq!(message.tool_call_id.as_deref(), Some("call_7"));
                assert_eq!(message.name.as_deref(), Some("ads4gpts_chat_tool"));
                let content: serde_json::Value = serde_json::from_str(&message.content).unwrap();
                assert_eq!(content, json!({"error": "boom"}));
            }
            ToolOutcome::Value(_) => panic!("expected redirect"),
        }
        assert!(outcome.into_response().is_error());
    }
}
