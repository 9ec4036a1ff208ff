//! ID generation utilities.
//!
//! Messages, tool calls, sessions and graph runs all carry string ids. The
//! prefixes make ids easy to tell apart in logs.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a unique tool call ID.
///
/// # Example
///
/// ```rust
/// use ads4gpts_core::identifier::generate_tool_call_id;
///
/// let id = generate_tool_call_id();
/// assert!(id.starts_with("call_"));
/// assert_eq!(id.len(), 37); // "call_" + 32 hex chars
/// ```
#[must_use]
pub fn generate_tool_call_id() -> String {
    format!("call_{}", Uuid::new_v4().simple())
}

/// Generate a unique run ID.
#[must_use]
pub fn generate_run_id() -> String {
    format!("run_{}", Uuid::new_v4().simple())
}

/// Generate a unique message ID.
#[must_use]
pub fn generate_message_id() -> String {
    format!("msg_{}", Uuid::new_v4().simple())
}

/// Generate a unique session ID, used as the `id` of ad requests.
#[must_use]
pub fn generate_session_id() -> String {
    format!("sess_{}", Uuid::new_v4().simple())
}

/// Get the current UTC timestamp.
#[must_use]
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(generate_tool_call_id as fn() -> String, "call_")]
    #[case(generate_run_id as fn() -> String, "run_")]
    #[case(generate_message_id as fn() -> String, "msg_")]
    #[case(generate_session_id as fn() -> String, "sess_")]
    fn test_prefixes(#[case] generate: fn() -> String, #[case] prefix: &str) {
        let id = generate();
        assert!(id.starts_with(prefix));
        assert!(id.len() > prefix.len());
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(generate_message_id(), generate_message_id());
    }
}
