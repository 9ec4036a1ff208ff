//! Per-invocation context passed to tools.

use ads4gpts_core::{generate_run_id, now_utc};
use chrono::{DateTime, Utc};

/// Context passed to a tool call.
///
/// Carries the run that issued the call and, when the call came from a
/// model turn, the tool-call id used to correlate the result.
///
/// # Example
///
/// ```rust
/// use ads4gpts_tools::ToolContext;
///
/// let ctx = ToolContext::new().for_tool("ads4gpts_chat", "call_42");
/// assert_eq!(ctx.tool_call_id.as_deref(), Some("call_42"));
/// ```
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Unique identifier for the run.
    pub run_id: String,

    /// When the run started.
    pub start_time: DateTime<Utc>,

    /// Name of the tool being called.
    pub tool_name: Option<String>,

    /// Id of the tool call, if any.
    pub tool_call_id: Option<String>,
}

impl Default for ToolContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolContext {
    /// Create a context for a fresh run.
    #[must_use]
    pub fn new() -> Self {
        Self {
            run_id: generate_run_id(),
            start_time: now_utc(),
            tool_name: None,
            tool_call_id: None,
        }
    }

    /// Set the run ID.
    #[must_use]
    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = run_id.into();
        self
    }

    /// Copy of this context scoped to one tool call.
    #[must_use]
    pub fn for_tool(&self, name: impl Into<String>, tool_call_id: impl Into<String>) -> Self {
        let mut ctx = self.clone();
        ctx.tool_name = Some(name.into());
        ctx.tool_call_id = Some(tool_call_id.into());
        ctx
    }

    /// Time elapsed since the run started.
    #[must_use]
    pub fn elapsed(&self) -> chrono::Duration {
        now_utc() - self.start_time
    }
}
