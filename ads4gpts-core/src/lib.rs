//! # ads4gpts-core
//!
//! Core types, messages, and error handling for the ads4gpts toolkit.
//!
//! This crate provides the foundational types shared by the other crates:
//!
//! - **Errors**: [`AdError`] and the uniform [`ErrorInfo`] descriptor
//! - **Messages**: conversation turns and the [`MessageLog`] reducer
//! - **Model**: the [`ChatModel`] collaborator trait
//! - **Identifiers**: prefixed ids for messages, tool calls, sessions, runs
//!
//! ## Example
//!
//! ```rust
//! use ads4gpts_core::{Message, MessageLog};
//!
//! let mut log = MessageLog::new();
//! log.push(Message::user("Any good hiking trails nearby?"));
//! log.push(Message::assistant("Plenty! Which region?"));
//!
//! let updates = log.retract_last(1);
//! log.apply_all(updates);
//! assert_eq!(log.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod errors;
pub mod identifier;
pub mod messages;
pub mod model;

// Re-exports for convenience
pub use errors::{AdError, ErrorInfo, Result};
pub use identifier::{
    generate_message_id, generate_run_id, generate_session_id, generate_tool_call_id, now_utc,
};
pub use messages::{Message, MessageLog, MessageUpdate, Role, ToolCall};
pub use model::{BoxedChatModel, ChatModel};

/// Prelude module for common imports.
pub mod prelude {
    pub use crate::errors::{AdError, ErrorInfo, Result};
    pub use crate::messages::{Message, MessageLog, MessageUpdate, Role, ToolCall};
    pub use crate::model::{BoxedChatModel, ChatModel};
}
