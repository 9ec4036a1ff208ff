//! Conversation message types.
//!
//! - [`Message`]: one turn (system, user, assistant or tool)
//! - [`ToolCall`]: a tool invocation requested by an assistant turn
//! - [`MessageLog`]: ordered history, updated through [`MessageUpdate`]s
//!
//! ## Example
//!
//! ```rust
//! use ads4gpts_core::messages::{Message, MessageLog, MessageUpdate};
//!
//! let mut log = MessageLog::new();
//! log.push(Message::user("Hello!").with_id("m1"));
//! log.push(Message::assistant("Hi there.").with_id("m2"));
//!
//! log.apply(MessageUpdate::retract("m2"));
//! assert_eq!(log.len(), 1);
//! ```

pub mod log;
pub mod message;

pub use log::{MessageLog, MessageUpdate};
pub use message::{Message, Role, ToolCall};
