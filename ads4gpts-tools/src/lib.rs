//! # ads4gpts-tools
//!
//! Ad retrieval tools for conversational agents.
//!
//! This crate turns a context payload into ads from the ads4gpts API, in
//! async or blocking code, and exposes the result as a tool a chat model
//! can call.
//!
//! ## Core Concepts
//!
//! - **[`AdRequest`]**: The validated request payload
//! - **[`AdClient`]**: HTTP client; every failure comes back as data
//! - **[`AdSurface`]**: Per-format tool name, description and endpoint
//! - **[`AdTool`]**: A [`Tool`] for one surface
//! - **[`AdToolkit`]**: All surfaces sharing one client
//! - **[`ToolOutcome`]**: A plain response or a redirect to a render agent
//!
//! ## Fetching Ads Directly
//!
//! ```ignore
//! use ads4gpts_tools::{AdClient, AdClientConfig, AdFormat, AdRequest};
//!
//! let client = AdClient::new(AdClientConfig::new("your-api-key"))?;
//! let request = AdRequest::new(
//!     "sess_123",
//!     "productivity apps",
//!     "gambling, alcohol",
//!     "The user is planning their week",
//! )
//! .with_format(AdFormat::Chat);
//!
//! let response = client.get_ads(&request).await;
//! println!("{}", response.to_json());
//! ```
//!
//! ## Using the Toolkit
//!
//! ```rust
//! use ads4gpts_tools::{AdClientConfig, AdToolkit};
//!
//! let toolkit = AdToolkit::new(AdClientConfig::new("your-api-key")).unwrap();
//!
//! // Get all definitions for the model
//! let definitions = toolkit.definitions();
//! assert_eq!(definitions.len(), 4);
//! assert!(toolkit.get("ads4gpts_chat_tool").is_some());
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod context;
pub mod definition;
pub mod format;
pub mod outcome;
pub mod request;
pub mod response;
pub mod retry;
pub mod schema;
pub mod surface;
pub mod tool;
pub mod toolkit;

pub use client::AdClient;
pub use config::{AdClientConfig, API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use context::ToolContext;
pub use definition::ToolDefinition;
pub use format::{AdFormat, AgeRange, Gender};
pub use outcome::ToolOutcome;
pub use request::{AdRequest, UserProfile, DEFAULT_STYLE, MIN_BID_FLOOR};
pub use response::{AdResponse, Ads, BannerAd, ChatAd, PromptAd};
pub use retry::{RetryCondition, RetryPolicy};
pub use schema::SchemaBuilder;
pub use surface::AdSurface;
pub use tool::{AdTool, BoxedTool, Tool};
pub use toolkit::AdToolkit;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        AdClient, AdClientConfig, AdFormat, AdRequest, AdResponse, AdSurface, AdTool,
        AdToolkit, Tool, ToolContext, ToolOutcome, UserProfile,
    };
}
