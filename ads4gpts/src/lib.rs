//! # ads4gpts - Ads for Conversational Agents
//!
//! Fetch ads from the ads4gpts API as agent tools, and decide turn by turn
//! when a conversation should show one.
//!
//! ## Quick Start
//!
//! ```ignore
//! use ads4gpts::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = AdClient::from_env()?;
//!     let request = AdRequest::new(
//!         "sess_123",
//!         "kitchen gadgets",
//!         "alcohol",
//!         "The user is planning a dinner party",
//!     );
//!     let response = client.get_ads(&request).await;
//!     println!("{}", response.to_json());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`ads4gpts_core`] - Errors, identifiers, conversation messages
//! - [`ads4gpts_tools`] - Ad requests, the HTTP client and ad tools
//! - [`ads4gpts_graph`] - Frequency control and the ad-agent graph
//!
//! ## Configuration
//!
//! | Variable | Used by | Default |
//! |----------|---------|---------|
//! | `ADS4GPTS_API_KEY` | [`AdClientConfig::from_env`] | required |
//! | `ADS4GPTS_BASE_URL` | [`AdClientConfig::from_env`] | `https://with.ads4gpts.com` |
//! | `AD_FREQUENCY` | [`FrequencyPolicy::from_env`] | `1` |
//!
//! The crates log through `tracing` and never install a subscriber; see the
//! `demos/` programs for a setup with `tracing-subscriber`.

#![warn(missing_docs)]
#![deny(unsafe_code)]

/// Errors, identifiers and messages.
pub mod core {
    pub use ads4gpts_core::*;
}

/// Ad retrieval client and tools.
pub mod tools {
    pub use ads4gpts_tools::*;
}

/// Frequency control and the ad-agent graph.
pub mod graph {
    pub use ads4gpts_graph::*;
}

// Core
pub use ads4gpts_core::{
    generate_message_id, generate_run_id, generate_session_id, generate_tool_call_id, AdError,
    BoxedChatModel, ChatModel, ErrorInfo, Message, MessageLog, MessageUpdate, Result, Role,
    ToolCall,
};

// Tools
pub use ads4gpts_tools::{
    AdClient, AdClientConfig, AdFormat, AdRequest, AdResponse, AdSurface, AdTool, AdToolkit, Ads,
    AgeRange, BannerAd, BoxedTool, ChatAd, Gender, PromptAd, RetryCondition, RetryPolicy, Tool,
    ToolContext, ToolDefinition, ToolOutcome, UserProfile,
};

// Graph
pub use ads4gpts_graph::{
    build_ad_agent_graph, next_fibonacci, route, AdAgentDeps, AdAgentGraph, BaseNode,
    ConversationState, FrequencyError, FrequencyPolicy, Graph, GraphError, GraphResult,
    GraphRunContext, GraphRunResult, NodeResult, Route, TurnOutcome,
};

/// Convenient prelude for common imports.
///
/// ```ignore
/// use ads4gpts::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::{AdError, BoxedChatModel, ChatModel, Message, MessageLog, Result, Role};

    pub use crate::tools::{
        AdClient, AdClientConfig, AdFormat, AdRequest, AdResponse, AdSurface, AdTool, AdToolkit,
        RetryPolicy, Tool, ToolContext, ToolOutcome, UserProfile,
    };

    pub use crate::graph::{
        build_ad_agent_graph, AdAgentDeps, ConversationState, FrequencyPolicy, GraphError,
        Route, TurnOutcome,
    };
}

/// Returns the current version of ads4gpts.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
