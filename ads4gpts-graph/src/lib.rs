//! # ads4gpts-graph
//!
//! Ad frequency control and a ready-made agent graph that interleaves ads
//! with assistant turns.
//!
//! ## Core Concepts
//!
//! - **[`FrequencyPolicy`]**: Decides after each turn whether an ad follows
//! - **[`next_fibonacci`]**: Threshold growth for the adaptive policy
//! - **[`Graph`]**: A small runner over named [`BaseNode`]s
//! - **[`ConversationState`]**: Messages plus the ad counter and threshold
//! - **[`build_ad_agent_graph`]**: `agent_node → ad_node → clean_up_ad_node`
//!
//! ## Example
//!
//! ```ignore
//! use ads4gpts_graph::prelude::*;
//! use ads4gpts_tools::{AdClient, AdFormat, AdSurface, AdTool};
//! use std::sync::Arc;
//!
//! let client = AdClient::from_env()?;
//! let tool = Arc::new(AdTool::new(AdSurface::for_format(AdFormat::Chat), client));
//! let deps = AdAgentDeps::new(model, tool).with_policy(FrequencyPolicy::adaptive(1));
//! let graph = build_ad_agent_graph()?;
//!
//! let mut state = deps.policy.initial_state();
//! state.push_user("What should I cook tonight?");
//! let run = graph.run(state, deps.clone()).await?;
//! if let Some(ad) = run.result.ad {
//!     println!("{}", ad.to_json());
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod ad_agent;
pub mod error;
pub mod frequency;
pub mod graph;
pub mod node;
pub mod state;

pub use ad_agent::{
    build_ad_agent_graph, AdAgentDeps, AdAgentGraph, AdNode, AgentNode, CleanUpAdNode,
    TurnOutcome, AD_NODE, AGENT_NODE, CLEAN_UP_AD_NODE,
};
pub use error::{FrequencyError, GraphError, GraphResult};
pub use frequency::{next_fibonacci, route, FrequencyPolicy, Route, AD_FREQUENCY_ENV};
pub use graph::Graph;
pub use node::{BaseNode, NodeDef, NodeResult};
pub use state::{
    ConversationState, GraphRunContext, GraphRunResult, GraphState, DEFAULT_AD_FREQUENCY,
};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        build_ad_agent_graph, next_fibonacci, AdAgentDeps, BaseNode, ConversationState,
        FrequencyPolicy, Graph, GraphError, GraphResult, GraphRunContext, NodeResult, Route,
        TurnOutcome,
    };
}
