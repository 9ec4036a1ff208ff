//! Graph node types.

use crate::error::GraphResult;
use crate::state::GraphRunContext;
use async_trait::async_trait;

/// Result of a node execution.
pub enum NodeResult<State, Deps, End> {
    /// Continue to another node.
    Next(Box<dyn BaseNode<State, Deps, End>>),
    /// Continue to a named node.
    NextNamed(String),
    /// End the graph with a result.
    End(End),
}

impl<State, Deps, End> NodeResult<State, Deps, End> {
    /// Create a Next result with a node.
    pub fn next<N: BaseNode<State, Deps, End> + 'static>(node: N) -> Self {
        Self::Next(Box::new(node))
    }

    /// Create a NextNamed result.
    pub fn next_named(name: impl Into<String>) -> Self {
        Self::NextNamed(name.into())
    }

    /// Create an End result.
    pub fn end(value: End) -> Self {
        Self::End(value)
    }
}

impl<State, Deps, End: std::fmt::Debug> std::fmt::Debug for NodeResult<State, Deps, End> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Next(node) => f.debug_tuple("Next").field(&node.name()).finish(),
            Self::NextNamed(name) => f.debug_tuple("NextNamed").field(name).finish(),
            Self::End(value) => f.debug_tuple("End").field(value).finish(),
        }
    }
}

/// Base trait for all graph nodes.
#[async_trait]
pub trait BaseNode<State, Deps = (), End = ()>: Send + Sync {
    /// Get a human-readable name for this node.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Execute this node.
    async fn run(
        &self,
        ctx: &mut GraphRunContext<State, Deps>,
    ) -> GraphResult<NodeResult<State, Deps, End>>;
}

/// Node definition for registration in a graph.
pub struct NodeDef<State, Deps = (), End = ()> {
    /// Node name.
    pub name: String,
    /// The node implementation.
    pub node: Box<dyn BaseNode<State, Deps, End>>,
}

impl<State, Deps, End> NodeDef<State, Deps, End> {
    /// Create a new node definition.
    pub fn new<N: BaseNode<State, Deps, End> + 'static>(name: impl Into<String>, node: N) -> Self {
        Self {
            name: name.into(),
            node: Box::new(node),
        }
    }
}
