//! Graph definition and execution.

use crate::error::{GraphError, GraphResult};
use crate::node::{BaseNode, NodeDef, NodeResult};
use crate::state::{GraphRunContext, GraphRunResult, GraphState};
use ads4gpts_core::generate_run_id;
use std::collections::HashMap;
use tracing::{debug, info_span, Instrument};

/// A graph of nodes that route to each other by name.
pub struct Graph<State, Deps = (), End = ()>
where
    State: GraphState,
{
    name: Option<String>,
    nodes: HashMap<String, NodeDef<State, Deps, End>>,
    entry_node: Option<String>,
    max_steps: u32,
}

impl<State, Deps, End> Graph<State, Deps, End>
where
    State: GraphState,
    Deps: Send + Sync + 'static,
    End: Send + Sync + 'static,
{
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            name: None,
            nodes: HashMap::new(),
            entry_node: None,
            max_steps: 100,
        }
    }

    /// Set the graph name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set maximum steps.
    #[must_use]
    pub fn with_max_steps(mut self, max: u32) -> Self {
        self.max_steps = max;
        self
    }

    /// Add a node to the graph.
    #[must_use]
    pub fn node<N>(mut self, name: impl Into<String>, node: N) -> Self
    where
        N: BaseNode<State, Deps, End> + 'static,
    {
        let name = name.into();
        self.nodes.insert(name.clone(), NodeDef::new(name, node));
        self
    }

    /// Set the entry node.
    #[must_use]
    pub fn entry(mut self, name: impl Into<String>) -> Self {
        self.entry_node = Some(name.into());
        self
    }

    /// Get the graph name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Get node names.
    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// Check whether a node is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Get node count.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Validate the graph configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NoEntryNode`] or [`GraphError::NodeNotFound`].
    pub fn validate(&self) -> GraphResult<()> {
        let entry = self.entry_node.as_ref().ok_or(GraphError::NoEntryNode)?;
        if !self.nodes.contains_key(entry) {
            return Err(GraphError::node_not_found(entry));
        }
        Ok(())
    }

    /// Build and validate the graph.
    ///
    /// # Errors
    ///
    /// See [`Graph::validate`].
    pub fn build(self) -> GraphResult<Self> {
        self.validate()?;
        Ok(self)
    }

    /// Run the graph from the entry node.
    ///
    /// # Errors
    ///
    /// Returns the first node error, [`GraphError::NodeNotFound`] for an
    /// unknown redirect target, or [`GraphError::MaxStepsExceeded`].
    pub async fn run(&self, state: State, deps: Deps) -> GraphResult<GraphRunResult<State, End>> {
        let entry = self.entry_node.as_ref().ok_or(GraphError::NoEntryNode)?;
        let run_id = generate_run_id();
        let span = info_span!(
            "graph_run",
            graph = self.name.as_deref().unwrap_or("graph"),
            run_id = %run_id
        );
        self.run_from(entry, state, deps, run_id)
            .instrument(span)
            .await
    }

    async fn run_from(
        &self,
        entry: &str,
        state: State,
        deps: Deps,
        run_id: String,
    ) -> GraphResult<GraphRunResult<State, End>> {
        let max_steps = self.max_steps;
        let mut ctx = GraphRunContext::new(state, deps, run_id.clone()).with_max_steps(max_steps);
        let mut history = Vec::new();
        let mut result = NodeResult::NextNamed(entry.to_string());

        loop {
            result = match result {
                NodeResult::End(end) => {
                    debug!(steps = ctx.step, "Graph run finished");
                    return Ok(GraphRunResult::new(end, ctx.state, ctx.step, run_id)
                        .with_history(history));
                }
                NodeResult::Next(next) => {
                    Self::step(&mut ctx, &mut history, next.name())?;
                    next.run(&mut ctx).await?
                }
                NodeResult::NextNamed(name) => {
                    let def = self
                        .nodes
                        .get(&name)
                        .ok_or_else(|| GraphError::node_not_found(&name))?;
                    Self::step(&mut ctx, &mut history, &name)?;
                    def.node.run(&mut ctx).await?
                }
            };
        }
    }

    fn step(
        ctx: &mut GraphRunContext<State, Deps>,
        history: &mut Vec<String>,
        name: &str,
    ) -> GraphResult<()> {
        if ctx.step >= ctx.max_steps {
            return Err(GraphError::MaxStepsExceeded(ctx.max_steps));
        }
        ctx.increment_step();
        debug!(step = ctx.step, node = name, "Entering node");
        history.push(name.to_string());
        Ok(())
    }
}

impl<State, Deps, End> Default for Graph<State, Deps, End>
where
    State: GraphState,
    Deps: Send + Sync + 'static,
    End: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
