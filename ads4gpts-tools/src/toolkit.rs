//! One tool per ad surface, sharing a single client.

use ads4gpts_core::AdError;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use tracing::warn;

use crate::client::AdClient;
use crate::config::AdClientConfig;
use crate::context::ToolContext;
use crate::definition::ToolDefinition;
use crate::format::AdFormat;
use crate::outcome::ToolOutcome;
use crate::response::AdResponse;
use crate::surface::AdSurface;
use crate::tool::{AdTool, Tool};

/// The full set of ad tools.
///
/// Tools are kept in surface order, so [`AdToolkit::definitions`] is stable.
///
/// # Example
///
/// ```ignore
/// use ads4gpts_tools::{AdClientConfig, AdToolkit};
///
/// let toolkit = AdToolkit::new(AdClientConfig::from_env()?)?
///     .with_render_agent("render_agent");
///
/// // Hand the definitions to the model
/// let defs = toolkit.definitions();
///
/// // Dispatch a tool call by name
/// let outcome = toolkit.call("ads4gpts_chat_tool", &ctx, args).await;
/// ```
#[derive(Debug, Clone)]
pub struct AdToolkit {
    client: AdClient,
    tools: IndexMap<String, AdTool>,
}

impl AdToolkit {
    /// Build every surface's tool from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`AdError::Config`] if the client cannot be built.
    pub fn new(config: AdClientConfig) -> Result<Self, AdError> {
        Ok(Self::with_client(AdClient::new(config)?))
    }

    /// Build every surface's tool from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`AdError::Config`] if `ADS4GPTS_API_KEY` is not set.
    pub fn from_env() -> Result<Self, AdError> {
        Self::new(AdClientConfig::from_env()?)
    }

    /// Build every surface's tool around an existing client.
    #[must_use]
    pub fn with_client(client: AdClient) -> Self {
        let tools = AdSurface::all()
            .into_iter()
            .map(|surface| {
                let tool = AdTool::new(surface, client.clone());
                (tool.surface().name.clone(), tool)
            })
            .collect();
        Self { client, tools }
    }

    /// Keep only the given formats.
    #[must_use]
    pub fn only(mut self, formats: &[AdFormat]) -> Self {
        self.tools
            .retain(|_, tool| formats.contains(&tool.surface().format));
        self
    }

    /// Redirect every tool's result to `agent`.
    #[must_use]
    pub fn with_render_agent(mut self, agent: impl Into<String>) -> Self {
        let agent = agent.into();
        self.tools = self
            .tools
            .into_iter()
            .map(|(name, tool)| (name, tool.with_render_agent(agent.clone())))
            .collect();
        self
    }

    /// The shared client.
    #[must_use]
    pub fn client(&self) -> &AdClient {
        &self.client
    }

    /// All tools, in surface order.
    pub fn tools(&self) -> impl Iterator<Item = &AdTool> {
        self.tools.values()
    }

    /// Look up a tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AdTool> {
        self.tools.get(name)
    }

    /// Look up the tool serving `format`.
    #[must_use]
    pub fn for_format(&self, format: AdFormat) -> Option<&AdTool> {
        self.tools.values().find(|tool| tool.surface().format == format)
    }

    /// Definitions of every tool.
    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(Tool::definition).collect()
    }

    /// Tool names.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Number of tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tools are left.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Call a tool by name. Unknown names produce an error value.
    pub async fn call(&self, name: &str, ctx: &ToolContext, args: JsonValue) -> ToolOutcome {
        match self.tools.get(name) {
            Some(tool) => tool.call(ctx, args).await,
            None => Self::unknown(name),
        }
    }

    /// Blocking variant of [`AdToolkit::call`].
    pub fn call_blocking(&self, name: &str, ctx: &ToolContext, args: JsonValue) -> ToolOutcome {
        match self.tools.get(name) {
            Some(tool) => tool.call_blocking(ctx, args),
            None => Self::unknown(name),
        }
    }

    fn unknown(name: &str) -> ToolOutcome {
        warn!(tool = name, "Unknown ad tool requested");
        ToolOutcome::Value(AdResponse::error(format!("Unknown tool: {name}")))
    }
}
