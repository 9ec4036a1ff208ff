//! The tool trait and the ad tool.

use ads4gpts_core::generate_tool_call_id;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::debug;

use crate::client::AdClient;
use crate::context::ToolContext;
use crate::definition::ToolDefinition;
use crate::outcome::ToolOutcome;
use crate::request::TOOL_CALL_ID_FIELD;
use crate::response::AdResponse;
use crate::surface::AdSurface;

/// A capability a chat model can call.
///
/// Failures are reported inside the [`ToolOutcome`], never as a panic or
/// `Err`, so a bad call cannot take down the conversation.
///
/// # Example
///
/// ```ignore
/// use ads4gpts_tools::{Tool, ToolContext};
///
/// let ctx = ToolContext::new();
/// let outcome = tool.call(&ctx, serde_json::json!({"id": "s", ...})).await;
/// println!("{}", outcome.to_json());
/// ```
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name, description and input schema sent to the model.
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool.
    async fn call(&self, ctx: &ToolContext, args: JsonValue) -> ToolOutcome;

    /// Execute the tool on the calling thread.
    ///
    /// Must not be called from inside an async runtime.
    fn call_blocking(&self, ctx: &ToolContext, args: JsonValue) -> ToolOutcome;

    /// Get the tool name.
    fn name(&self) -> String {
        self.definition().name
    }
}

/// Type-erased shared tool.
pub type BoxedTool = Arc<dyn Tool>;

/// Retrieves ads for one surface.
#[derive(Debug, Clone)]
pub struct AdTool {
    surface: AdSurface,
    client: AdClient,
}

impl AdTool {
    /// Create a tool for `surface` backed by `client`.
    #[must_use]
    pub fn new(surface: AdSurface, client: AdClient) -> Self {
        Self { surface, client }
    }

    /// The surface this tool serves.
    #[must_use]
    pub fn surface(&self) -> &AdSurface {
        &self.surface
    }

    /// The underlying client.
    #[must_use]
    pub fn client(&self) -> &AdClient {
        &self.client
    }

    /// Redirect results to `agent`.
    #[must_use]
    pub fn with_render_agent(mut self, agent: impl Into<String>) -> Self {
        self.surface.render_agent = Some(agent.into());
        self
    }

    /// Copy the context's tool-call id into `args` when they lack one.
    fn correlate(ctx: &ToolContext, mut args: JsonValue) -> (JsonValue, Option<String>) {
        let from_args = args
            .get(TOOL_CALL_ID_FIELD)
            .and_then(JsonValue::as_str)
            .map(str::to_string);
        let id = from_args.or_else(|| ctx.tool_call_id.clone());
        if let (Some(id), Some(map)) = (&id, args.as_object_mut()) {
            map.entry(TOOL_CALL_ID_FIELD)
                .or_insert_with(|| JsonValue::String(id.clone()));
        }
        (args, id)
    }

    fn finish(
        &self,
        ctx: &ToolContext,
        response: AdResponse,
        tool_call_id: Option<String>,
    ) -> ToolOutcome {
        debug!(
            tool = %self.surface.name,
            run_id = %ctx.run_id,
            elapsed_ms = ctx.elapsed().num_milliseconds(),
            is_error = response.is_error(),
            "Ad tool finished"
        );
        match &self.surface.render_agent {
            None => ToolOutcome::Value(response),
            Some(agent) => ToolOutcome::redirect(
                agent.clone(),
                self.surface.name.clone(),
                tool_call_id.unwrap_or_else(generate_tool_call_id),
                response,
            ),
        }
    }
}

#[async_trait]
impl Tool for AdTool {
    fn definition(&self) -> ToolDefinition {
        self.surface.definition()
    }

    async fn call(&self, ctx: &ToolContext, args: JsonValue) -> ToolOutcome {
        let (args, tool_call_id) = Self::correlate(ctx, args);
        let response = self.client.get_ads_from_args(&self.surface, args).await;
        self.finish(ctx, response, tool_call_id)
    }

    fn call_blocking(&self, ctx: &ToolContext, args: JsonValue) -> ToolOutcome {
        let (args, tool_call_id) = Self::correlate(ctx, args);
        let response = self.client.get_ads_from_args_blocking(&self.surface, args);
        self.finish(ctx, response, tool_call_id)
    }

    fn name(&self) -> String {
        self.surface.name.clone()
    }
}
