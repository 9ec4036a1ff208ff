//! Ad surfaces: one tool configuration per [`AdFormat`].

use crate::definition::ToolDefinition;
use crate::format::{AdFormat, AgeRange, Gender};
use crate::request::{DEFAULT_STYLE, MIN_BID_FLOOR};
use crate::schema::SchemaBuilder;

/// Everything that differs between the ad tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdSurface {
    /// Format requested by default.
    pub format: AdFormat,
    /// Tool name shown to the model.
    pub name: String,
    /// Tool description shown to the model.
    pub description: String,
    /// Endpoint path on the ad API.
    pub endpoint: String,
    /// Node the result is redirected to, if any.
    pub render_agent: Option<String>,
}

impl AdSurface {
    /// Default surface for a format.
    #[must_use]
    pub fn for_format(format: AdFormat) -> Self {
        let (name, what, returns) = match format {
            AdFormat::Banner => (
                "ads4gpts_banner_tool",
                "Banner Ads",
                "each containing the ad creative, ad header, ad copy, and CTA link",
            ),
            AdFormat::Chat => ("ads4gpts_chat_tool", "Chat Ads", "each containing the Ad Text"),
            AdFormat::InlineSponsoredResponse => (
                "ads4gpts_inline_sponsored_response_tool",
                "Inline Sponsored Responses",
                "each containing a sponsored answer to render inline",
            ),
            AdFormat::SuggestedPrompt => (
                "ads4gpts_suggested_prompt_tool",
                "Suggested Prompts",
                "each containing a follow-up prompt and an optional link",
            ),
        };
        Self {
            format,
            name: name.to_string(),
            description: format!(
                "Retrieve relevant {what} based on the provided context. \
                 The richer the context, the better the ad fit. \
                 Returns a single ad or a list of ads, {returns}."
            ),
            endpoint: format.endpoint().to_string(),
            render_agent: None,
        }
    }

    /// Surfaces for every format.
    #[must_use]
    pub fn all() -> Vec<Self> {
        AdFormat::ALL.into_iter().map(Self::for_format).collect()
    }

    /// Redirect results to `agent`.
    #[must_use]
    pub fn with_render_agent(mut self, agent: impl Into<String>) -> Self {
        self.render_agent = Some(agent.into());
        self
    }

    /// Override the tool name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Override the endpoint path.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// JSON Schema of the tool input.
    #[must_use]
    pub fn input_schema(&self) -> serde_json::Value {
        let user = SchemaBuilder::new()
            .enum_values("gender", "Gender of the user", &Gender::VALUES, Some("undisclosed"))
            .enum_values(
                "age_range",
                "Age range of the user",
                &AgeRange::VALUES,
                Some("undisclosed"),
            )
            .string_default("persona", "Short description of the user", "")
            .closed();

        let formats = AdFormat::values();
        SchemaBuilder::new()
            .string("id", "Unique session id", true)
            .object("user", "Who the user is", user, false)
            .string("ad_recommendation", "What kind of ads would fit", true)
            .string("undesired_ads", "What kind of ads must not be shown", true)
            .string("context", "Summary of the conversation so far", true)
            .integer_min("num_ads", "Number of ads to retrieve", 1, Some(1.into()))
            .number_min(
                "min_bid",
                "Minimum bid for the ads",
                MIN_BID_FLOOR,
                Some(MIN_BID_FLOOR.into()),
            )
            .enum_values("ad_format", "Format of the ads", &formats, Some(self.format.as_str()))
            .string_default("style", "Tone of the ad creative", DEFAULT_STYLE)
            .string("tool_call_id", "Id of the originating tool call", false)
            .closed()
            .build()
    }

    /// Tool definition for this surface.
    #[must_use]
    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name.clone(), self.description.clone())
            .with_parameters(self.input_schema())
    }
}
