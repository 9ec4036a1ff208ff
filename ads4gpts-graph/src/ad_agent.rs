//! An agent that interleaves ads with its own turns.
//!
//! ```text
//! agent_node ──(Continue)──> END
//!     │
//!  (InsertAd)
//!     v
//! ad_node ──> clean_up_ad_node ──> END
//! ```
//!
//! The ad node records the tool call and its result as two turns so the
//! ad can be shown; the cleanup node retracts both so they never reach the
//! model's context on later turns.

use ads4gpts_core::{generate_session_id, BoxedChatModel, Message, Role, ToolCall};
use ads4gpts_tools::{AdResponse, BoxedTool, ToolContext, ToolOutcome, UserProfile};
use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};
use tracing::info;

use crate::error::{GraphError, GraphResult};
use crate::frequency::{FrequencyPolicy, Route};
use crate::graph::Graph;
use crate::node::{BaseNode, NodeResult};
use crate::state::{ConversationState, GraphRunContext};

/// Name of the node that calls the chat model.
pub const AGENT_NODE: &str = "agent_node";
/// Name of the node that fetches an ad.
pub const AD_NODE: &str = "ad_node";
/// Name of the node that retracts the ad turns.
pub const CLEAN_UP_AD_NODE: &str = "clean_up_ad_node";

/// Number of user/assistant turns summarized into the ad context.
pub const DEFAULT_CONTEXT_TURNS: usize = 10;

/// How a single graph run ended.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TurnOutcome {
    /// The assistant turn produced by the model.
    pub reply: Option<Message>,
    /// The ad shown after the reply, if one was inserted.
    pub ad: Option<AdResponse>,
}

/// Everything the ad-agent nodes need.
#[derive(Clone)]
pub struct AdAgentDeps {
    /// The chat model.
    pub model: BoxedChatModel,
    /// The ad tool.
    pub ad_tool: BoxedTool,
    /// When to insert ads.
    pub policy: FrequencyPolicy,
    /// Session id sent with every ad request.
    pub session_id: String,
    /// User attributes sent with every ad request.
    pub user: UserProfile,
    /// Hints about which ads fit.
    pub ad_recommendation: String,
    /// Hints about which ads must not be shown.
    pub undesired_ads: String,
    /// Ads per insertion.
    pub num_ads: u32,
    /// Turns summarized into the ad context.
    pub context_turns: usize,
}

impl std::fmt::Debug for AdAgentDeps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdAgentDeps")
            .field("model", &self.model.name())
            .field("ad_tool", &self.ad_tool.name())
            .field("policy", &self.policy)
            .field("session_id", &self.session_id)
            .finish_non_exhaustive()
    }
}

impl AdAgentDeps {
    /// Create deps with a fresh session id and the default policy.
    #[must_use]
    pub fn new(model: BoxedChatModel, ad_tool: BoxedTool) -> Self {
        Self {
            model,
            ad_tool,
            policy: FrequencyPolicy::default(),
            session_id: generate_session_id(),
            user: UserProfile::default(),
            ad_recommendation: String::new(),
            undesired_ads: String::new(),
            num_ads: 1,
            context_turns: DEFAULT_CONTEXT_TURNS,
        }
    }

    /// Set the frequency policy.
    #[must_use]
    pub fn with_policy(mut self, policy: FrequencyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the session id.
    #[must_use]
    pub fn with_session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = id.into();
        self
    }

    /// Set the user profile.
    #[must_use]
    pub fn with_user(mut self, user: UserProfile) -> Self {
        self.user = user;
        self
    }

    /// Set the ad recommendation hints.
    #[must_use]
    pub fn with_ad_recommendation(mut self, hints: impl Into<String>) -> Self {
        self.ad_recommendation = hints.into();
        self
    }

    /// Set the exclusion hints.
    #[must_use]
    pub fn with_undesired_ads(mut self, hints: impl Into<String>) -> Self {
        self.undesired_ads = hints.into();
        self
    }

    /// Set ads per insertion.
    #[must_use]
    pub fn with_num_ads(mut self, num_ads: u32) -> Self {
        self.num_ads = num_ads;
        self
    }

    /// Set how many turns feed the ad context.
    #[must_use]
    pub fn with_context_turns(mut self, turns: usize) -> Self {
        self.context_turns = turns;
        self
    }

    /// Tool arguments for the current conversation. `ad_format` is left to
    /// the tool's surface.
    #[must_use]
    pub fn ad_args(&self, state: &ConversationState) -> JsonValue {
        json!({
            "id": self.session_id,
            "user": self.user,
            "ad_recommendation": self.ad_recommendation,
            "undesired_ads": self.undesired_ads,
            "context": state.messages.transcript(self.context_turns),
            "num_ads": self.num_ads,
        })
    }
}

type Ctx = GraphRunContext<ConversationState, AdAgentDeps>;
type Next = GraphResult<NodeResult<ConversationState, AdAgentDeps, TurnOutcome>>;

/// Calls the chat model and decides whether an ad follows.
#[derive(Debug, Clone, Copy, Default)]
pub struct AgentNode;

#[async_trait]
impl BaseNode<ConversationState, AdAgentDeps, TurnOutcome> for AgentNode {
    fn name(&self) -> &str {
        AGENT_NODE
    }

    async fn run(&self, ctx: &mut Ctx) -> Next {
        let reply = ctx
            .deps
            .model
            .complete(ctx.state.messages.as_slice())
            .await
            .map_err(|e| GraphError::execution_failed(AGENT_NODE, e.to_string()))?;
        ctx.state.messages.push(reply.clone());

        let policy = ctx.deps.policy;
        policy.after_turn(&mut ctx.state);
        let route = policy.decide(&ctx.state);
        info!(
            ad_counter = ctx.state.ad_counter,
            threshold = policy.threshold(&ctx.state),
            ?route,
            "Routing after agent turn"
        );

        Ok(match route {
            Route::Continue => NodeResult::end(TurnOutcome {
                reply: Some(reply),
                ad: None,
            }),
            Route::InsertAd => NodeResult::next_named(AD_NODE),
        })
    }
}

/// Fetches an ad through the ad tool.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdNode;

#[async_trait]
impl BaseNode<ConversationState, AdAgentDeps, TurnOutcome> for AdNode {
    fn name(&self) -> &str {
        AD_NODE
    }

    async fn run(&self, ctx: &mut Ctx) -> Next {
        let tool_name = ctx.deps.ad_tool.name();
        let args = ctx.deps.ad_args(&ctx.state);
        let call = ToolCall::new(tool_name.clone(), args.clone());
        let tool_ctx = ToolContext::new()
            .with_run_id(ctx.run_id.clone())
            .for_tool(tool_name.clone(), call.id.clone());
        let call_id = call.id.clone();
        ctx.state
            .messages
            .push(Message::assistant("").with_tool_call(call));

        let outcome = ctx.deps.ad_tool.call(&tool_ctx, args).await;
        let next = match outcome {
            ToolOutcome::Value(response) => {
                ctx.state.messages.push(Message::tool(
                    tool_name,
                    call_id,
                    response.to_json().to_string(),
                ));
                CLEAN_UP_AD_NODE.to_string()
            }
            ToolOutcome::Redirect { goto, message, .. } => {
                ctx.state.messages.push(message);
                goto
            }
        };

        let policy = ctx.deps.policy;
        policy.after_ad(&mut ctx.state)?;
        info!(
            next = %next,
            threshold = policy.threshold(&ctx.state),
            "Ad inserted"
        );
        Ok(NodeResult::next_named(next))
    }
}

/// Retracts the ad turns and ends the run.
#[derive(Debug, Clone, Copy, Default)]
pub struct CleanUpAdNode;

impl CleanUpAdNode {
    fn ad_from(message: &Message) -> AdResponse {
        match serde_json::from_str::<JsonValue>(&message.content) {
            Ok(JsonValue::Object(map)) if map.len() == 1 && map.contains_key("error") => {
                AdResponse::error(map["error"].as_str().unwrap_or_default())
            }
            Ok(body) => AdResponse::Ads(body),
            Err(_) => AdResponse::Ads(JsonValue::String(message.content.clone())),
        }
    }
}

#[async_trait]
impl BaseNode<ConversationState, AdAgentDeps, TurnOutcome> for CleanUpAdNode {
    fn name(&self) -> &str {
        CLEAN_UP_AD_NODE
    }

    async fn run(&self, ctx: &mut Ctx) -> Next {
        let ad = ctx
            .state
            .messages
            .last()
            .filter(|m| m.role == Role::Tool)
            .map(Self::ad_from);

        let updates = ctx.state.messages.retract_last(2);
        ctx.state.messages.apply_all(updates);

        let reply = ctx
            .state
            .messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant && !m.has_tool_calls())
            .cloned();

        Ok(NodeResult::end(TurnOutcome { reply, ad }))
    }
}

/// The ad-agent graph type.
pub type AdAgentGraph = Graph<ConversationState, AdAgentDeps, TurnOutcome>;

/// Wire `agent_node → {END | ad_node} → clean_up_ad_node → END`.
///
/// # Errors
///
/// Never fails for the built-in wiring; the `Result` mirrors
/// [`Graph::build`].
pub fn build_ad_agent_graph() -> GraphResult<AdAgentGraph> {
    Graph::new()
        .with_name("ad_agent")
        .node(AGENT_NODE, AgentNode)
        .node(AD_NODE, AdNode)
        .node(CLEAN_UP_AD_NODE, CleanUpAdNode)
        .entry(AGENT_NODE)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ads4gpts_core::{AdError, ChatModel};
    use ads4gpts_tools::{AdClient, AdClientConfig, AdFormat, AdSurface, AdTool};
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct ScriptedModel {
        replies: Mutex<VecDeque<String>>,
    }

    impl ScriptedModel {
        fn new(replies: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            })
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, _history: &[Message]) -> ads4gpts_core::Result<Message> {
            self.replies
                .lock()
                .pop_front()
                .map(Message::assistant)
                .ok_or_else(|| AdError::model("script exhausted"))
        }
    }

    fn chat_tool(base_url: &str) -> BoxedTool {
        let client = AdClient::new(AdClientConfig::new("k").with_base_url(base_url)).unwrap();
        Arc::new(AdTool::new(AdSurface::for_format(AdFormat::Chat), client))
    }

    async fn mock_ads() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat_ads"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": {"ads": {"ad_text": "Try Brew Co."}}})),
            )
            .mount(&server)
            .await;
        server
    }

    async fn take_turn(
        graph: &AdAgentGraph,
        state: ConversationState,
        deps: &AdAgentDeps,
        user: &str,
    ) -> (TurnOutcome, ConversationState, Vec<String>) {
        let state = state.with_message(Message::user(user));
        let result = graph.run(state, deps.clone()).await.unwrap();
        (result.result, result.state, result.history)
    }

    #[test]
    fn test_graph_wiring() {
        let graph = build_ad_agent_graph().unwrap();
        assert_eq!(graph.node_count(), 3);
        assert!(graph.contains(AGENT_NODE));
        assert!(graph.contains(AD_NODE));
        assert!(graph.contains(CLEAN_UP_AD_NODE));
    }

    #[tokio::test]
    async fn test_fixed_policy_inserts_ad_every_second_turn() {
        let server = mock_ads().await;
        let model = ScriptedModel::new(&["one", "two", "three"]);
        let deps = AdAgentDeps::new(model, chat_tool(&server.uri()))
            .with_policy(FrequencyPolicy::fixed(2))
            .with_session_id("sess_test");
        let graph = build_ad_agent_graph().unwrap();
        let state = deps.policy.initial_state();

        let (outcome, state, history) = take_turn(&graph, state, &deps, "hi").await;
        assert_eq!(history, vec![AGENT_NODE]);
        assert!(outcome.ad.is_none());
        assert_eq!(outcome.reply.unwrap().content, "one");
        assert_eq!(state.ad_counter, 1);

        let (outcome, state, history) = take_turn(&graph, state, &deps, "coffee?").await;
        assert_eq!(history, vec![AGENT_NODE, AD_NODE, CLEAN_UP_AD_NODE]);
        assert_eq!(outcome.reply.unwrap().content, "two");
        let ad = outcome.ad.unwrap();
        assert_eq!(ad.to_json()["data"]["ads"]["ad_text"], "Try Brew Co.");
        assert_eq!(state.ad_counter, 0);
        assert_eq!(state.messages.len(), 4);
        assert!(state.messages.iter().all(|m| m.role != Role::Tool));

        let (outcome, state, _) = take_turn(&graph, state, &deps, "thanks").await;
        assert!(outcome.ad.is_none());
        assert_eq!(state.ad_counter, 1);
    }

    #[tokio::test]
    async fn test_adaptive_policy_backs_off() {
        let server = mock_ads().await;
        let replies: Vec<String> = (0..8).map(|i| format!("reply {i}")).collect();
        let refs: Vec<&str> = replies.iter().map(String::as_str).collect();
        let deps = AdAgentDeps::new(ScriptedModel::new(&refs), chat_tool(&server.uri()))
            .with_policy(FrequencyPolicy::adaptive(1));
        let graph = build_ad_agent_graph().unwrap();
        let mut state = deps.policy.initial_state();

        let mut ad_turns = Vec::new();
        for turn in 1..=8 {
            let (outcome, next, _) = take_turn(&graph, state, &deps, "hello").await;
            if outcome.ad.is_some() {
                ad_turns.push(turn);
            }
            state = next;
        }
        // thresholds 1, 2, 3, 5 after each ad
        assert_eq!(ad_turns, vec![1, 3, 6]);
        assert_eq!(state.ad_frequency, Some(5));
    }

    #[tokio::test]
    async fn test_adaptive_seed_with_plain_state() {
        let server = mock_ads().await;
        let model = ScriptedModel::new(&["a", "b", "c"]);
        let deps = AdAgentDeps::new(model, chat_tool(&server.uri()))
            .with_policy(FrequencyPolicy::adaptive(3));
        let graph = build_ad_agent_graph().unwrap();
        let mut state = ConversationState::new();

        let mut ads = Vec::new();
        for _ in 0..3 {
            let (outcome, next, _) = take_turn(&graph, state, &deps, "hello").await;
            ads.push(outcome.ad.is_some());
            state = next;
        }
        assert_eq!(ads, vec![false, false, true]);
        assert_eq!(state.ad_frequency, Some(5));
    }

    #[tokio::test]
    async fn test_ad_request_carries_context() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat_ads"))
            .and(wiremock::matchers::body_partial_json(json!({
                "id": "sess_ctx",
                "context": "user: best espresso?\nassistant: Try a ristretto.",
                "ad_format": "CHAT",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ads": "x"})))
            .expect(1)
            .mount(&server)
            .await;

        let model = ScriptedModel::new(&["Try a ristretto."]);
        let deps = AdAgentDeps::new(model, chat_tool(&server.uri()))
            .with_session_id("sess_ctx")
            .with_ad_recommendation("coffee")
            .with_undesired_ads("none");
        let graph = build_ad_agent_graph().unwrap();

        let (outcome, _, _) =
            take_turn(&graph, ConversationState::new(), &deps, "best espresso?").await;
        assert_eq!(outcome.ad, Some(AdResponse::Ads(json!({"ads": "x"}))));
    }

    #[tokio::test]
    async fn test_ad_failure_does_not_break_turn() {
        let deps = AdAgentDeps::new(ScriptedModel::new(&["sure"]), chat_tool("http://127.0.0.1:1"));
        let graph = build_ad_agent_graph().unwrap();

        let (outcome, state, history) =
            take_turn(&graph, ConversationState::new(), &deps, "hi").await;
        assert_eq!(history, vec![AGENT_NODE, AD_NODE, CLEAN_UP_AD_NODE]);
        assert!(outcome.ad.unwrap().is_error());
        assert_eq!(outcome.reply.unwrap().content, "sure");
        assert_eq!(state.ad_counter, 0);
    }

    #[tokio::test]
    async fn test_redirect_to_unknown_render_agent_fails() {
        let config = AdClientConfig::new("k").with_base_url("http://127.0.0.1:1");
        let client = AdClient::new(config).unwrap();
        let tool = AdTool::new(AdSurface::for_format(AdFormat::Chat), client)
            .with_render_agent("render");
        let deps = AdAgentDeps::new(ScriptedModel::new(&["ok"]), Arc::new(tool));
        let graph = build_ad_agent_graph().unwrap();

        let err = graph
            .run(ConversationState::new().with_message(Message::user("hi")), deps)
            .await
            .unwrap_err();
        assert!(matches!(err, GraphError::NodeNotFound(name) if name == "render"));
    }

    #[tokio::test]
    async fn test_model_failure_is_execution_error() {
        let deps = AdAgentDeps::new(ScriptedModel::new(&[]), chat_tool("http://127.0.0.1:1"));
        let graph = build_ad_agent_graph().unwrap();

        let err = graph.run(ConversationState::new(), deps).await.unwrap_err();
        assert!(matches!(err, GraphError::ExecutionFailed { ref node, .. } if node == AGENT_NODE));
    }

    #[test]
    fn test_ad_from_error_message() {
        let msg = Message::tool("t", "c", r#"{"error":"HTTP error: 403 Forbidden"}"#);
        assert_eq!(
            CleanUpAdNode::ad_from(&msg),
            AdResponse::error("HTTP error: 403 Forbidden")
        );
    }
}
