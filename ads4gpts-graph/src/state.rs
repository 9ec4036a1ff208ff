//! Graph state types.

use ads4gpts_core::{Message, MessageLog};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Threshold used when nothing else is configured.
pub const DEFAULT_AD_FREQUENCY: u64 = 1;

/// Trait for graph state types.
pub trait GraphState: Clone + Send + Sync + Debug + 'static {}

impl<T> GraphState for T where T: Clone + Send + Sync + Debug + 'static {}

/// State carried through the ad-agent graph and across turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    /// The conversation log.
    #[serde(default)]
    pub messages: MessageLog,
    /// Assistant turns since the last ad.
    #[serde(default)]
    pub ad_counter: u64,
    /// Current threshold of the adaptive policy; unset until the policy
    /// seeds or advances it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ad_frequency: Option<u64>,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self {
            messages: MessageLog::new(),
            ad_counter: 0,
            ad_frequency: None,
        }
    }
}

impl ConversationState {
    /// Create an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the adaptive threshold.
    #[must_use]
    pub fn with_ad_frequency(mut self, ad_frequency: u64) -> Self {
        self.ad_frequency = Some(ad_frequency);
        self
    }

    /// Append a message.
    #[must_use]
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Append a user turn.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }
}

/// Context passed to nodes during execution.
#[derive(Debug, Clone)]
pub struct GraphRunContext<State, Deps = ()> {
    /// Current state.
    pub state: State,
    /// Dependencies.
    pub deps: Deps,
    /// Current step number.
    pub step: u32,
    /// Unique run identifier.
    pub run_id: String,
    /// Maximum steps allowed.
    pub max_steps: u32,
}

impl<State, Deps> GraphRunContext<State, Deps> {
    /// Create a new context.
    pub fn new(state: State, deps: Deps, run_id: impl Into<String>) -> Self {
        Self {
            state,
            deps,
            step: 0,
            run_id: run_id.into(),
            max_steps: 100,
        }
    }

    /// Set maximum steps.
    #[must_use]
    pub fn with_max_steps(mut self, max: u32) -> Self {
        self.max_steps = max;
        self
    }

    /// Increment step counter.
    pub fn increment_step(&mut self) {
        self.step += 1;
    }
}

/// Result of a graph run.
#[derive(Debug, Clone)]
pub struct GraphRunResult<State, End = ()> {
    /// Final result value.
    pub result: End,
    /// Final state.
    pub state: State,
    /// Number of steps executed.
    pub steps: u32,
    /// History of node names visited.
    pub history: Vec<String>,
    /// Run ID.
    pub run_id: String,
}

impl<State, End> GraphRunResult<State, End> {
    /// Create a new result.
    pub fn new(result: End, state: State, steps: u32, run_id: impl Into<String>) -> Self {
        Self {
            result,
            state,
            steps,
            history: Vec::new(),
            run_id: run_id.into(),
        }
    }

    /// Add history.
    #[must_use]
    pub fn with_history(mut self, history: Vec<String>) -> Self {
        self.history = history;
        self
    }
}
