//! The chat-completion collaborator.
//!
//! ads4gpts does not talk to language models itself. Hosting applications
//! plug their own model in through [`ChatModel`].

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::Result;
use crate::messages::Message;

/// Produces the next assistant turn from a conversation history.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Get a name for logging.
    fn name(&self) -> &str {
        "chat-model"
    }

    /// Complete the conversation with exactly one new turn.
    async fn complete(&self, history: &[Message]) -> Result<Message>;
}

/// Type-erased shared chat model.
pub type BoxedChatModel = Arc<dyn ChatModel>;

#[async_trait]
impl<M: ChatModel + ?Sized> ChatModel for Arc<M> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn complete(&self, history: &[Message]) -> Result<Message> {
        (**self).complete(history).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl ChatModel for Echo {
        async fn complete(&self, history: &[Message]) -> Result<Message> {
            let last = history.last().map(|m| m.content.clone()).unwrap_or_default();
            Ok(Message::assistant(last))
        }
    }

    #[tokio::test]
    async fn test_arc_model_delegates() {
        let model: BoxedChatModel = Arc::new(Echo);
        let reply = model.complete(&[Message::user("ping")]).await.unwrap();
        assert_eq!(reply.content, "ping");
        assert_eq!(model.name(), "chat-model");
    }
}
