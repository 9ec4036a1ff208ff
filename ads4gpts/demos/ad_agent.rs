//! A short conversation with ads inserted by the frequency controller.
//!
//! The chat model is a local echo so only the ad API needs credentials.
//!
//! Run with:
//! ```bash
//! ADS4GPTS_API_KEY=your-key cargo run --example ad_agent
//! ADS4GPTS_API_KEY=your-key cargo run --example ad_agent -- --adaptive
//! ```

use ads4gpts::prelude::*;
use ads4gpts::{ChatAd, GraphRunResult};
use async_trait::async_trait;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

struct EchoModel;

#[async_trait]
impl ChatModel for EchoModel {
    fn name(&self) -> &str {
        "echo"
    }

    async fn complete(&self, history: &[Message]) -> Result<Message> {
        let last = history
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        Ok(Message::assistant(format!("You said: {last}")))
    }
}

fn print_turn(run: &GraphRunResult<ConversationState, TurnOutcome>, policy: FrequencyPolicy) {
    if let Some(reply) = &run.result.reply {
        println!("assistant> {}", reply.content);
    }
    match &run.result.ad {
        None => {}
        Some(response) => match response.ads::<ChatAd>(1) {
            Ok(ads) => {
                for ad in ads.into_vec() {
                    println!("      ad> {}", ad.ad_text);
                }
            }
            Err(_) => println!("      ad> {}", response.to_json()),
        },
    }
    println!(
        "          [nodes: {}, ad_counter: {}, threshold: {}]",
        run.history.join(" -> "),
        run.state.ad_counter,
        policy.threshold(&run.state)
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let policy = if std::env::args().any(|a| a == "--adaptive") {
        FrequencyPolicy::adaptive(1)
    } else {
        FrequencyPolicy::from_env()?
    };

    let client = AdClient::from_env()?;
    let tool = Arc::new(AdTool::new(AdSurface::for_format(AdFormat::Chat), client));
    tracing::debug!(
        function = %tool.definition().to_openai_function(),
        "Ad tool exposed to the model"
    );
    let deps = AdAgentDeps::new(Arc::new(EchoModel), tool)
        .with_policy(policy)
        .with_ad_recommendation("cooking, kitchenware")
        .with_undesired_ads("gambling, alcohol");
    let graph = build_ad_agent_graph()?;

    let mut state = policy.initial_state();
    for prompt in [
        "What should I cook tonight?",
        "Something with mushrooms.",
        "Do I need a cast iron pan?",
        "Thanks!",
        "One more question about risotto.",
    ] {
        println!("     user> {prompt}");
        state.push_user(prompt);
        let run = graph.run(state, deps.clone()).await?;
        print_turn(&run, policy);
        state = run.state;
    }

    Ok(())
}
