//! Fetch ads for every format with the blocking client.
//!
//! Run with:
//! ```bash
//! ADS4GPTS_API_KEY=your-key cargo run --example fetch_ads
//! ```

use ads4gpts::prelude::*;
use ads4gpts::{BannerAd, ChatAd, PromptAd};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AdClientConfig::from_env()?.with_retry(RetryPolicy::for_ads_api());
    let client = AdClient::new(config)?;
    tracing::info!(
        base_url = client.base_url(),
        max_attempts = client.retry_policy().max_attempts,
        "Fetching ads"
    );

    for format in AdFormat::ALL {
        let request = AdRequest::new(
            ads4gpts::generate_session_id(),
            "running shoes, fitness trackers",
            "gambling",
            "The user is training for their first marathon",
        )
        .with_user(UserProfile::new().with_persona("amateur runner"))
        .with_format(format);

        let response = client.get_ads_blocking(&request);
        println!("== {format} ==");
        if let Some(error) = response.error_message() {
            println!("error: {error}");
            continue;
        }
        let rendered = match format {
            AdFormat::Banner => response
                .ads::<BannerAd>(1)
                .map(|ads| ads.into_vec().into_iter().map(|a| a.ad_title).collect::<Vec<_>>()),
            AdFormat::Chat | AdFormat::InlineSponsoredResponse => response
                .ads::<ChatAd>(1)
                .map(|ads| ads.into_vec().into_iter().map(|a| a.ad_text).collect()),
            AdFormat::SuggestedPrompt => response
                .ads::<PromptAd>(1)
                .map(|ads| ads.into_vec().into_iter().map(|a| a.ad_prompt).collect()),
        };
        match rendered {
            Ok(lines) => lines.iter().for_each(|line| println!("{line}")),
            Err(_) => println!("{}", response.to_json()),
        }
    }

    Ok(())
}
