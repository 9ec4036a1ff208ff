//! Ad API responses.
//!
//! [`AdResponse`] carries the parsed body verbatim. The typed creatives
//! ([`BannerAd`], [`ChatAd`], [`PromptAd`]) are opt-in views over the
//! `{"status": ..., "data": {"ads": ...}}` envelope.

use ads4gpts_core::{AdError, ErrorInfo};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Result of one retrieval.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AdResponse {
    /// The parsed response body, unmodified.
    Ads(JsonValue),
    /// Any failure, normalized.
    Error {
        /// Human-readable message.
        error: String,
    },
}

impl AdResponse {
    /// Build an error response.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    /// Whether this is an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// The error message, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { error } => Some(error),
            Self::Ads(_) => None,
        }
    }

    /// The body, or `{"error": "<message>"}`.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Ads(body) => body.clone(),
            Self::Error { error } => serde_json::json!({ "error": error }),
        }
    }

    /// Extract typed ads from the `data.ads` envelope.
    ///
    /// A list is collapsed to its first element when `num_ads` is 1.
    ///
    /// # Errors
    ///
    /// Returns [`AdError::Decode`] for error responses, a missing envelope
    /// or ads that do not match `T`.
    pub fn ads<T: DeserializeOwned>(&self, num_ads: u32) -> Result<Ads<T>, AdError> {
        let body = match self {
            Self::Ads(body) => body,
            Self::Error { error } => return Err(AdError::decode(error.clone())),
        };
        let ads = body
            .pointer("/data/ads")
            .filter(|v| !v.is_null())
            .ok_or_else(|| AdError::decode("Invalid response: no 'ads' field found."))?;

        match ads {
            JsonValue::Array(items) => {
                let mut list: Vec<T> = items
                    .iter()
                    .map(|item| T::deserialize(item))
                    .collect::<Result<_, _>>()
                    .map_err(|e| AdError::decode(e.to_string()))?;
                if num_ads > 1 {
                    Ok(Ads::List(list))
                } else if list.is_empty() {
                    Err(AdError::decode("Invalid response: empty 'ads' list."))
                } else {
                    Ok(Ads::Single(list.swap_remove(0)))
                }
            }
            single => T::deserialize(single)
                .map(Ads::Single)
                .map_err(|e| AdError::decode(e.to_string())),
        }
    }
}

impl From<AdError> for AdResponse {
    fn from(err: AdError) -> Self {
        Self::error(err.to_string())
    }
}

impl From<ErrorInfo> for AdResponse {
    fn from(info: ErrorInfo) -> Self {
        Self::error(info.error)
    }
}

/// One ad or several, depending on how many were requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ads<T> {
    /// A single ad.
    Single(T),
    /// Several ads.
    List(Vec<T>),
}

impl<T> Ads<T> {
    /// Flatten into a vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Single(ad) => vec![ad],
            Self::List(ads) => ads,
        }
    }
}

/// An image banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerAd {
    /// Image URL.
    pub ad_creative: String,
    /// Headline.
    pub ad_title: String,
    /// Body copy.
    pub ad_body: String,
    /// Click-through URL.
    pub ad_link: String,
    /// Call-to-action label.
    pub ad_link_cta: String,
}

/// A text ad for a chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatAd {
    /// The ad copy.
    pub ad_text: String,
}

/// A suggested follow-up prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptAd {
    /// Prompt text offered to the user.
    pub ad_prompt: String,
    /// Optional click-through URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ad_link: Option<String>,
}
