//! The ad request payload.
//!
//! An [`AdRequest`] is built fresh for every retrieval, validated, sent and
//! dropped. It can be built in code with the `with_*` methods or parsed
//! from untyped tool-call arguments with [`AdRequest::from_args`]; both
//! paths end in [`AdRequest::validate`].

use ads4gpts_core::AdError;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::format::{AdFormat, AgeRange, Gender};

/// Style tag sent when none is given.
pub const DEFAULT_STYLE: &str = "neutral";

/// Lowest bid the ad API accepts.
pub const MIN_BID_FLOOR: f64 = 0.01;

/// Format used when neither the caller nor the tool picks one.
pub const DEFAULT_FORMAT: AdFormat = AdFormat::Chat;

/// Wire name of the routing-only correlation field.
pub const TOOL_CALL_ID_FIELD: &str = "tool_call_id";

/// Demographic and persona attributes of the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserProfile {
    /// Self-reported gender.
    #[serde(default)]
    pub gender: Gender,
    /// Age bracket.
    #[serde(default)]
    pub age_range: AgeRange,
    /// Free-text persona description.
    #[serde(default)]
    pub persona: String,
}

impl UserProfile {
    /// Create an undisclosed profile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the gender.
    #[must_use]
    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    /// Set the age range.
    #[must_use]
    pub fn with_age_range(mut self, age_range: AgeRange) -> Self {
        self.age_range = age_range;
        self
    }

    /// Set the persona.
    #[must_use]
    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }
}

/// A validated request for ads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AdRequestArgs")]
pub struct AdRequest {
    /// Session id.
    pub id: String,
    /// User attributes.
    pub user: UserProfile,
    /// Hints about which ads fit.
    pub ad_recommendation: String,
    /// Hints about which ads must not be shown.
    pub undesired_ads: String,
    /// Summary of the conversation so far.
    pub context: String,
    /// How many ads to return.
    pub num_ads: u32,
    /// Minimum bid an ad must carry.
    pub min_bid: f64,
    /// Requested surface.
    pub ad_format: AdFormat,
    /// Style tag for the creative.
    pub style: String,
    /// Correlation id of the tool call that triggered the request.
    ///
    /// Routing metadata only; never part of the HTTP body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl AdRequest {
    /// Create a request with the required fields and documented defaults.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        ad_recommendation: impl Into<String>,
        undesired_ads: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            user: UserProfile::default(),
            ad_recommendation: ad_recommendation.into(),
            undesired_ads: undesired_ads.into(),
            context: context.into(),
            num_ads: 1,
            min_bid: MIN_BID_FLOOR,
            ad_format: DEFAULT_FORMAT,
            style: DEFAULT_STYLE.to_string(),
            tool_call_id: None,
        }
    }

    /// Set the user profile.
    #[must_use]
    pub fn with_user(mut self, user: UserProfile) -> Self {
        self.user = user;
        self
    }

    /// Set the number of ads.
    #[must_use]
    pub fn with_num_ads(mut self, num_ads: u32) -> Self {
        self.num_ads = num_ads;
        self
    }

    /// Set the minimum bid.
    #[must_use]
    pub fn with_min_bid(mut self, min_bid: f64) -> Self {
        self.min_bid = min_bid;
        self
    }

    /// Set the ad format.
    #[must_use]
    pub fn with_format(mut self, format: AdFormat) -> Self {
        self.ad_format = format;
        self
    }

    /// Set the style tag.
    #[must_use]
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    /// Set the tool-call correlation id.
    #[must_use]
    pub fn with_tool_call_id(mut self, id: impl Into<String>) -> Self {
        self.tool_call_id = Some(id.into());
        self
    }

    /// Parse untyped tool arguments.
    ///
    /// `default_format` fills `ad_format` when the arguments omit it.
    ///
    /// # Errors
    ///
    /// Returns [`AdError::Validation`] for non-object input, unknown keys,
    /// out-of-set enum values, missing required fields or out-of-range
    /// numbers.
    pub fn from_args(args: JsonValue, default_format: AdFormat) -> Result<Self, AdError> {
        if !args.is_object() {
            return Err(AdError::invalid("ad request must be a JSON object"));
        }
        let raw: AdRequestArgs =
            serde_json::from_value(args).map_err(|e| AdError::invalid(e.to_string()))?;
        raw.into_request(default_format)
    }

    /// Check every field constraint.
    ///
    /// # Errors
    ///
    /// Returns [`AdError::Validation`] naming the first offending field.
    pub fn validate(&self) -> Result<(), AdError> {
        if self.id.trim().is_empty() {
            return Err(AdError::validation("id", "must not be empty"));
        }
        if self.num_ads < 1 {
            return Err(AdError::validation("num_ads", "must be >= 1"));
        }
        if !self.min_bid.is_finite() || self.min_bid < MIN_BID_FLOOR {
            return Err(AdError::validation(
                "min_bid",
                format!("must be >= {MIN_BID_FLOOR}"),
            ));
        }
        Ok(())
    }

    /// Build the HTTP body: every field except the correlation id.
    ///
    /// # Errors
    ///
    /// Returns [`AdError::Json`] if serialization fails.
    pub fn to_body(&self) -> Result<JsonValue, AdError> {
        let mut body = serde_json::to_value(self)?;
        if let Some(map) = body.as_object_mut() {
            map.remove(TOOL_CALL_ID_FIELD);
        }
        Ok(body)
    }
}

/// Loosely typed mirror of [`AdRequest`] used during parsing.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AdRequestArgs {
    id: Option<String>,
    #[serde(default)]
    user: Option<UserProfile>,
    ad_recommendation: Option<String>,
    undesired_ads: Option<String>,
    context: Option<String>,
    num_ads: Option<i64>,
    min_bid: Option<f64>,
    ad_format: Option<AdFormat>,
    style: Option<String>,
    tool_call_id: Option<String>,
}

fn required(value: Option<String>, field: &str) -> Result<String, AdError> {
    value.ok_or_else(|| AdError::validation(field, "field required"))
}

impl AdRequestArgs {
    fn into_request(self, default_format: AdFormat) -> Result<AdRequest, AdError> {
        let num_ads = match self.num_ads {
            None => 1,
            Some(n) if n < 1 => return Err(AdError::validation("num_ads", "must be >= 1")),
            Some(n) => u32::try_from(n)
                .map_err(|_| AdError::validation("num_ads", "is too large"))?,
        };

        let request = AdRequest {
            id: required(self.id, "id")?,
            user: self.user.unwrap_or_default(),
            ad_recommendation: required(self.ad_recommendation, "ad_recommendation")?,
            undesired_ads: required(self.undesired_ads, "undesired_ads")?,
            context: required(self.context, "context")?,
            num_ads,
            min_bid: self.min_bid.unwrap_or(MIN_BID_FLOOR),
            ad_format: self.ad_format.unwrap_or(default_format),
            style: self.style.unwrap_or_else(|| DEFAULT_STYLE.to_string()),
            tool_call_id: self.tool_call_id,
        };
        request.validate()?;
        Ok(request)
    }
}

impl TryFrom<AdRequestArgs> for AdRequest {
    type Error = AdError;

    fn try_from(raw: AdRequestArgs) -> Result<Self, Self::Error> {
        raw.into_request(DEFAULT_FORMAT)
    }
}
