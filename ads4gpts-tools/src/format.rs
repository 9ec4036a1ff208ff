//! Closed enumerations used in ad requests.
//!
//! Every enum serializes to the exact string the ad API expects and refuses
//! anything outside its value set.

use serde::{Deserialize, Serialize};

/// Presentation surface of a returned ad.
///
/// Each format has its own endpoint on the ad API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdFormat {
    /// Image banner with title, body and call to action.
    Banner,
    /// Plain-text ad woven into a chat turn.
    Chat,
    /// A full sponsored answer rendered inline.
    InlineSponsoredResponse,
    /// A suggested follow-up prompt.
    SuggestedPrompt,
}

impl AdFormat {
    /// All formats, in endpoint order.
    pub const ALL: [AdFormat; 4] = [
        Self::Banner,
        Self::Chat,
        Self::InlineSponsoredResponse,
        Self::SuggestedPrompt,
    ];

    /// Get the wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Banner => "BANNER",
            Self::Chat => "CHAT",
            Self::InlineSponsoredResponse => "INLINE_SPONSORED_RESPONSE",
            Self::SuggestedPrompt => "SUGGESTED_PROMPT",
        }
    }

    /// Get the endpoint path on the ad API.
    #[must_use]
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Banner => "/api/v1/banner_ads",
            Self::Chat => "/api/v1/chat_ads",
            Self::InlineSponsoredResponse => "/api/v1/inline_sponsored_responses",
            Self::SuggestedPrompt => "/api/v1/suggested_prompts",
        }
    }

    /// Wire values of every format.
    #[must_use]
    pub fn values() -> Vec<&'static str> {
        Self::ALL.iter().map(Self::as_str).collect()
    }
}

impl std::fmt::Display for AdFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Self-reported gender of the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Female.
    Female,
    /// Male.
    Male,
    /// Non-binary.
    NonBinary,
    /// Not disclosed.
    #[default]
    Undisclosed,
}

impl Gender {
    /// Wire values of every variant.
    pub const VALUES: [&'static str; 4] = ["female", "male", "non_binary", "undisclosed"];
}

/// Age bracket of the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeRange {
    /// Younger than 18.
    #[serde(rename = "under_18")]
    Under18,
    /// 18 to 24.
    #[serde(rename = "18-24")]
    From18To24,
    /// 25 to 34.
    #[serde(rename = "25-34")]
    From25To34,
    /// 35 to 44.
    #[serde(rename = "35-44")]
    From35To44,
    /// 45 to 54.
    #[serde(rename = "45-54")]
    From45To54,
    /// 55 to 64.
    #[serde(rename = "55-64")]
    From55To64,
    /// 65 or older.
    #[serde(rename = "65_over")]
    Over65,
    /// Not disclosed.
    #[default]
    #[serde(rename = "undisclosed")]
    Undisclosed,
}

impl AgeRange {
    /// Wire values of every variant.
    pub const VALUES: [&'static str; 8] = [
        "under_18",
        "18-24",
        "25-34",
        "35-44",
        "45-54",
        "55-64",
        "65_over",
        "undisclosed",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AdFormat::Banner, "/api/v1/banner_ads")]
    #[case(AdFormat::Chat, "/api/v1/chat_ads")]
    #[case(AdFormat::InlineSponsoredResponse, "/api/v1/inline_sponsored_responses")]
    #[case(AdFormat::SuggestedPrompt, "/api/v1/suggested_prompts")]
    fn test_endpoints_are_distinct(#[case] format: AdFormat, #[case] path: &str) {
        assert_eq!(format.endpoint(), path);
    }

    #[test]
    fn test_format_wire_values_match_serde() {
        for format in AdFormat::ALL {
            let json = serde_json::to_value(format).unwrap();
            assert_eq!(json, serde_json::json!(format.as_str()));
        }
    }

    #[test]
    fn test_unknown_format_rejected() {
        let result: Result<AdFormat, _> = serde_json::from_value(serde_json::json!("POPUP"));
        assert!(result.is_err());
    }

    #[test]
    fn test_gender_defaults_to_undisclosed() {
        assert_eq!(Gender::default(), Gender::Undisclosed);
        let json = serde_json::to_value(Gender::NonBinary).unwrap();
        assert_eq!(json, serde_json::json!("non_binary"));
    }

    #[test]
    fn test_age_range_values_round_trip() {
        for value in AgeRange::VALUES {
            let parsed: AgeRange = serde_json::from_value(serde_json::json!(value)).unwrap();
            assert_eq!(serde_json::to_value(parsed).unwrap(), serde_json::json!(value));
        }
        assert_eq!(AgeRange::default(), AgeRange::Undisclosed);
    }
}
