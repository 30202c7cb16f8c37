use serde::{Deserialize, Serialize};

use sc_balance::ThresholdPolicy;
use sc_text::ParseConfig;

use crate::error::StudioResult;

/// Image reference used for a scene whose image could not be generated.
pub const PLACEHOLDER_IMAGE: &str = "placeholders/scene.jpg";

/// Parser and balance settings shared by every job.
///
/// Every field is optional in the JSON form; unknown fields are rejected.
///
/// ```json
/// { "parse": { "sentence_cap": 120 }, "thresholds": { "high": 0.5 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoryConfig {
    /// Chapter parser settings.
    pub parse: ParseConfig,
    /// Ending condition thresholds.
    pub thresholds: ThresholdPolicy,
    /// Image reference substituted for missing scene images.
    pub placeholder_image: String,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            parse: ParseConfig::default(),
            thresholds: ThresholdPolicy::default(),
            placeholder_image: PLACEHOLDER_IMAGE.to_string(),
        }
    }
}

impl StoryConfig {
    /// Parse a JSON configuration document.
    pub fn from_json(json: &str) -> StudioResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the parser settings.
    pub fn with_parse(mut self, parse: ParseConfig) -> Self {
        self.parse = parse;
        self
    }

    /// Set the threshold policy.
    pub fn with_thresholds(mut self, thresholds: ThresholdPolicy) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Set the placeholder image reference.
    pub fn with_placeholder_image(mut self, reference: impl Into<String>) -> Self {
        self.placeholder_image = reference.into();
        self
    }
}
