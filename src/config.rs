//! Start-up configuration.
//!
//! Every option has a default matching the portfolio page, so an empty JSON
//! object is a valid configuration. Keys are camelCase (`typeDelayMs`,
//! `pauseMs`, ...).

use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};
use crate::types::{Millis, Threshold};

// =============================================================================
// Typing
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TypingConfig {
    pub phrases: Vec<String>,
    pub type_delay_ms: Millis,
    pub delete_delay_ms: Millis,
    pub pause_ms: Millis,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            phrases: [
                "Data Analyst",
                "Python Developer",
                "Advanced Dashboard Developer",
                "SQL Developer",
                "Power BI Developer",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            type_delay_ms: 120,
            delete_delay_ms: 75,
            pause_ms: 2500,
        }
    }
}

impl TypingConfig {
    pub fn with_phrases<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            phrases: phrases.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.phrases.is_empty() {
            return Err(FolioError::EmptyPhrases);
        }
        // A zero delay lets the loop reschedule itself at the same instant forever
        for (name, delay) in [
            ("typeDelayMs", self.type_delay_ms),
            ("deleteDelayMs", self.delete_delay_ms),
            ("pauseMs", self.pause_ms),
        ] {
            if delay == 0 {
                return Err(FolioError::ZeroDelay(name));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Visibility
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WatchConfig {
    pub threshold: f32,
    /// Pixels trimmed off the bottom of the viewport before intersecting.
    pub root_margin_bottom: f32,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            threshold: Threshold::DEFAULT.value(),
            root_margin_bottom: 80.0,
        }
    }
}

impl WatchConfig {
    pub fn threshold(&self) -> Result<Threshold> {
        Threshold::new(self.threshold)
    }
}

// =============================================================================
// Page
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FolioConfig {
    pub typing: TypingConfig,
    pub watch: WatchConfig,
    /// How long the loading screen covers the page.
    pub load_delay_ms: Millis,
    /// How long a notification stays up.
    pub notification_ms: Millis,
    /// Simulated contact-form round trip.
    pub submit_delay_ms: Millis,
    pub navbar_height: f32,
    /// Scroll offset past which the navbar is marked scrolled.
    pub navbar_scrolled_after: f32,
    /// Look-ahead added to the scroll offset when picking the active section.
    pub nav_offset: f32,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            typing: TypingConfig::default(),
            watch: WatchConfig::default(),
            load_delay_ms: 2000,
            notification_ms: 4500,
            submit_delay_ms: 2000,
            navbar_height: 70.0,
            navbar_scrolled_after: 100.0,
            nav_offset: 150.0,
        }
    }
}

impl FolioConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: FolioConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.typing.validate()?;
        self.watch.threshold()?;
        Ok(())
    }
}
