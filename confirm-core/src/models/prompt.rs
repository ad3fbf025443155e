//! Prompt outcome and options

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Custom id of the affirmative button
pub const CONFIRM_YES: &str = "confirm_yes";
/// Custom id of the negative button
pub const CONFIRM_NO: &str = "confirm_no";

/// Default seconds to wait for the user before giving up
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Terminal result of a confirmation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Confirmed,
    Declined,
    TimedOut,
}

impl Outcome {
    /// Maps a control identifier to an outcome; unknown ids map to `None`.
    pub fn from_custom_id(custom_id: &str) -> Option<Self> {
        match custom_id {
            CONFIRM_YES => Some(Outcome::Confirmed),
            CONFIRM_NO => Some(Outcome::Declined),
            _ => None,
        }
    }

    /// `Some(true)` when confirmed, `Some(false)` when declined, `None` on timeout
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Outcome::Confirmed => Some(true),
            Outcome::Declined => Some(false),
            Outcome::TimedOut => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Outcome::Confirmed => "confirmed",
            Outcome::Declined => "declined",
            Outcome::TimedOut => "timed out",
        };
        f.write_str(label)
    }
}

/// Per-call prompt options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptOptions {
    /// Leave the user out of the embed author line
    pub hide_author: bool,
    /// Only meaningful for interaction-originated prompts
    pub ephemeral: bool,
    pub timeout: Duration,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            hide_author: false,
            ephemeral: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl PromptOptions {
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn hide_author(mut self, hide: bool) -> Self {
        self.hide_author = hide;
        self
    }

    pub fn ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = ephemeral;
        self
    }
}
