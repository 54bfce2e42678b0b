//! Lookback window

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Default lookback window in minutes
pub const DEFAULT_LOOKBACK_MINUTES: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Lookback window must be a positive number of minutes, got {0}")]
pub struct InvalidWindow(pub i64);

/// How far back a transition still counts as "recent".
///
/// Always a positive whole number of minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct LookbackWindow {
    minutes: u32,
}

impl LookbackWindow {
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        if minutes == 0 {
            None
        } else {
            Some(Self { minutes })
        }
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn as_duration(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.minutes))
    }

    /// `now - window`. Transitions at or after this instant are recent.
    pub fn threshold(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.as_duration()
    }
}

impl Default for LookbackWindow {
    fn default() -> Self {
        Self {
            minutes: DEFAULT_LOOKBACK_MINUTES,
        }
    }
}

impl TryFrom<i64> for LookbackWindow {
    type Error = InvalidWindow;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .ok()
            .and_then(Self::from_minutes)
            .ok_or(InvalidWindow(value))
    }
}

impl From<LookbackWindow> for u32 {
    fn from(window: LookbackWindow) -> Self {
        window.minutes
    }
}

impl fmt::Display for LookbackWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.minutes)
    }
}
