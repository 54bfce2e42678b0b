//! Notification modes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Policy selecting which pairs receive a notification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Every pair with a known presence state
    #[default]
    #[serde(rename = "all")]
    All,

    /// Pairs whose entity is present
    #[serde(rename = "only_home", alias = "only_present")]
    OnlyPresent,

    /// Pairs whose entity is absent
    #[serde(rename = "only_away", alias = "only_absent")]
    OnlyAbsent,

    /// Present pairs that arrived within the lookback window
    #[serde(rename = "just_arrived")]
    JustArrived,

    /// Absent pairs that left within the lookback window
    #[serde(rename = "just_left")]
    JustLeft,

    /// Present pairs that have been present for at least the lookback window
    #[serde(rename = "staying_home", alias = "staying_present")]
    StayingPresent,

    /// Absent pairs that have been absent for at least the lookback window
    #[serde(rename = "staying_away", alias = "staying_absent")]
    StayingAbsent,

    /// Present pairs, or every pair when nobody is present
    #[serde(rename = "only_home_then_away", alias = "only_present_then_absent")]
    OnlyPresentThenAbsentFallback,

    /// Absent pairs that just left, or every absent pair when nobody just left
    #[serde(rename = "just_left_then_away", alias = "just_left_then_absent")]
    JustLeftThenAbsentFallback,
}

impl Mode {
    pub const ALL: [Mode; 9] = [
        Mode::All,
        Mode::OnlyPresent,
        Mode::OnlyAbsent,
        Mode::JustArrived,
        Mode::JustLeft,
        Mode::StayingPresent,
        Mode::StayingAbsent,
        Mode::OnlyPresentThenAbsentFallback,
        Mode::JustLeftThenAbsentFallback,
    ];

    /// Canonical string form, as written in service call data
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::All => "all",
            Mode::OnlyPresent => "only_home",
            Mode::OnlyAbsent => "only_away",
            Mode::JustArrived => "just_arrived",
            Mode::JustLeft => "just_left",
            Mode::StayingPresent => "staying_home",
            Mode::StayingAbsent => "staying_away",
            Mode::OnlyPresentThenAbsentFallback => "only_home_then_away",
            Mode::JustLeftThenAbsentFallback => "just_left_then_away",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown notification mode: {0:?}")]
pub struct ParseModeError(pub String);

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Mode::All),
            "only_home" | "only_present" => Ok(Mode::OnlyPresent),
            "only_away" | "only_absent" => Ok(Mode::OnlyAbsent),
            "just_arrived" => Ok(Mode::JustArrived),
            "just_left" => Ok(Mode::JustLeft),
            "staying_home" | "staying_present" => Ok(Mode::StayingPresent),
            "staying_away" | "staying_absent" => Ok(Mode::StayingAbsent),
            "only_home_then_away" | "only_present_then_absent" => {
                Ok(Mode::OnlyPresentThenAbsentFallback)
            }
            "just_left_then_away" | "just_left_then_absent" => {
                Ok(Mode::JustLeftThenAbsentFallback)
            }
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// A mode as requested by a caller.
///
/// Parsing never fails: an unrecognized string is kept so the engine can
/// fail closed (notify nobody) and the caller can log what was asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ModeRequest {
    Known(Mode),
    Unrecognized(String),
}

impl ModeRequest {
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<Mode>() {
            Ok(mode) => ModeRequest::Known(mode),
            Err(ParseModeError(raw)) => ModeRequest::Unrecognized(raw),
        }
    }

    pub fn mode(&self) -> Option<Mode> {
        match self {
            ModeRequest::Known(mode) => Some(*mode),
            ModeRequest::Unrecognized(_) => None,
        }
    }
}

impl Default for ModeRequest {
    fn default() -> Self {
        ModeRequest::Known(Mode::default())
    }
}

impl From<Mode> for ModeRequest {
    fn from(mode: Mode) -> Self {
        ModeRequest::Known(mode)
    }
}

impl fmt::Display for ModeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeRequest::Known(mode) => write!(f, "{}", mode),
            ModeRequest::Unrecognized(raw) => write!(f, "{} (unrecognized)", raw),
        }
    }
}
