//! Per-call options and outbound payloads

use iqnotify_util::NotifyError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{LookbackWindow, ModeRequest};

/// Data key carrying the mode override
pub const ATTR_MODE: &str = "mode";

/// Data key carrying the lookback window override, in minutes
pub const ATTR_TIME: &str = "time";

/// A notification as requested by the host framework
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotifyRequest {
    #[serde(default)]
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Auxiliary data. May carry `mode` and `time` overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}

impl NotifyRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = Some(data);
        self
    }

    /// Parse `data` from a JSON object string
    pub fn with_data_json(self, json: &str) -> Result<Self, NotifyError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| NotifyError::validation(format!("data is not valid JSON: {}", e)))?;
        match value {
            Value::Object(map) => Ok(self.with_data(map)),
            other => Err(NotifyError::validation(format!(
                "data must be a JSON object, got {}",
                other
            ))),
        }
    }
}

/// Lookback window requested for one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowOverride {
    /// No override given; use the configured window
    Default,
    Minutes(LookbackWindow),
    /// An override was given but is not a positive whole number of minutes
    Invalid(String),
}

impl WindowOverride {
    fn from_value(value: &Value) -> Self {
        let minutes = match value {
            // Whole-number floats such as `2.0` count as minutes too
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .map(|f| f as i64)
            }),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };

        match minutes.map(LookbackWindow::try_from) {
            Some(Ok(window)) => WindowOverride::Minutes(window),
            _ => WindowOverride::Invalid(value.to_string()),
        }
    }

    /// Resolve against the configured window
    pub fn resolve(&self, configured: LookbackWindow) -> LookbackWindow {
        match self {
            WindowOverride::Minutes(window) => *window,
            WindowOverride::Default | WindowOverride::Invalid(_) => configured,
        }
    }
}

/// Overrides consumed from the request data, plus whatever is left over
#[derive(Debug, Clone, PartialEq)]
pub struct CallOverrides {
    pub mode: ModeRequest,
    pub window: WindowOverride,
    /// Remaining data, forwarded to the channels
    pub data: Map<String, Value>,
}

impl CallOverrides {
    /// Strip `mode` and `time` from the request data.
    ///
    /// A `null` override counts as absent. A non-string mode is kept as an
    /// unrecognized request so evaluation fails closed.
    pub fn extract(data: Option<Map<String, Value>>) -> Self {
        let mut data = data.unwrap_or_default();

        let mode = match data.remove(ATTR_MODE) {
            None | Some(Value::Null) => ModeRequest::default(),
            Some(Value::String(raw)) => ModeRequest::parse(&raw),
            Some(other) => ModeRequest::Unrecognized(other.to_string()),
        };

        let window = match data.remove(ATTR_TIME) {
            None | Some(Value::Null) => WindowOverride::Default,
            Some(value) => WindowOverride::from_value(&value),
        };

        Self { mode, window, data }
    }
}

/// What a channel receives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default)]
    pub data: Map<String, Value>,
}
