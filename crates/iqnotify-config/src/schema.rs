//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Service-level settings
    #[serde(default)]
    pub service: RawServiceConfig,

    /// Ordered presence/channel pairs
    #[serde(default)]
    pub pairs: Vec<RawPair>,
}

/// Service-level settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawServiceConfig {
    /// Default lookback window in minutes (default: 2)
    pub time: Option<i64>,

    /// Presence database to read states from
    pub presence_db: Option<PathBuf>,
}

/// Raw pair definition.
///
/// Both fields are optional at parse time so that a missing field is
/// reported by validation together with every other problem.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawPair {
    /// Presence entity id (e.g. `device_tracker.alice`)
    pub entity: Option<String>,

    /// Notification service name (e.g. `mobile_app_alice`)
    pub service: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pairs_in_order() {
        let toml_str = r#"
            config_version = 1

            [[pairs]]
            entity = "device_tracker.alice"
            service = "mobile_app_alice"

            [[pairs]]
            entity = "binary_sensor.bob_home"
            service = "telegram_bob"
        "#;

        let config: RawConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.pairs.len(), 2);
        assert_eq!(config.pairs[1].service.as_deref(), Some("telegram_bob"));
        assert!(config.service.time.is_none());
    }

    #[test]
    fn parse_service_section() {
        let toml_str = r#"
            config_version = 1

            [service]
            time = 10
            presence_db = "/var/lib/recorder/presence.db"
        "#;

        let config: RawConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.service.time, Some(10));
        assert!(config.pairs.is_empty());
    }
}
