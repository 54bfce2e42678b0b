//! Validated configuration

use crate::schema::{RawConfig, RawPair, RawServiceConfig};
use crate::validation::ValidationError;
use iqnotify_api::{LookbackWindow, Pair};
use std::path::PathBuf;

/// Validated configuration ready for use by the notification service
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    /// Service configuration
    pub service: ServiceConfig,

    /// Pairs in configured order
    pub pairs: Vec<Pair>,
}

impl NotifyConfig {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Result<Self, ValidationError> {
        Ok(Self {
            service: ServiceConfig::from_raw(raw.service)?,
            pairs: raw.pairs.into_iter().filter_map(convert_pair).collect(),
        })
    }

    pub fn new(pairs: Vec<Pair>, default_window: LookbackWindow) -> Self {
        Self {
            service: ServiceConfig {
                default_window,
                ..Default::default()
            },
            pairs,
        }
    }
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub default_window: LookbackWindow,
    pub presence_db: PathBuf,
}

impl ServiceConfig {
    fn from_raw(raw: RawServiceConfig) -> Result<Self, ValidationError> {
        let default_window = match raw.time {
            Some(time) => LookbackWindow::try_from(time)
                .map_err(|e| ValidationError::InvalidWindow(e.0))?,
            None => LookbackWindow::default(),
        };

        Ok(Self {
            default_window,
            presence_db: raw
                .presence_db
                .unwrap_or_else(iqnotify_util::default_presence_db_path),
        })
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_window: LookbackWindow::default(),
            presence_db: iqnotify_util::default_presence_db_path(),
        }
    }
}

fn convert_pair(raw: RawPair) -> Option<Pair> {
    let entity = raw.entity?.trim().to_string();
    let service = raw.service?.trim().to_string();
    Some(Pair::new(entity, service))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_service_section_missing() {
        let config = NotifyConfig::from_raw(RawConfig {
            config_version: 1,
            service: Default::default(),
            pairs: vec![RawPair {
                entity: Some(" person.alice ".into()),
                service: Some("mobile_app_alice".into()),
            }],
        })
        .unwrap();

        assert_eq!(config.service.default_window, LookbackWindow::default());
        assert!(config.service.presence_db.ends_with("presence.db"));
        assert_eq!(config.pairs[0].entity.as_str(), "person.alice");
    }

    #[test]
    fn configured_window_is_used() {
        let config = NotifyConfig::from_raw(RawConfig {
            config_version: 1,
            service: RawServiceConfig {
                time: Some(15),
                presence_db: Some(PathBuf::from("/tmp/states.db")),
            },
            pairs: vec![],
        })
        .unwrap();

        assert_eq!(config.service.default_window.minutes(), 15);
        assert_eq!(config.service.presence_db, PathBuf::from("/tmp/states.db"));
    }

    #[test]
    fn out_of_range_window_is_an_error() {
        let result = NotifyConfig::from_raw(RawConfig {
            config_version: 1,
            service: RawServiceConfig {
                time: Some(5_000_000_000),
                presence_db: None,
            },
            pairs: vec![],
        });

        assert!(matches!(
            result,
            Err(ValidationError::InvalidWindow(5_000_000_000))
        ));
    }
}
