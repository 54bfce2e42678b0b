//! Configuration validation

use crate::schema::{RawConfig, RawPair};
use iqnotify_api::LookbackWindow;
use std::collections::HashSet;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Pair #{index}: {message}")]
    PairError { index: usize, message: String },

    #[error("Duplicate pair: entity '{entity}' -> service '{service}'")]
    DuplicatePair { entity: String, service: String },

    #[error("Lookback time must be a positive number of minutes, got {0}")]
    InvalidWindow(i64),
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(time) = config.service.time
        && LookbackWindow::try_from(time).is_err()
    {
        errors.push(ValidationError::InvalidWindow(time));
    }

    for (index, pair) in config.pairs.iter().enumerate() {
        errors.extend(validate_pair(index, pair));
    }

    // Same entity may feed several channels, but an identical pair would
    // deliver the same message twice. Compared after trimming, as converted.
    let mut seen = HashSet::new();
    for pair in &config.pairs {
        if let (Some(entity), Some(service)) = (&pair.entity, &pair.service) {
            let key = (entity.trim(), service.trim());
            if !seen.insert(key) {
                errors.push(ValidationError::DuplicatePair {
                    entity: key.0.to_string(),
                    service: key.1.to_string(),
                });
            }
        }
    }

    errors
}

fn validate_pair(index: usize, pair: &RawPair) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    match pair.entity.as_deref().map(str::trim) {
        None => errors.push(ValidationError::PairError {
            index,
            message: "entity is required".into(),
        }),
        Some("") => errors.push(ValidationError::PairError {
            index,
            message: "entity cannot be empty".into(),
        }),
        Some(_) => {}
    }

    match pair.service.as_deref().map(str::trim) {
        None => errors.push(ValidationError::PairError {
            index,
            message: "service is required".into(),
        }),
        Some("") => errors.push(ValidationError::PairError {
            index,
            message: "service cannot be empty".into(),
        }),
        Some(_) => {}
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RawServiceConfig;

    fn pair(entity: &str, service: &str) -> RawPair {
        RawPair {
            entity: Some(entity.into()),
            service: Some(service.into()),
        }
    }

    #[test]
    fn valid_config_has_no_errors() {
        let config = RawConfig {
            config_version: 1,
            service: RawServiceConfig {
                time: Some(3),
                presence_db: None,
            },
            pairs: vec![
                pair("device_tracker.alice", "mobile_app_alice"),
                pair("device_tracker.alice", "email_alice"),
            ],
        };

        assert!(validate_config(&config).is_empty());
    }

    #[test]
    fn test_duplicate_pair_detection() {
        let config = RawConfig {
            config_version: 1,
            service: Default::default(),
            pairs: vec![
                pair("device_tracker.alice", "mobile_app_alice"),
                pair("device_tracker.alice", "mobile_app_alice"),
            ],
        };

        let errors = validate_config(&config);
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::DuplicatePair { .. })));
    }

    #[test]
    fn duplicate_detection_ignores_surrounding_whitespace() {
        let config = RawConfig {
            config_version: 1,
            service: Default::default(),
            pairs: vec![
                pair("person.alice", "mobile_app_alice"),
                pair(" person.alice ", "mobile_app_alice "),
            ],
        };

        let errors = validate_config(&config);
        assert_eq!(errors.len(), 1);
        match &errors[0] {
            ValidationError::DuplicatePair { entity, service } => {
                assert_eq!(entity, "person.alice");
                assert_eq!(service, "mobile_app_alice");
            }
            other => panic!("expected duplicate pair, got {:?}", other),
        }
    }

    #[test]
    fn window_beyond_u32_range_is_rejected() {
        let config = RawConfig {
            config_version: 1,
            service: RawServiceConfig {
                time: Some(5_000_000_000),
                presence_db: None,
            },
            pairs: vec![pair("person.alice", "mobile_app_alice")],
        };

        let errors = validate_config(&config);
        assert!(matches!(
            errors.as_slice(),
            [ValidationError::InvalidWindow(5_000_000_000)]
        ));
    }

    #[test]
    fn test_missing_and_empty_fields() {
        let config = RawConfig {
            config_version: 1,
            service: RawServiceConfig {
                time: Some(-1),
                presence_db: None,
            },
            pairs: vec![
                RawPair {
                    entity: None,
                    service: Some("mobile_app_alice".into()),
                },
                pair("  ", "telegram_bob"),
            ],
        };

        let errors = validate_config(&config);
        assert_eq!(errors.len(), 3);
        assert!(matches!(errors[0], ValidationError::InvalidWindow(-1)));
        assert!(matches!(errors[1], ValidationError::PairError { index: 0, .. }));
        assert!(matches!(errors[2], ValidationError::PairError { index: 1, .. }));
    }
}
