// SPDX-FileCopyrightText: 2026 Smajobb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Semantic constraints that serde attributes cannot express: address
//! shape, positive quotas, a usable freeze threshold.

use crate::diagnostic::ConfigError;
use crate::model::SmajobbConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects all validation errors rather than failing fast.
pub fn validate_config(config: &SmajobbConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.gateway.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("gateway.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.rate_limit.message_limit == 0 {
        errors.push(ConfigError::Validation {
            message: "rate_limit.message_limit must be at least 1".to_string(),
        });
    }

    if config.rate_limit.interval_secs < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "rate_limit.interval_secs must be positive, got {}",
                config.rate_limit.interval_secs
            ),
        });
    }

    if config.safety.violation_freeze_threshold == 0 {
        errors.push(ConfigError::Validation {
            message: "safety.violation_freeze_threshold must be at least 1 \
                      (0 would freeze every conversation immediately)"
                .to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = SmajobbConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = SmajobbConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("database_path"))
        ));
    }

    #[test]
    fn zero_message_limit_fails_validation() {
        let mut config = SmajobbConfig::default();
        config.rate_limit.message_limit = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("message_limit"))
        ));
    }

    #[test]
    fn zero_freeze_threshold_fails_validation() {
        let mut config = SmajobbConfig::default();
        config.safety.violation_freeze_threshold = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("violation_freeze_threshold"))
        ));
    }

    #[test]
    fn garbage_host_fails_validation() {
        let mut config = SmajobbConfig::default();
        config.gateway.host = "not a host!".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("gateway.host"))
        ));
    }

    #[test]
    fn multiple_errors_are_all_collected() {
        let mut config = SmajobbConfig::default();
        config.storage.database_path = "".to_string();
        config.rate_limit.message_limit = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
