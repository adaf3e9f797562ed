// SPDX-FileCopyrightText: 2026 Smajobb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so an unrecognized key is
//! a startup error with an actionable message rather than a silently ignored
//! setting -- in a safety subsystem a typo in `violation_freeze_threshold`
//! must not quietly disable auto-freezing.

use serde::{Deserialize, Serialize};

/// Top-level smajobb gateway configuration.
///
/// Loaded from TOML following the XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to safe values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SmajobbConfig {
    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Per-user send quota settings.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Content safety and auto-freeze settings.
    #[serde(default)]
    pub safety: SafetyConfig,
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Bearer token required from upstream callers. `None` rejects all
    /// requests (fail-closed).
    #[serde(default)]
    pub bearer_token: Option<String>,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            bearer_token: None,
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3400
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL journal mode.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    "smajobb.db".to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// Per-user send quota.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitConfig {
    /// Messages allowed per window per user.
    #[serde(default = "default_message_limit")]
    pub message_limit: u32,

    /// Window length in seconds.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: i64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            message_limit: default_message_limit(),
            interval_secs: default_interval_secs(),
        }
    }
}

fn default_message_limit() -> u32 {
    60
}

fn default_interval_secs() -> i64 {
    3600
}

/// Content safety and auto-freeze settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SafetyConfig {
    /// Number of scanner-blocked sends in one conversation before the
    /// conversation is frozen automatically.
    #[serde(default = "default_violation_freeze_threshold")]
    pub violation_freeze_threshold: u32,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            violation_freeze_threshold: default_violation_freeze_threshold(),
        }
    }
}

fn default_violation_freeze_threshold() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config_deserializes() {
        let toml_str = r#"
[gateway]
host = "0.0.0.0"
port = 8443
bearer_token = "svc-token"
log_level = "debug"

[storage]
database_path = "/var/lib/smajobb/gateway.db"
wal_mode = true

[rate_limit]
message_limit = 30
interval_secs = 1800

[safety]
violation_freeze_threshold = 2
"#;
        let config: SmajobbConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.gateway.host, "0.0.0.0");
        assert_eq!(config.gateway.port, 8443);
        assert_eq!(config.gateway.bearer_token.as_deref(), Some("svc-token"));
        assert_eq!(config.storage.database_path, "/var/lib/smajobb/gateway.db");
        assert_eq!(config.rate_limit.message_limit, 30);
        assert_eq!(config.safety.violation_freeze_threshold, 2);
    }

    #[test]
    fn unknown_field_is_a_parse_error() {
        let toml_str = r#"
[safety]
violation_threshold = 2
"#;
        assert!(toml::from_str::<SmajobbConfig>(toml_str).is_err());
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: SmajobbConfig = toml::from_str("").unwrap();
        assert_eq!(config.gateway.host, "127.0.0.1");
        assert_eq!(config.gateway.port, 3400);
        assert!(config.gateway.bearer_token.is_none());
        assert!(config.storage.wal_mode);
    }
}
