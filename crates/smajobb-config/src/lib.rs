// SPDX-FileCopyrightText: 2026 Smajobb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the smajobb messaging gateway.
//!
//! TOML configuration with strict parsing (`deny_unknown_fields`), XDG file
//! hierarchy lookup, environment variable overrides, and miette diagnostic
//! rendering with typo suggestions.

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::SmajobbConfig;

/// Load configuration from the XDG hierarchy and validate it.
///
/// On a Figment error the result is converted into rich diagnostics with
/// typo suggestions; on success the config goes through post-deserialization
/// validation before being returned.
pub fn load_and_validate() -> Result<SmajobbConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err)),
    }
}

/// Load configuration from a TOML string and validate it. Used by tests and
/// explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<SmajobbConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err)),
    }
}
