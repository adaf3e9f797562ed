// SPDX-FileCopyrightText: 2026 Smajobb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./smajobb.toml` > `~/.config/smajobb/smajobb.toml`
//! > `/etc/smajobb/smajobb.toml` with environment variable overrides via the
//! `SMAJOBB_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::SmajobbConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/smajobb/smajobb.toml` (system-wide)
/// 3. `~/.config/smajobb/smajobb.toml` (user XDG config)
/// 4. `./smajobb.toml` (local directory)
/// 5. `SMAJOBB_*` environment variables
pub fn load_config() -> Result<SmajobbConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SmajobbConfig::default()))
        .merge(Toml::file("/etc/smajobb/smajobb.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("smajobb/smajobb.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("smajobb.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
pub fn load_config_from_str(toml_content: &str) -> Result<SmajobbConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SmajobbConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SmajobbConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SmajobbConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names
/// themselves contain underscores: `SMAJOBB_RATE_LIMIT_MESSAGE_LIMIT` must
/// map to `rate_limit.message_limit`, not `rate.limit.message.limit`.
fn env_provider() -> Env {
    Env::prefixed("SMAJOBB_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("gateway_", "gateway.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("rate_limit_", "rate_limit.", 1)
            .replacen("safety_", "safety.", 1);
        mapped.into()
    })
}
