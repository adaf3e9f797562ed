// SPDX-FileCopyrightText: 2026 Smajobb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge with fuzzy match suggestions.
//!
//! Converts Figment deserialization errors into miette diagnostics with
//! valid key listings and "did you mean?" suggestions using Jaro-Winkler
//! string similarity.

use miette::Diagnostic;
use thiserror::Error;

/// Minimum Jaro-Winkler similarity score to suggest a correction. 0.75
/// catches common typos like `mesage_limit` -> `message_limit` while
/// filtering noise.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error with diagnostic context.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// An unknown key was found in the configuration.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(smajobb::config::unknown_key),
        help("{}", format_unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        /// The unrecognized key name.
        key: String,
        /// Suggested correction via fuzzy matching, if any.
        suggestion: Option<String>,
        /// List of valid keys for the section.
        valid_keys: String,
    },

    /// A configuration value has the wrong type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(smajobb::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
    },

    /// A required configuration key is missing.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(smajobb::config::missing_key),
        help("add `{key} = <value>` to your smajobb.toml")
    )]
    MissingKey { key: String },

    /// A validation error for a config value.
    #[error("validation error: {message}")]
    #[diagnostic(code(smajobb::config::validation))]
    Validation { message: String },

    /// Catch-all for other configuration errors.
    #[error("configuration error: {0}")]
    #[diagnostic(code(smajobb::config::other))]
    Other(String),
}

fn format_unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Convert a `figment::Error` into a list of `ConfigError` diagnostics.
///
/// A single figment error may contain several underlying errors; each is
/// converted independently so the user sees every problem in one pass.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    use figment::error::Kind;

    let mut errors = Vec::new();

    for error in err {
        let config_error = match &error.kind {
            Kind::UnknownField(field, expected) => {
                let valid_keys: Vec<&str> = expected.to_vec();
                ConfigError::UnknownKey {
                    key: field.clone(),
                    suggestion: suggest_key(field, &valid_keys),
                    valid_keys: valid_keys.join(", "),
                }
            }
            Kind::MissingField(field) => ConfigError::MissingKey {
                key: field.clone().into_owned(),
            },
            Kind::InvalidType(actual, expected) => {
                let key = error
                    .path
                    .iter()
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>()
                    .join(".");
                ConfigError::InvalidType {
                    key,
                    detail: format!("found {actual}, expected {expected}"),
                    expected: expected.to_string(),
                }
            }
            _ => ConfigError::Other(format!("{error}")),
        };

        errors.push(config_error);
    }

    errors
}

/// Suggest a similar key name using Jaro-Winkler string similarity.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    let mut best_score = SUGGESTION_THRESHOLD;
    let mut best_match = None;

    for &key in valid_keys {
        let score = strsim::jaro_winkler(unknown, key);
        if score > best_score {
            best_score = score;
            best_match = Some(key.to_string());
        }
    }

    best_match
}

/// Render a list of `ConfigError`s to stderr using miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        let diagnostic: &dyn Diagnostic = error;
        if handler.render_report(&mut buf, diagnostic).is_ok() {
            eprint!("{buf}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_close_key() {
        let valid = &["message_limit", "interval_secs"];
        assert_eq!(
            suggest_key("mesage_limit", valid),
            Some("message_limit".to_string())
        );
    }

    #[test]
    fn no_suggestion_for_distant_typo() {
        let valid = &["message_limit", "interval_secs"];
        assert_eq!(suggest_key("zzzzzz", valid), None);
    }

    #[test]
    fn unknown_key_help_lists_valid_keys() {
        let help = format_unknown_key_help(None, "host, port");
        assert!(help.contains("host, port"));
        let help = format_unknown_key_help(Some("port"), "host, port");
        assert!(help.contains("did you mean `port`?"));
    }
}
