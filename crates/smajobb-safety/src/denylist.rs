// SPDX-FileCopyrightText: 2026 Smajobb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Denylisted unsafe tokens.
//!
//! Coercion and secrecy phrases alongside profanity. Matching is
//! case-insensitive substring over the whitespace-normalized value, so
//! `Don't  Tell` and `don't tell` both hit. The list blocks regardless of
//! the sender's age bracket.

/// Phrases that block a message outright, in any conversation.
pub const UNSAFE_TOKENS: &[&str] = &[
    // Secrecy / grooming pressure
    "our secret",
    "don't tell",
    "dont tell",
    "between us",
    "keep this private",
    "delete this",
    "meet alone",
    "come alone",
    "without your parents",
    // Off-platform luring
    "off the app",
    "outside the app",
    "off platform",
    // Profanity (representative, not exhaustive)
    "fuck",
    "shit",
    "bitch",
    "faen",
    "helvete",
];

/// Lowercase the value and collapse runs of whitespace to single spaces.
pub fn normalize(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut last_space = false;
    for c in value.to_lowercase().chars() {
        if c.is_whitespace() {
            if !last_space {
                out.push(' ');
            }
            last_space = true;
        } else {
            out.push(c);
            last_space = false;
        }
    }
    out
}

/// The first denylisted token contained in the value, if any.
pub fn first_hit(value: &str) -> Option<&'static str> {
    let normalized = normalize(value);
    UNSAFE_TOKENS
        .iter()
        .copied()
        .find(|token| normalized.contains(token))
}
