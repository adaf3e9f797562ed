// SPDX-FileCopyrightText: 2026 Smajobb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Injection-safe template rendering.
//!
//! Substitution is a single left-to-right pass over the pattern. Slot
//! values are inserted as literal text and the output is never re-scanned
//! for placeholders, so a value containing `{day}` renders as the five
//! characters `{day}` -- there is no second expansion step to exploit.
//! This is deliberately not a general template engine.

use std::collections::BTreeMap;

use crate::registry::IntentTemplate;

/// Upper bound on rendered message length in bytes. Slot maxima are
/// character counts, so multi-byte values can overshoot this; the renderer
/// caps the output on a character boundary.
pub const MAX_RENDERED_LEN: usize = 500;

/// Substitute validated slot values into the template pattern.
///
/// Callers must validate values first (declared slot, kind, length); this
/// function only performs the mechanical substitution. Placeholders whose
/// slot is optional and absent render as empty. Values for names that are
/// not placeholders in the pattern are ignored.
pub fn render(template: &IntentTemplate, values: &BTreeMap<String, String>) -> String {
    let pattern = template.pattern;
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        match rest[open..].find('}') {
            Some(close) => {
                let name = &rest[open + 1..open + close];
                if let Some(value) = values.get(name) {
                    // Literal insertion: the value is appended verbatim and
                    // the scan continues after the placeholder, never inside
                    // the inserted text.
                    out.push_str(value);
                }
                rest = &rest[open + close + 1..];
            }
            None => {
                // Unbalanced brace in the pattern itself; emit literally.
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    if out.len() > MAX_RENDERED_LEN {
        // Byte index MAX_RENDERED_LEN may fall inside a multi-byte
        // character; cut at the nearest boundary below it.
        let mut cut = MAX_RENDERED_LEN;
        while !out.is_char_boundary(cut) {
            cut -= 1;
        }
        out.truncate(cut);
    }
    out
}
