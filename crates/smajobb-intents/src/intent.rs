// SPDX-FileCopyrightText: 2026 Smajobb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `Intent` enum and slot metadata.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The closed set of message categories a user may send.
///
/// Wire format is the snake_case string (`confirm_availability`). Anything
/// that fails to parse is rejected upstream as `IntentRequired` -- there is
/// no fallback path that accepts free text.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    ExpressInterest,
    ConfirmAvailability,
    DeclineAvailability,
    ProposeTime,
    AcceptTime,
    RequestReschedule,
    AskJobQuestion,
    JobDone,
    ThanksGoodbye,
}

/// Value class of a template slot. Date/Time/Amount are shape-checked by
/// character class; ShortText accepts any printable input and relies on the
/// content scanner. The scanner runs over every slot value regardless of
/// kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// A day description: `12.05`, `2026-06-01`, `Saturday`.
    Date,
    /// A clock time: `14:30`, `9.15`.
    Time,
    /// A small numeric quantity: hours worked, number of visits.
    Amount,
    /// Short human text, scanner-gated.
    ShortText,
}

impl SlotKind {
    /// Whether a single character is acceptable for this kind.
    pub fn char_allowed(self, c: char) -> bool {
        match self {
            SlotKind::Date => c.is_ascii_alphanumeric() || matches!(c, ' ' | '.' | '-' | '/'),
            SlotKind::Time => c.is_ascii_digit() || matches!(c, ':' | '.' | ' '),
            SlotKind::Amount => c.is_ascii_digit() || matches!(c, '.' | ','),
            SlotKind::ShortText => !c.is_control(),
        }
    }

    /// Human description used in rejection details.
    pub fn describe(self) -> &'static str {
        match self {
            SlotKind::Date => "a date",
            SlotKind::Time => "a time of day",
            SlotKind::Amount => "a number",
            SlotKind::ShortText => "short text",
        }
    }
}

/// A named, typed parameter within an intent template.
#[derive(Debug, Clone)]
pub struct TemplateSlot {
    pub name: &'static str,
    pub required: bool,
    pub max_len: usize,
    pub kind: SlotKind,
}

impl TemplateSlot {
    pub const fn required(name: &'static str, kind: SlotKind, max_len: usize) -> Self {
        TemplateSlot {
            name,
            required: true,
            max_len,
            kind,
        }
    }

    pub const fn optional(name: &'static str, kind: SlotKind, max_len: usize) -> Self {
        TemplateSlot {
            name,
            required: false,
            max_len,
            kind,
        }
    }
}
