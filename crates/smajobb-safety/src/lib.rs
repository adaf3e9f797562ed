// SPDX-FileCopyrightText: 2026 Smajobb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Content safety scanner for slot values.
//!
//! Stateless pattern detection for contact-information exfiltration and
//! unsafe tokens. The scanner never redacts: a detection rejects the whole
//! message, because silent redaction would let a sender iterate until a
//! leak slips through. It is deliberately conservative -- false positives
//! are the accepted cost of never missing a phone number.

pub mod denylist;
pub mod scanner;

pub use scanner::{scan, DetectionCategory, ScanOutcome, ScanPolicy};
