// SPDX-FileCopyrightText: 2026 Smajobb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The send validation pipeline.
//!
//! Stages run in a fixed order and short-circuit at the first failing
//! stage: hard blocks, template resolution, slot validation, content scan,
//! render. Free text has no path through here: a message either comes out
//! as a rendered template or not at all.

use std::collections::BTreeMap;
use std::str::FromStr;

use smajobb_core::types::{Conversation, ConversationStatus};
use smajobb_core::GatewayError;
use smajobb_intents::{render, Intent, IntentRegistry};
use smajobb_safety::{scan, DetectionCategory, ScanPolicy};

/// A message that survived every pipeline stage.
#[derive(Debug, Clone)]
pub struct Validated {
    pub intent: Intent,
    /// Supplied values restricted to declared slots. Undeclared variables
    /// are dropped here and never stored.
    pub variables: BTreeMap<String, String>,
    /// The final text; the only form that ever leaves the gateway.
    pub rendered: String,
    /// Non-blocking scanner hits, kept for the audit trail.
    pub scan_hits: Vec<DetectionCategory>,
}

/// Why the pipeline refused a send. Richer than [`GatewayError`] so the
/// caller can distinguish a scanner block (which counts toward the
/// freeze threshold) from a malformed slot value (which does not).
#[derive(Debug)]
pub enum Rejection {
    /// Structural precondition failed. `forbidden` marks the sender as
    /// not permitted to message here at all (frozen, role policy).
    HardBlock { forbidden: bool },
    /// No intent, or a value outside the closed vocabulary.
    IntentRequired,
    /// One or more slot values failed shape or length validation.
    InvalidSlots { details: Vec<String> },
    /// The content scanner blocked at least one slot value.
    ScannerBlocked {
        reason: &'static str,
        categories: Vec<DetectionCategory>,
    },
}

impl Rejection {
    /// Collapse into the public error taxonomy.
    pub fn into_error(self) -> GatewayError {
        match self {
            Rejection::HardBlock { forbidden: true } => GatewayError::forbidden_block(),
            Rejection::HardBlock { forbidden: false } => GatewayError::hard_block(),
            Rejection::IntentRequired => GatewayError::IntentRequired,
            Rejection::InvalidSlots { details } => GatewayError::invalid_message(details),
            Rejection::ScannerBlocked { reason, .. } => {
                GatewayError::invalid_message(vec![reason.to_string()])
            }
        }
    }
}

/// Run the full pipeline for one send attempt.
///
/// The caller has already established that the sender is a participant;
/// everything else about eligibility is checked here.
pub fn validate(
    registry: &IntentRegistry,
    conversation: &Conversation,
    intent_raw: Option<&str>,
    variables: &BTreeMap<String, String>,
) -> Result<Validated, Rejection> {
    // Stage 1: hard blocks. Reasons stay generic on the way out.
    if conversation.status != ConversationStatus::Active {
        return Err(Rejection::HardBlock { forbidden: true });
    }
    if !conversation.pairing_allowed() {
        return Err(Rejection::HardBlock { forbidden: true });
    }
    if conversation.job_ref.is_none() {
        return Err(Rejection::HardBlock { forbidden: false });
    }

    // Stage 2: template resolution against the closed vocabulary.
    let intent = intent_raw
        .and_then(|raw| Intent::from_str(raw).ok())
        .ok_or(Rejection::IntentRequired)?;
    let template = registry.get(intent);

    // Stage 3: slot validation. All failures are collected so the audit
    // trail sees the complete picture; the sender sees only the first.
    let mut details = Vec::new();
    for slot in &template.slots {
        match variables.get(slot.name).map(String::as_str) {
            None | Some("") => {
                if slot.required {
                    details.push(format!("missing required value for {}", slot.name));
                }
            }
            Some(value) => {
                if value.chars().count() > slot.max_len {
                    details.push(format!("value for {} is too long", slot.name));
                }
                if let Some(c) = value.chars().find(|c| !slot.kind.char_allowed(*c)) {
                    details.push(format!(
                        "value for {} must be {} (unexpected {c:?})",
                        slot.name,
                        slot.kind.describe()
                    ));
                }
            }
        }
    }
    if !details.is_empty() {
        return Err(Rejection::InvalidSlots { details });
    }

    // Stage 4: content scan over every supplied value, declared or not.
    // An undeclared variable is never rendered or stored, but a sender
    // probing with one still gets the same answer as a declared slot.
    let policy = ScanPolicy {
        involves_minor: conversation.involves_minor(),
    };
    let mut hits = Vec::new();
    let mut blocked_reason = None;
    for value in variables.values() {
        let outcome = scan(value, policy);
        hits.extend(outcome.hits);
        if outcome.blocked && blocked_reason.is_none() {
            blocked_reason = outcome.reason;
        }
    }
    if let Some(reason) = blocked_reason {
        return Err(Rejection::ScannerBlocked {
            reason,
            categories: hits,
        });
    }

    // Stage 5: injection-safe render over declared slots only.
    let declared: BTreeMap<String, String> = variables
        .iter()
        .filter(|(name, _)| template.slot(name).is_some())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let rendered = render(template, &declared);

    Ok(Validated {
        intent,
        variables: declared,
        rendered,
        scan_hits: hits,
    })
}
