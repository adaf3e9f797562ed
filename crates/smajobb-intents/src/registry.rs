// SPDX-FileCopyrightText: 2026 Smajobb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The intent template registry.
//!
//! Pure lookup, no side effects, read-only after construction. The
//! constructor matches exhaustively over [`Intent`], so a variant without a
//! template is a compile error rather than a runtime `NotFound`.

use std::collections::HashMap;

use strum::IntoEnumIterator;

use crate::intent::{Intent, SlotKind, TemplateSlot};
use crate::render::MAX_RENDERED_LEN;

/// A parameterized message template for one intent.
#[derive(Debug, Clone)]
pub struct IntentTemplate {
    pub intent: Intent,
    /// Human label shown in intent pickers.
    pub label: &'static str,
    /// Rendering pattern with `{slot}` placeholders.
    pub pattern: &'static str,
    /// Declared slots; variables outside this set are ignored, never
    /// interpolated.
    pub slots: Vec<TemplateSlot>,
}

impl IntentTemplate {
    /// The declared slot with the given name, if any.
    pub fn slot(&self, name: &str) -> Option<&TemplateSlot> {
        self.slots.iter().find(|s| s.name == name)
    }
}

/// Static catalog mapping each intent to its template.
#[derive(Debug)]
pub struct IntentRegistry {
    templates: HashMap<Intent, IntentTemplate>,
}

impl IntentRegistry {
    /// Build the registry. Exhaustive over the `Intent` enum: adding a
    /// variant without extending `template_for` fails to compile.
    pub fn new() -> Self {
        let mut templates = HashMap::new();
        for intent in Intent::iter() {
            templates.insert(intent, template_for(intent));
        }
        IntentRegistry { templates }
    }

    /// Look up the template for an intent. Infallible: construction
    /// guarantees one template per variant.
    pub fn get(&self, intent: Intent) -> &IntentTemplate {
        self.templates
            .get(&intent)
            .expect("registry holds a template for every Intent variant")
    }

    /// All templates, for catalog-style listings.
    pub fn templates(&self) -> impl Iterator<Item = &IntentTemplate> {
        self.templates.values()
    }
}

impl Default for IntentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The template catalog. This function is the single place new message
/// shapes enter the system.
fn template_for(intent: Intent) -> IntentTemplate {
    match intent {
        Intent::ExpressInterest => IntentTemplate {
            intent,
            label: "Express interest",
            pattern: "Hi! I am interested in this job and would like to hear more.",
            slots: vec![],
        },
        Intent::ConfirmAvailability => IntentTemplate {
            intent,
            label: "Confirm availability",
            pattern: "I can confirm that I am available for this job.",
            slots: vec![],
        },
        Intent::DeclineAvailability => IntentTemplate {
            intent,
            label: "Decline",
            pattern: "Unfortunately I am no longer available for this job.",
            slots: vec![],
        },
        Intent::ProposeTime => IntentTemplate {
            intent,
            label: "Propose a time",
            pattern: "Could we do it on {day} at {time}?",
            slots: vec![
                TemplateSlot::required("day", SlotKind::Date, 20),
                TemplateSlot::required("time", SlotKind::Time, 8),
            ],
        },
        Intent::AcceptTime => IntentTemplate {
            intent,
            label: "Accept proposed time",
            pattern: "That time works for me. See you then!",
            slots: vec![],
        },
        Intent::RequestReschedule => IntentTemplate {
            intent,
            label: "Request reschedule",
            pattern: "I need to reschedule. Would {day} at {time} work instead?",
            slots: vec![
                TemplateSlot::required("day", SlotKind::Date, 20),
                TemplateSlot::required("time", SlotKind::Time, 8),
            ],
        },
        Intent::AskJobQuestion => IntentTemplate {
            intent,
            label: "Ask about the job",
            pattern: "I have a question about the job: {question}",
            slots: vec![TemplateSlot::required("question", SlotKind::ShortText, 120)],
        },
        Intent::JobDone => IntentTemplate {
            intent,
            label: "Report job finished",
            pattern: "I have finished the job. It took {hours} hours in total.",
            slots: vec![TemplateSlot::required("hours", SlotKind::Amount, 5)],
        },
        Intent::ThanksGoodbye => IntentTemplate {
            intent,
            label: "Say thanks",
            pattern: "Thank you, it was nice working with you!",
            slots: vec![],
        },
    }
}

/// Collect the `{name}` placeholders appearing in a pattern.
#[cfg(test)]
pub(crate) fn placeholders(pattern: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut rest = pattern;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        out.push(&rest[open + 1..open + close]);
        rest = &rest[open + close + 1..];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_placeholder_names_a_declared_slot() {
        let registry = IntentRegistry::new();
        for template in registry.templates() {
            for name in placeholders(template.pattern) {
                assert!(
                    template.slot(name).is_some(),
                    "pattern for {:?} references undeclared slot `{name}`",
                    template.intent
                );
            }
        }
    }

    #[test]
    fn every_required_slot_appears_in_the_pattern() {
        let registry = IntentRegistry::new();
        for template in registry.templates() {
            let names = placeholders(template.pattern);
            for slot in &template.slots {
                if slot.required {
                    assert!(
                        names.contains(&slot.name),
                        "required slot `{}` of {:?} missing from pattern",
                        slot.name,
                        template.intent
                    );
                }
            }
        }
    }

    #[test]
    fn rendered_output_is_bounded_at_worst_case() {
        // Slot maxima are character counts, so the byte-wise worst case is
        // every slot filled to its maximum with four-byte characters. The
        // renderer must hold the byte bound even then.
        let registry = IntentRegistry::new();
        for template in registry.templates() {
            let values: std::collections::BTreeMap<String, String> = template
                .slots
                .iter()
                .map(|s| (s.name.to_string(), "\u{1F600}".repeat(s.max_len)))
                .collect();
            let rendered = crate::render::render(template, &values);
            assert!(
                rendered.len() <= MAX_RENDERED_LEN,
                "worst-case render of {:?} is {} bytes",
                template.intent,
                rendered.len()
            );
        }
    }

    #[test]
    fn get_returns_the_matching_template() {
        let registry = IntentRegistry::new();
        let t = registry.get(Intent::ConfirmAvailability);
        assert_eq!(t.intent, Intent::ConfirmAvailability);
        assert!(t.slots.is_empty());
    }

    #[test]
    fn propose_time_slots_are_shape_checked_kinds() {
        let registry = IntentRegistry::new();
        let t = registry.get(Intent::ProposeTime);
        assert_eq!(t.slot("day").unwrap().kind, SlotKind::Date);
        assert_eq!(t.slot("time").unwrap().kind, SlotKind::Time);
        assert!(t.slot("phone").is_none());
    }
}
