// SPDX-FileCopyrightText: 2026 Smajobb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pattern detectors, in fixed order, each independently able to block.
//!
//! 1. Phone-number-like digit runs
//! 2. Email addresses (plain and obfuscated)
//! 3. Social handles and "find me on X" phrasing
//! 4. URLs
//! 5. Denylisted unsafe tokens
//!
//! The scanner matches patterns and nothing else: it never attempts to
//! judge the sender's intent beyond what the text shape shows.

use std::sync::LazyLock;

use regex::Regex;
use strum::Display;

use crate::denylist;

/// Seven or more digits, optionally separated by common punctuation.
/// Catches `91234567`, `912 34 567`, `+47 912-34-567`.
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d(?:[\s().\-/]*\d){6,}").unwrap());

/// Plain email addresses.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").unwrap()
});

/// Spelled-out email obfuscations: `name (at) domain (dot) com`, `name at domain dot no`.
static EMAIL_OBFUSCATED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)[A-Za-z0-9._%+\-]+\s*(?:\(at\)|\bat\b)\s*[A-Za-z0-9\-]+\s*(?:\(dot\)|\bdot\b)\s*[A-Za-z]{2,}",
    )
    .unwrap()
});

/// A messaging-platform keyword followed by a handle-like token.
static PLATFORM_HANDLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:snap(?:chat)?|insta(?:gram)?|tiktok|telegram|discord|whats\s?app|signal|messenger|skype|kik)\b\s*[:\-]?\s*[@#]?[A-Za-z0-9._\-]{2,}",
    )
    .unwrap()
});

/// A bare `@handle` token (not preceded by a word character, so email
/// local parts don't double-report here).
static BARE_HANDLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^\w])@[A-Za-z0-9_.]{3,}").unwrap());

/// "Find/add/follow/dm me" phrasing that precedes a handle exchange.
static FIND_ME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:find|add|follow|dm|text|message)\s+me\b").unwrap()
});

/// Explicit URLs and bare domains on common TLDs.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:https?://|www\.)\S+|\b[a-z0-9\-]+\.(?:com|net|org|no|io|me|gg|app)(?:/\S*)?\b",
    )
    .unwrap()
});

/// Detection categories, in scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum DetectionCategory {
    PhoneNumber,
    Email,
    SocialHandle,
    Url,
    UnsafeToken,
}

impl DetectionCategory {
    /// Whether this category is contact-information exfiltration
    /// (categories 1-4) as opposed to an unsafe token (category 5).
    pub fn is_contact_info(self) -> bool {
        !matches!(self, DetectionCategory::UnsafeToken)
    }

    /// Short, non-coaching reason for the rejection. Deliberately does not
    /// name the exact pattern that fired.
    pub fn reason(self) -> &'static str {
        match self {
            DetectionCategory::PhoneNumber
            | DetectionCategory::Email
            | DetectionCategory::SocialHandle
            | DetectionCategory::Url => "messages cannot contain contact information or links",
            DetectionCategory::UnsafeToken => "this message contains content that is not allowed",
        }
    }
}

/// Age-derived scanning policy for one send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanPolicy {
    /// True when either side of the conversation is in the minor bracket.
    /// Contact-information detections (categories 1-4) are hard failures
    /// under this policy. Unsafe tokens block regardless.
    pub involves_minor: bool,
}

impl ScanPolicy {
    pub fn for_minor_conversation() -> Self {
        ScanPolicy {
            involves_minor: true,
        }
    }

    fn blocks(&self, category: DetectionCategory) -> bool {
        if category.is_contact_info() {
            self.involves_minor
        } else {
            true
        }
    }
}

/// Result of scanning one value.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Whether the value must be rejected under the given policy.
    pub blocked: bool,
    /// The first blocking category's public reason.
    pub reason: Option<&'static str>,
    /// Every category that matched, blocking or not. Kept for the audit
    /// trail; never surfaced to the sender.
    pub hits: Vec<DetectionCategory>,
}

impl ScanOutcome {
    fn clean() -> Self {
        ScanOutcome {
            blocked: false,
            reason: None,
            hits: Vec::new(),
        }
    }
}

/// Scan a single candidate slot value.
pub fn scan(value: &str, policy: ScanPolicy) -> ScanOutcome {
    let mut outcome = ScanOutcome::clean();

    let mut record = |category: DetectionCategory, outcome: &mut ScanOutcome| {
        outcome.hits.push(category);
        if policy.blocks(category) {
            outcome.blocked = true;
            if outcome.reason.is_none() {
                outcome.reason = Some(category.reason());
            }
        }
    };

    if PHONE_PATTERN.is_match(value) {
        record(DetectionCategory::PhoneNumber, &mut outcome);
    }
    if EMAIL_PATTERN.is_match(value) || EMAIL_OBFUSCATED_PATTERN.is_match(value) {
        record(DetectionCategory::Email, &mut outcome);
    }
    if PLATFORM_HANDLE_PATTERN.is_match(value)
        || BARE_HANDLE_PATTERN.is_match(value)
        || FIND_ME_PATTERN.is_match(value)
    {
        record(DetectionCategory::SocialHandle, &mut outcome);
    }
    if URL_PATTERN.is_match(value) {
        record(DetectionCategory::Url, &mut outcome);
    }
    if denylist::first_hit(value).is_some() {
        record(DetectionCategory::UnsafeToken, &mut outcome);
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minor_policy() -> ScanPolicy {
        ScanPolicy::for_minor_conversation()
    }

    #[test]
    fn detects_plain_phone_number() {
        let outcome = scan("call me at 91234567", minor_policy());
        assert!(outcome.blocked);
        assert!(outcome.hits.contains(&DetectionCategory::PhoneNumber));
    }

    #[test]
    fn detects_separated_phone_number() {
        for value in ["912 34 567", "+47 912-34-567", "(912) 34.567"] {
            let outcome = scan(value, minor_policy());
            assert!(outcome.blocked, "should block {value:?}");
        }
    }

    #[test]
    fn six_digits_do_not_trip_the_phone_detector() {
        // Short numbers (prices, postal codes) are legitimate.
        let outcome = scan("123456", minor_policy());
        assert!(!outcome.hits.contains(&DetectionCategory::PhoneNumber));
    }

    #[test]
    fn detects_email_addresses() {
        let outcome = scan("write to kari.nordmann@example.no please", minor_policy());
        assert!(outcome.blocked);
        assert!(outcome.hits.contains(&DetectionCategory::Email));
    }

    #[test]
    fn detects_obfuscated_email() {
        let outcome = scan("kari (at) example (dot) com", minor_policy());
        assert!(outcome.blocked);
        assert!(outcome.hits.contains(&DetectionCategory::Email));
    }

    #[test]
    fn detects_platform_handles() {
        for value in [
            "snap: kari123",
            "add me on Instagram @kari.n",
            "my discord is kari#1234",
        ] {
            let outcome = scan(value, minor_policy());
            assert!(
                outcome.hits.contains(&DetectionCategory::SocialHandle),
                "should detect {value:?}"
            );
            assert!(outcome.blocked);
        }
    }

    #[test]
    fn detects_bare_at_handle() {
        let outcome = scan("im @kari_n ok", minor_policy());
        assert!(outcome.hits.contains(&DetectionCategory::SocialHandle));
    }

    #[test]
    fn detects_urls_and_bare_domains() {
        for value in ["https://example.com/x", "www.example.no", "example.com"] {
            let outcome = scan(value, minor_policy());
            assert!(
                outcome.hits.contains(&DetectionCategory::Url),
                "should detect {value:?}"
            );
        }
    }

    #[test]
    fn unsafe_tokens_block_even_without_minor() {
        let adult_only = ScanPolicy {
            involves_minor: false,
        };
        let outcome = scan("this stays between us", adult_only);
        assert!(outcome.blocked);
        assert_eq!(outcome.hits, vec![DetectionCategory::UnsafeToken]);
    }

    #[test]
    fn contact_info_not_blocked_in_adult_only_policy() {
        let adult_only = ScanPolicy {
            involves_minor: false,
        };
        let outcome = scan("91234567", adult_only);
        assert!(!outcome.blocked);
        // Still recorded for the audit trail.
        assert!(outcome.hits.contains(&DetectionCategory::PhoneNumber));
    }

    #[test]
    fn reason_is_generic_not_a_checklist() {
        let outcome = scan("call 91234567 or mail a@b.no", minor_policy());
        let reason = outcome.reason.unwrap();
        assert!(!reason.contains("phone"));
        assert!(!reason.contains("digit"));
    }

    #[test]
    fn clean_values_pass() {
        for value in ["Saturday", "14:30", "3", "I can bring my own rake"] {
            let outcome = scan(value, minor_policy());
            assert!(!outcome.blocked, "should pass {value:?}");
            assert!(outcome.hits.is_empty());
        }
    }
}
