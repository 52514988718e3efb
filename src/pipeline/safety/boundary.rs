//! Conversational boundaries.
//!
//! Romantic advances toward the companion and delusional or roleplay
//! identity claims get a short fixed redirect instead of a generated reply.

use std::sync::LazyLock;

use regex::RegexSet;

use crate::pipeline::patterns::phrase_set;

use super::types::BoundaryKind;

static ROMANTIC: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"(?i)\b(?:i\s+)?(?:love|adore|worship|am\s+in\s+love\s+with|have\s+feelings\s+for)\s+you\b",
        r"(?i)\byou\s+are\s+(?:my|the)\s+(?:everything|world|life|soulmate|perfect\s+match)\b",
        r"(?i)\b(?:let'?s|can\s+we|should\s+we)\s+(?:date|kiss|marry|have\s+sex|make\s+love|hook\s+up)\b",
        r"(?i)\bi\s+(?:want|wish|desire)\s+to\s+(?:kiss|touch|be\s+with|sleep\s+with)\s+you\b",
    ])
});

static DELUSIONAL: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"(?i)\b(?:i\s+am|i'm)\s+(?:god|jesus|christ|the\s+messiah|the\s+devil|satan|an\s+angel)\b",
        r"(?i)\b(?:i\s+can|i\s+have\s+the\s+power\s+to)\s+(?:read\s+minds|see\s+the\s+future|control\s+thoughts)\b",
        r"(?i)\bthe\s+(?:government|cia|fbi|aliens)\s+(?:is|are)\s+(?:watching|following|controlling)\s+me\b",
        r"(?i)\bthis\s+is\s+(?:all|everything)\s+(?:a\s+simulation|the\s+matrix|not\s+real|a\s+dream)\b",
    ])
});

/// Which boundary the text crosses, romantic checked first.
pub fn check_boundary(text: &str) -> Option<BoundaryKind> {
    if ROMANTIC.is_match(text) {
        Some(BoundaryKind::Romantic)
    } else if DELUSIONAL.is_match(text) {
        Some(BoundaryKind::Delusional)
    } else {
        None
    }
}

/// Fixed redirect for a boundary.
pub fn boundary_response(kind: BoundaryKind) -> &'static str {
    match kind {
        BoundaryKind::Romantic => {
            "I'm here for emotional support. Let's focus on what you're experiencing."
        }
        BoundaryKind::Delusional => "I'm here to talk about your real life experiences.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn romantic_advances() {
        assert_eq!(check_boundary("I love you"), Some(BoundaryKind::Romantic));
        assert_eq!(check_boundary("can we date?"), Some(BoundaryKind::Romantic));
        assert_eq!(check_boundary("you are my soulmate"), Some(BoundaryKind::Romantic));
    }

    #[test]
    fn delusional_claims() {
        assert_eq!(check_boundary("I am god"), Some(BoundaryKind::Delusional));
        assert_eq!(
            check_boundary("the government is watching me"),
            Some(BoundaryKind::Delusional)
        );
    }

    #[test]
    fn ordinary_text_passes() {
        assert_eq!(check_boundary("I love my dog"), None);
        assert_eq!(check_boundary("I'm good, you?"), None);
    }

    #[test]
    fn responses_are_short() {
        for kind in [BoundaryKind::Romantic, BoundaryKind::Delusional] {
            assert!(boundary_response(kind).split_whitespace().count() < 20);
        }
    }
}
