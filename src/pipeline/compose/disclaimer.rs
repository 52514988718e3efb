//! Professional-help disclaimer: full wording once per session, gentler
//! nudges afterwards.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::EmotionalTone;
use crate::pipeline::context::ConversationContext;
use crate::session::UserProfile;

pub const FULL_DISCLAIMER: &str =
    "(I'm here to listen, but for something this serious, talking to a professional would really help.)";

pub const GENTLE_DISCLAIMERS: [&str; 5] = [
    "Talking to a professional might help with that feeling.",
    "A counselor could help you work through this.",
    "Reaching out to a therapist might be beneficial for you.",
    "Professional support could make a real difference here.",
    "Getting guidance from a counselor might help you navigate this.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disclaimer {
    Full,
    Gentle(&'static str),
}

impl Disclaimer {
    pub fn text(&self) -> &'static str {
        match self {
            Self::Full => FULL_DISCLAIMER,
            Self::Gentle(text) => text,
        }
    }
}

/// Which disclaimer this turn needs, if any. Marks the profile when the
/// full wording is requested.
pub fn choose_disclaimer<R: Rng + ?Sized>(
    context: &ConversationContext,
    profile: &mut UserProfile,
    rng: &mut R,
) -> Option<Disclaimer> {
    let full = |profile: &mut UserProfile| {
        profile.disclaimer_shown = true;
        Some(Disclaimer::Full)
    };

    if context.disclosure_depth >= 5 || context.emotional_tone == EmotionalTone::Crisis {
        return full(profile);
    }
    if context.disclosure_depth >= 4 {
        if !profile.disclaimer_shown {
            return full(profile);
        }
        let gentle = GENTLE_DISCLAIMERS.choose(rng).copied()?;
        return Some(Disclaimer::Gentle(gentle));
    }
    if context.is_post_crisis && !profile.disclaimer_shown {
        return full(profile);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn context(depth: u8) -> ConversationContext {
        ConversationContext {
            disclosure_depth: depth,
            ..ConversationContext::default()
        }
    }

    #[test]
    fn full_once_then_gentle() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut profile = UserProfile::new();
        assert_eq!(
            choose_disclaimer(&context(4), &mut profile, &mut rng),
            Some(Disclaimer::Full)
        );
        assert!(profile.disclaimer_shown);
        let second = choose_disclaimer(&context(4), &mut profile, &mut rng);
        assert!(matches!(second, Some(Disclaimer::Gentle(_))));
    }

    #[test]
    fn deepest_disclosure_always_full() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut profile = UserProfile {
            disclaimer_shown: true,
            ..UserProfile::default()
        };
        assert_eq!(
            choose_disclaimer(&context(5), &mut profile, &mut rng),
            Some(Disclaimer::Full)
        );
    }

    #[test]
    fn shallow_turns_get_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut profile = UserProfile::new();
        assert_eq!(choose_disclaimer(&context(3), &mut profile, &mut rng), None);
        assert!(!profile.disclaimer_shown);
    }

    #[test]
    fn post_crisis_only_before_first_showing() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut profile = UserProfile::new();
        let ctx = ConversationContext {
            is_post_crisis: true,
            ..context(2)
        };
        assert_eq!(choose_disclaimer(&ctx, &mut profile, &mut rng), Some(Disclaimer::Full));
        assert_eq!(choose_disclaimer(&ctx, &mut profile, &mut rng), None);
    }

    #[test]
    fn disclaimer_text_has_no_asterisks() {
        assert!(!FULL_DISCLAIMER.contains('*'));
        assert!(GENTLE_DISCLAIMERS.iter().all(|d| !d.contains('*')));
    }
}
