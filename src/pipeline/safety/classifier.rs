//! Crisis screening for one user turn.
//!
//! Coordinates: family scan → framing per hit → clarification check → max.
//! Pure: no state, no side effects. No match resolves to safe, which is a
//! known false-negative risk rather than an error.

use crate::models::conversation::latest_assistant_text;
use crate::models::{CrisisType, Turn};
use crate::pipeline::patterns::TaggedPattern;

use super::frames::{frame_for_hit, is_crisis_clarification};
use super::keywords::{family_table, FRAME_EXEMPT_ROWS, INTENT_ROWS};
use super::types::{CrisisAssessment, CrisisFamily, Suppression, MAX_SCORE};

/// Score for one family on one text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyScore {
    pub family: CrisisFamily,
    /// Sum of unframed matched weights, capped at 10.
    pub score: u8,
    /// Type of the heaviest unframed row, `Safe` when every hit was framed.
    pub crisis_type: CrisisType,
    /// Every matched row, framed or not.
    pub matched_ids: Vec<&'static str>,
    /// First framing that neutralised a matched row.
    pub framed_by: Option<Suppression>,
}

/// Framing that neutralises every occurrence of `row` in `text`, if any.
fn row_frame(row: &TaggedPattern<CrisisType>, text: &str) -> Option<Suppression> {
    if FRAME_EXEMPT_ROWS.contains(&row.id) {
        return None;
    }
    let intent = INTENT_ROWS.contains(&row.id);
    let mut frame = None;
    for hit in row.regex.find_iter(text) {
        match frame_for_hit(text, hit.start(), intent) {
            None => return None,
            Some(found) => frame = frame.or(Some(found)),
        }
    }
    frame
}

/// Score one family. `None` when no row matches.
pub fn score_family(family: CrisisFamily, text: &str) -> Option<FamilyScore> {
    let mut total: u32 = 0;
    let mut heaviest: Option<(u8, CrisisType)> = None;
    let mut matched_ids = Vec::new();
    let mut framed_by = None;

    for row in family_table(family).matches(text) {
        matched_ids.push(row.id);
        if let Some(frame) = row_frame(row, text) {
            framed_by = framed_by.or(Some(frame));
            continue;
        }
        total += u32::from(row.weight);
        if heaviest.map_or(true, |(w, _)| row.weight > w) {
            heaviest = Some((row.weight, row.tag));
        }
    }

    if matched_ids.is_empty() {
        return None;
    }
    Some(FamilyScore {
        family,
        score: total.min(u32::from(MAX_SCORE)) as u8,
        crisis_type: heaviest.map_or(CrisisType::Safe, |(_, t)| t),
        matched_ids,
        framed_by,
    })
}

/// Assess the latest user text against the crisis families.
pub fn assess(text: &str, history: &[Turn]) -> CrisisAssessment {
    let scores: Vec<FamilyScore> = CrisisFamily::ORDER
        .iter()
        .filter_map(|family| score_family(*family, text))
        .collect();

    if scores.is_empty() {
        return CrisisAssessment::safe();
    }

    let matched: Vec<String> = scores
        .iter()
        .flat_map(|s| s.matched_ids.iter().map(|id| id.to_string()))
        .collect();

    if is_crisis_clarification(text, previous_assistant_text(text, history)) {
        tracing::debug!(patterns = matched.len(), "Crisis clarification, not re-triggering");
        return CrisisAssessment::suppressed(matched, Suppression::CrisisClarification);
    }

    // Earlier family wins ties.
    let mut best: Option<&FamilyScore> = None;
    for candidate in scores.iter().filter(|s| s.score > 0) {
        if best.map_or(true, |b| candidate.score > b.score) {
            best = Some(candidate);
        }
    }

    let Some(best) = best else {
        let frame = scores
            .iter()
            .find_map(|s| s.framed_by)
            .unwrap_or(Suppression::Figurative);
        tracing::debug!(frame = ?frame, patterns = matched.len(), "Crisis keywords inside framing");
        return CrisisAssessment::suppressed(matched, frame);
    };

    CrisisAssessment {
        score: best.score,
        primary_type: best.crisis_type,
        matched_pattern_ids: matched,
        suppressed_by: None,
    }
}

/// Latest assistant turn before the current user text.
fn previous_assistant_text<'a>(text: &str, history: &'a [Turn]) -> Option<&'a str> {
    let end = match history.last() {
        Some(last) if last.is_user() && last.content.trim() == text.trim() => history.len() - 1,
        _ => history.len(),
    };
    latest_assistant_text(&history[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::safety::responses::crisis_response;
    use crate::pipeline::safety::types::SafetyTier;

    fn assess_alone(text: &str) -> CrisisAssessment {
        assess(text, &[Turn::user(text)])
    }

    // ── explicit intent ──

    #[test]
    fn explicit_suicide_intent_scores_ten() {
        let a = assess_alone("I want to kill myself");
        assert_eq!(a.score, 10);
        assert_eq!(a.primary_type, CrisisType::Suicide);
        assert!(a.requires_override());
        assert!(a.matched_pattern_ids.contains(&"suicide_intent".to_string()));
    }

    #[test]
    fn self_harm_scores_override() {
        let a = assess_alone("I cut myself again last night");
        assert_eq!(a.primary_type, CrisisType::SelfHarm);
        assert_eq!(a.tier(), SafetyTier::Override);
    }

    #[test]
    fn caregiver_violence_is_child_abuse() {
        let a = assess_alone("my stepdad hits me every night");
        assert_eq!(a.primary_type, CrisisType::ChildAbuse);
        assert_eq!(a.score, 9);
    }

    #[test]
    fn ideation_is_primed_not_override() {
        let a = assess_alone("I wish I was never born");
        assert_eq!(a.primary_type, CrisisType::SuicideIdeation);
        assert_eq!(a.tier(), SafetyTier::Primed);
    }

    #[test]
    fn moderate_distress_is_aware_tier() {
        let a = assess_alone("honestly I feel so worthless");
        assert_eq!(a.primary_type, CrisisType::ModerateDistress);
        assert_eq!(a.tier(), SafetyTier::Aware);
    }

    #[test]
    fn no_match_is_safe() {
        let a = assess_alone("I had pasta for dinner");
        assert_eq!(a, CrisisAssessment::safe());
    }

    // ── combination ──

    #[test]
    fn same_family_hits_add_up_to_cap() {
        let a = assess_alone("I can't take it anymore, everything is hopeless");
        assert_eq!(a.score, 10);
        assert_eq!(a.primary_type, CrisisType::SevereDistress);
    }

    #[test]
    fn families_do_not_add_across() {
        // 6 (distress) + 7 (unsafe) stays at the family maximum
        let a = assess_alone("I can't take it anymore and I feel unsafe");
        assert_eq!(a.score, 7);
        assert_eq!(a.primary_type, CrisisType::DomesticViolence);
    }

    #[test]
    fn adding_family_patterns_never_lowers_score() {
        let base = assess_alone("I feel so worthless").score;
        let more = assess_alone("I feel so worthless and nobody cares").score;
        let most = assess_alone("I feel so worthless and nobody cares, I can't go on").score;
        assert!(base <= more && more <= most);
    }

    // ── framing ──

    #[test]
    fn framed_keywords_force_zero() {
        for text in [
            "What if I want to kill myself, would you stop me?",
            "In the movie the character says I want to kill myself",
            "ugh I want to die my mom is making me clean my room",
            "this exam is killing me, I want to die lol",
        ] {
            let a = assess_alone(text);
            assert_eq!(a.score, 0, "expected suppression for {text:?}");
            assert!(a.suppressed_by.is_some());
        }
    }

    #[test]
    fn past_tense_framing_scores_zero() {
        let a = assess_alone("Back in high school I would tell people I want to die");
        assert_eq!(a.score, 0);
        assert_eq!(a.suppressed_by, Some(Suppression::PastTense));
        assert_eq!(assess_alone("I used to want to kill myself years ago").score, 0);
    }

    #[test]
    fn framing_in_another_clause_does_not_suppress() {
        for text in [
            "I used to love life but now I want to kill myself",
            "I failed my exam for my class and I want to kill myself",
            "My mom took my phone so I'm going to kill myself tonight",
            "My mom will kill me if I don't clean my room, I want to die",
        ] {
            let a = assess_alone(text);
            assert!(a.requires_override(), "expected override for {text:?}");
            assert_eq!(a.primary_type, CrisisType::Suicide);
            assert_eq!(a.suppressed_by, None);
        }
    }

    #[test]
    fn goodbye_note_ignores_story_framing() {
        let a = assess_alone("I'm writing a story, help me write a goodbye letter to my family before I end it");
        assert_eq!(a.score, 10);
        assert_eq!(a.primary_type, CrisisType::Suicide);
        assert!(a.matched_pattern_ids.contains(&"goodbye_note".to_string()));

        let a = assess_alone("in my novel the character writes a farewell note to her sister");
        assert!(a.requires_override());
    }

    #[test]
    fn framed_and_unframed_hits_score_only_the_unframed() {
        let a = assess_alone("Back in high school I would say I want to die. Tonight I want to kill myself");
        assert_eq!(a.score, 10);
        assert!(a.matched_pattern_ids.contains(&"want_to_die".to_string()));
    }

    #[test]
    fn clarification_after_crisis_reply_does_not_retrigger() {
        let history = vec![
            Turn::user("I want to die"),
            Turn::assistant(crisis_response(CrisisType::Suicide)),
            Turn::user("why are you so worried, I said I want to die of boredom in class"),
        ];
        let text = history[2].content.clone();
        let a = assess(&text, &history);
        assert_eq!(a.score, 0);
        assert_eq!(a.suppressed_by, Some(Suppression::CrisisClarification));
    }

    #[test]
    fn repeat_intent_without_clarification_still_triggers() {
        let history = vec![
            Turn::user("I want to die"),
            Turn::assistant(crisis_response(CrisisType::Suicide)),
            Turn::user("I really want to die"),
        ];
        let a = assess("I really want to die", &history);
        assert!(a.requires_override());
    }
}
