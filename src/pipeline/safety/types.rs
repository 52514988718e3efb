use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::CrisisType;

/// Score at or above which the canned resource reply replaces generation.
pub const OVERRIDE_THRESHOLD: u8 = 9;
/// Score at or above which the prompt carries crisis-aware instructions.
pub const PRIMED_THRESHOLD: u8 = 6;
/// Score at or above which the prompt carries a soft awareness note.
pub const AWARE_THRESHOLD: u8 = 3;
/// Ceiling for any family score.
pub const MAX_SCORE: u8 = 10;

/// Outcome of crisis screening for one user turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrisisAssessment {
    /// Severity 0-10. Maximum across pattern families.
    pub score: u8,
    pub primary_type: CrisisType,
    /// Ids of every pattern that matched, in table order.
    pub matched_pattern_ids: Vec<String>,
    /// Framing that forced the score to zero, if any.
    pub suppressed_by: Option<Suppression>,
}

impl CrisisAssessment {
    pub fn safe() -> Self {
        Self {
            score: 0,
            primary_type: CrisisType::Safe,
            matched_pattern_ids: Vec::new(),
            suppressed_by: None,
        }
    }

    /// Matched patterns were found but a framing filter neutralised them.
    pub fn suppressed(matched_pattern_ids: Vec<String>, by: Suppression) -> Self {
        Self {
            score: 0,
            primary_type: CrisisType::Safe,
            matched_pattern_ids,
            suppressed_by: Some(by),
        }
    }

    pub fn tier(&self) -> SafetyTier {
        match self.score {
            s if s >= OVERRIDE_THRESHOLD => SafetyTier::Override,
            s if s >= PRIMED_THRESHOLD => SafetyTier::Primed,
            s if s >= AWARE_THRESHOLD => SafetyTier::Aware,
            _ => SafetyTier::Clear,
        }
    }

    pub fn requires_override(&self) -> bool {
        self.tier() == SafetyTier::Override
    }
}

/// What the pipeline does with an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyTier {
    /// 9-10: canned resource text, no completion call.
    Override,
    /// 6-8: completion call with crisis-aware instructions.
    Primed,
    /// 3-5: normal flow with a soft awareness note.
    Aware,
    /// 0-2: no safety framing.
    Clear,
}

/// Regex family a crisis pattern belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrisisFamily {
    SuicideSelfHarm,
    DomesticViolence,
    ChildAbuse,
    SevereDistress,
}

impl CrisisFamily {
    /// Evaluation order; earlier families win score ties.
    pub const ORDER: [CrisisFamily; 4] = [
        Self::SuicideSelfHarm,
        Self::DomesticViolence,
        Self::ChildAbuse,
        Self::SevereDistress,
    ];
}

/// Framing that neutralises literal crisis keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suppression {
    Hypothetical,
    PastTense,
    ThirdParty,
    FamilyDrama,
    Figurative,
    /// User is questioning the previous crisis reply.
    CrisisClarification,
}

/// Non-crisis conversational boundary crossed by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryKind {
    Romantic,
    Delusional,
}

/// Result of input sanitization (pre-analysis).
#[derive(Debug, Clone)]
pub struct SanitizedInput {
    /// The cleaned text.
    pub text: String,
    /// Whether any modifications were made.
    pub was_modified: bool,
    /// What was stripped, without user content.
    pub modifications: Vec<InputModification>,
}

/// A modification made during input sanitization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputModification {
    pub kind: InputModificationKind,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputModificationKind {
    InvisibleUnicodeRemoved,
    ControlCharacterRemoved,
    ExcessiveLengthTruncated,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SafetyError {
    #[error("Input is empty after sanitization")]
    EmptyInput,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_score(score: u8) -> CrisisAssessment {
        CrisisAssessment {
            score,
            ..CrisisAssessment::safe()
        }
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(with_score(0).tier(), SafetyTier::Clear);
        assert_eq!(with_score(2).tier(), SafetyTier::Clear);
        assert_eq!(with_score(3).tier(), SafetyTier::Aware);
        assert_eq!(with_score(5).tier(), SafetyTier::Aware);
        assert_eq!(with_score(6).tier(), SafetyTier::Primed);
        assert_eq!(with_score(8).tier(), SafetyTier::Primed);
        assert_eq!(with_score(9).tier(), SafetyTier::Override);
        assert_eq!(with_score(10).tier(), SafetyTier::Override);
    }

    #[test]
    fn suppressed_assessment_is_safe() {
        let a = CrisisAssessment::suppressed(vec!["wish_dead".into()], Suppression::PastTense);
        assert_eq!(a.score, 0);
        assert_eq!(a.primary_type, CrisisType::Safe);
        assert!(!a.requires_override());
        assert_eq!(a.matched_pattern_ids, vec!["wish_dead".to_string()]);
    }
}
