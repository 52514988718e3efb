use serde::{Deserialize, Serialize};

/// Error returned when a tag string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {field} value: {value}")]
pub struct TagParseError {
    pub field: String,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = TagParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(TagParseError {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Role {
    User => "user",
    Assistant => "assistant",
    System => "system",
});

str_enum!(TemporalScope {
    Ongoing => "ongoing",
    SingleEvent => "single_event",
    Past => "past",
    Future => "future",
    Hypothetical => "hypothetical",
});

str_enum!(EmotionalTone {
    Neutral => "neutral",
    Positive => "positive",
    Negative => "negative",
    Mixed => "mixed",
    Crisis => "crisis",
    PostCrisis => "post_crisis",
    Anxiety => "anxiety",
});

impl EmotionalTone {
    /// Tones that call for an emotionally attuned reply.
    pub fn is_distressed(&self) -> bool {
        matches!(self, Self::Negative | Self::Anxiety | Self::Crisis | Self::Mixed)
    }
}

str_enum!(TopicType {
    Question => "question",
    Greeting => "greeting",
    Gratitude => "gratitude",
    Feeling => "feeling",
    Problem => "problem",
    Relationship => "relationship",
    Achievement => "achievement",
    PlayfulBanter => "playful_banter",
    General => "general",
});

str_enum!(UrgencyLevel {
    None => "none",
    Low => "low",
    Medium => "medium",
    High => "high",
    Crisis => "crisis",
});

str_enum!(CrisisType {
    Safe => "safe",
    Suicide => "suicide",
    SelfHarm => "self_harm",
    SuicideIdeation => "suicide_ideation",
    DomesticViolence => "domestic_violence",
    ChildAbuse => "child_abuse",
    SevereDistress => "severe_distress",
    ModerateDistress => "moderate_distress",
});

str_enum!(MessageElement {
    Gratitude => "gratitude",
    Goodbye => "goodbye",
    NameChange => "name_change",
    Question => "question",
    Problem => "problem",
    Emotion => "emotion",
    FuturePlans => "future_plans",
    Playfulness => "playfulness",
    Request => "request",
    TimeReference => "time_reference",
});

impl MessageElement {
    pub const ALL: [MessageElement; 10] = [
        Self::Gratitude,
        Self::Goodbye,
        Self::NameChange,
        Self::Question,
        Self::Problem,
        Self::Emotion,
        Self::FuturePlans,
        Self::Playfulness,
        Self::Request,
        Self::TimeReference,
    ];
}

str_enum!(ImplicitRequest {
    CrisisResourceQuestion => "crisis_resource_question",
    CrisisClarification => "crisis_clarification",
    Empathy => "empathy",
    AcknowledgeGratitude => "acknowledge_gratitude",
    GentleEncouragement => "gentle_encouragement",
    MatchPlayfulEnergy => "match_playful_energy",
    ValidationOfExperience => "validation_of_experience",
    Guidance => "guidance",
    SpaceToTalk => "space_to_talk",
    GuidanceNeeded => "guidance_needed",
    IdentityName => "identity_question_name",
    IdentityEmail => "identity_question_email",
    IdentityRecognition => "identity_question_recognition",
});

str_enum!(Contradiction {
    EmotionalStateMismatch => "emotional_state_mismatch",
});
