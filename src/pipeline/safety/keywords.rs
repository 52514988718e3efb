//! Crisis pattern families.
//!
//! Each family is an ordered table of (id, regex, crisis type, weight).
//! Weights add within a family and are capped at 10 by the classifier.

use std::sync::LazyLock;

use crate::models::CrisisType;
use crate::pipeline::patterns::{tagged, PatternTable};

use super::types::CrisisFamily;

/// First-person intent rows. Past-tense, third-party and family-drama
/// frames do not neutralise these next to a present-time marker.
pub const INTENT_ROWS: &[&str] = &[
    "suicide_intent",
    "suicide_intent_contracted",
    "suicide_method",
    "want_to_die",
    "kms",
    "self_harm_urge",
];

/// Rows no framing neutralises. A goodbye note inside a story or roleplay
/// is still a goodbye note.
pub const FRAME_EXEMPT_ROWS: &[&str] = &["goodbye_note"];

/// Suicide and self-harm intent.
static SUICIDE_SELF_HARM: LazyLock<PatternTable<CrisisType>> = LazyLock::new(|| {
    PatternTable::new(vec![
        tagged(
            "suicide_intent",
            r"(?i)\bi(?:'m|\s+am)?\s+(?:going\s+to|gonna|about\s+to|planning\s+(?:on|to)|want(?:ing)?\s+to|wanna|need\s+to|will|have\s+to|decided\s+to)\s+(?:kill\s+myself|end\s+(?:my\s+life|it\s+all)|commit\s+suicide|take\s+my\s+(?:own\s+)?life)",
            CrisisType::Suicide,
            10,
        ),
        tagged(
            "suicide_intent_contracted",
            r"(?i)\bi'll\s+(?:just\s+)?(?:kill\s+myself|end\s+(?:my\s+life|it\s+all)|commit\s+suicide)",
            CrisisType::Suicide,
            10,
        ),
        tagged(
            "suicide_method",
            r"(?i)\b(?:how\s+(?:many|much)\s+\w+\s+(?:to|would|will)\s+(?:kill\s+me|overdose)|(?:going\s+to|want\s+to|gonna)\s+(?:overdose|hang\s+myself|jump\s+off))",
            CrisisType::Suicide,
            10,
        ),
        tagged(
            "goodbye_note",
            r"(?i)\b(?:write|writes|writing|wrote|help\s+me\s+(?:write|with))\s+(?:a|my)\s+(?:goodbye|farewell|suicide|final|last)\s+(?:letter|note|message)",
            CrisisType::Suicide,
            10,
        ),
        tagged(
            "want_to_die",
            r"(?i)\bi\s+(?:really\s+|just\s+|still\s+)?(?:want|wanna|need)\s+(?:to\s+)?die\b",
            CrisisType::Suicide,
            9,
        ),
        tagged(
            "kms",
            r"(?i)\bkms\b",
            CrisisType::Suicide,
            9,
        ),
        tagged(
            "self_harm_act",
            r"(?i)\bi(?:'ve\s+been|\s+have\s+been|\s+keep|\s+kept|\s+started|\s+still)?\s+(?:cut|cutting|burn|burning|burned|hurt|hurting|harm|harming|scratch|scratching)\s+myself\b",
            CrisisType::SelfHarm,
            9,
        ),
        tagged(
            "self_harm_urge",
            r"(?i)\bi\s+(?:want|need|feel\s+like|have\s+the\s+urge)\s+(?:to\s+)?(?:hurt|cut|harm|burn|punish)\s+myself\b",
            CrisisType::SelfHarm,
            9,
        ),
        tagged(
            "self_harm_first_person",
            r"(?i)\bi\s+(?:self[\s-]?harm|relapsed)\b",
            CrisisType::SelfHarm,
            9,
        ),
        tagged(
            "suicidal_feeling",
            r"(?i)\bi(?:'m|\s+am|\s+feel|'ve\s+been|\s+have\s+been)\s+(?:so\s+|really\s+|very\s+|kind\s+of\s+|kinda\s+)?suicidal\b",
            CrisisType::SuicideIdeation,
            8,
        ),
        tagged(
            "wish_dead",
            r"(?i)\bi\s+wish\s+(?:i\s+(?:was|were)\s+dead|i\s+(?:could|would)\s+(?:just\s+)?die|i\s+(?:was|were)\s+never\s+born|i\s+(?:wasn't|weren't)\s+(?:alive|here|born))",
            CrisisType::SuicideIdeation,
            8,
        ),
        tagged(
            "dont_want_to_live",
            r"(?i)\bi\s+(?:don'?t|do\s+not)\s+want\s+to\s+(?:live|be\s+alive|exist|wake\s+up)\b",
            CrisisType::SuicideIdeation,
            8,
        ),
        tagged(
            "nothing_to_live_for",
            r"(?i)\b(?:nothing|no\s+reason|no\s+point)\s+(?:left\s+)?(?:to\s+live\s+for|in\s+living|to\s+keep\s+living)\b",
            CrisisType::SuicideIdeation,
            7,
        ),
        tagged(
            "better_off_without_me",
            r"(?i)\b(?:everyone|everybody|they|the\s+world|my\s+family|people)\s+(?:would\s+be|'d\s+be|are|is)\s+better\s+off\s+without\s+me\b",
            CrisisType::SuicideIdeation,
            7,
        ),
        tagged(
            "self_harm_mention",
            r"(?i)\bself[\s-]?harm(?:ing)?\b",
            CrisisType::SelfHarm,
            5,
        ),
    ])
});

/// Partner and household violence.
static DOMESTIC_VIOLENCE: LazyLock<PatternTable<CrisisType>> = LazyLock::new(|| {
    PatternTable::new(vec![
        tagged(
            "partner_violence",
            r"(?i)\bmy\s+(?:husband|wife|boyfriend|girlfriend|partner|ex|spouse|fianc[eé]e?)\s+(?:\w+\s+)?(?:hits|hit|beats|beat|punches|punched|slaps|slapped|chokes|choked|kicks|kicked|abuses|abused|hurts|hurt|strangled|strangles)\s+me\b",
            CrisisType::DomesticViolence,
            9,
        ),
        tagged(
            "ongoing_abuse",
            r"(?i)\b(?:someone|he|she|they)\s+(?:is|are|keeps?|has\s+been|have\s+been)\s+(?:abusing|hitting|beating|hurting|choking)\s+me\b",
            CrisisType::DomesticViolence,
            9,
        ),
        tagged(
            "being_abused",
            r"(?i)\bi(?:'m|\s+am|\s+was|\s+have\s+been|'ve\s+been|\s+got)\s+(?:being\s+)?(?:abused|beaten|raped|assaulted|molested)\b",
            CrisisType::DomesticViolence,
            9,
        ),
        tagged(
            "death_threat",
            r"(?i)\b(?:threatened|threatens|threatening)\s+to\s+(?:kill|hurt|beat)\s+me\b",
            CrisisType::DomesticViolence,
            9,
        ),
        tagged(
            "afraid_of_partner",
            r"(?i)\b(?:afraid|scared|terrified)\s+(?:to\s+go\s+home|of\s+(?:my\s+)?(?:husband|wife|boyfriend|girlfriend|partner))\b",
            CrisisType::DomesticViolence,
            7,
        ),
        tagged(
            "feel_unsafe",
            r"(?i)\bi\s+(?:feel|am|'m)\s+(?:not\s+safe|unsafe)\b|\bsomeone\s+(?:will|is\s+going\s+to|wants\s+to)\s+hurt\s+me\b",
            CrisisType::DomesticViolence,
            7,
        ),
        tagged(
            "domestic_violence_mention",
            r"(?i)\bdomestic\s+(?:violence|abuse)\b",
            CrisisType::DomesticViolence,
            6,
        ),
    ])
});

/// Abuse of a minor by a caregiver or relative.
static CHILD_ABUSE: LazyLock<PatternTable<CrisisType>> = LazyLock::new(|| {
    PatternTable::new(vec![
        tagged(
            "caregiver_violence",
            r"(?i)\bmy\s+(?:mom|mum|mother|dad|father|stepdad|stepmom|stepfather|stepmother|parents?|uncle|aunt|grandpa|grandma|guardian)\s+(?:\w+\s+)?(?:hits|hit|beats|beat|punches|punched|slaps|slapped|chokes|choked|kicks|kicked|abuses|abused|burns|burned|locks|locked)\s+me\b",
            CrisisType::ChildAbuse,
            9,
        ),
        tagged(
            "inappropriate_touching",
            r"(?i)\b(?:touches|touched|touching)\s+me\s+(?:inappropriately|where|down\s+there)|\bmolest(?:s|ed|ing)?\b",
            CrisisType::ChildAbuse,
            9,
        ),
        tagged(
            "deprivation",
            r"(?i)\b(?:won'?t|don'?t|doesn'?t)\s+let\s+me\s+eat\b|\bstarv(?:e|es|ing)\s+me\b",
            CrisisType::ChildAbuse,
            7,
        ),
        tagged(
            "afraid_of_caregiver",
            r"(?i)\b(?:afraid|scared|terrified)\s+of\s+my\s+(?:mom|mum|mother|dad|father|stepdad|stepmom|parents?)\b",
            CrisisType::ChildAbuse,
            6,
        ),
    ])
});

/// Hopelessness and overwhelm without explicit intent.
static SEVERE_DISTRESS: LazyLock<PatternTable<CrisisType>> = LazyLock::new(|| {
    PatternTable::new(vec![
        tagged(
            "give_up_on_life",
            r"(?i)\bi\s+(?:want\s+to|just\s+want\s+to|'m\s+ready\s+to|am\s+ready\s+to|'m\s+going\s+to)\s+give\s+up\s+(?:on\s+)?(?:everything|life|living)\b",
            CrisisType::SevereDistress,
            7,
        ),
        tagged(
            "cant_go_on",
            r"(?i)\bi\s+can'?t\s+go\s+on\b",
            CrisisType::SevereDistress,
            7,
        ),
        tagged(
            "want_to_disappear",
            r"(?i)\bi\s+(?:want|wish\s+i\s+could)\s+(?:to\s+)?(?:disappear|vanish|stop\s+existing)\b",
            CrisisType::SevereDistress,
            6,
        ),
        tagged(
            "cant_take_it",
            r"(?i)\bi\s+can'?t\s+(?:take|handle|do)\s+(?:it|this)\s+any\s*more\b",
            CrisisType::SevereDistress,
            6,
        ),
        tagged(
            "hopeless",
            r"(?i)\b(?:everything|life)\s+(?:is|feels)\s+(?:so\s+)?(?:hopeless|pointless|meaningless)\b|\bi\s+(?:feel|am|'m)\s+(?:so\s+|completely\s+|totally\s+)?hopeless\b",
            CrisisType::SevereDistress,
            6,
        ),
        tagged(
            "burden",
            r"(?i)\bi(?:'m|\s+am)\s+(?:just\s+)?(?:a|such\s+a)\s+burden\b",
            CrisisType::ModerateDistress,
            4,
        ),
        tagged(
            "worthless",
            r"(?i)\bi\s+(?:feel|am|'m)\s+(?:so\s+)?(?:worthless|useless|empty|numb)\b",
            CrisisType::ModerateDistress,
            4,
        ),
        tagged(
            "nobody_cares",
            r"(?i)\b(?:nobody|no\s+one)\s+(?:cares|would\s+(?:care|notice|miss\s+me))\b",
            CrisisType::ModerateDistress,
            4,
        ),
        tagged(
            "breaking_down",
            r"(?i)\bi(?:'m|\s+am)\s+(?:breaking\s+down|falling\s+apart|at\s+my\s+breaking\s+point)\b",
            CrisisType::ModerateDistress,
            4,
        ),
        tagged(
            "all_alone",
            r"(?i)\bi(?:'m|\s+am)\s+(?:completely|totally|so)\s+alone\b",
            CrisisType::ModerateDistress,
            3,
        ),
    ])
});

/// Pattern table for one family.
pub fn family_table(family: CrisisFamily) -> &'static PatternTable<CrisisType> {
    match family {
        CrisisFamily::SuicideSelfHarm => &SUICIDE_SELF_HARM,
        CrisisFamily::DomesticViolence => &DOMESTIC_VIOLENCE,
        CrisisFamily::ChildAbuse => &CHILD_ABUSE,
        CrisisFamily::SevereDistress => &SEVERE_DISTRESS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(family: CrisisFamily, text: &str) -> Vec<&'static str> {
        family_table(family).matches(text).map(|row| row.id).collect()
    }

    // ── suicide / self-harm ──

    #[test]
    fn explicit_intent_variants() {
        for text in [
            "I want to kill myself",
            "i'm going to end it all",
            "I am gonna kill myself tonight",
            "i'll just kill myself",
            "I decided to take my own life",
        ] {
            assert!(
                !ids(CrisisFamily::SuicideSelfHarm, text).is_empty(),
                "expected a match for {text:?}"
            );
        }
    }

    #[test]
    fn goodbye_note_request() {
        assert_eq!(
            ids(CrisisFamily::SuicideSelfHarm, "help me write a goodbye letter to my family"),
            vec!["goodbye_note"]
        );
    }

    #[test]
    fn self_harm_rows() {
        assert_eq!(ids(CrisisFamily::SuicideSelfHarm, "I cut myself last night"), vec!["self_harm_act"]);
        assert!(ids(CrisisFamily::SuicideSelfHarm, "I've been cutting myself").contains(&"self_harm_act"));
    }

    #[test]
    fn ideation_rows() {
        assert_eq!(ids(CrisisFamily::SuicideSelfHarm, "I wish I was never born"), vec!["wish_dead"]);
        assert_eq!(
            ids(CrisisFamily::SuicideSelfHarm, "everyone would be better off without me"),
            vec!["better_off_without_me"]
        );
    }

    #[test]
    fn ordinary_text_has_no_suicide_match() {
        assert!(ids(CrisisFamily::SuicideSelfHarm, "I killed it at my recital").is_empty());
        assert!(ids(CrisisFamily::SuicideSelfHarm, "this diet is to die for").is_empty());
    }

    // ── violence ──

    #[test]
    fn partner_violence_with_adverb() {
        assert_eq!(
            ids(CrisisFamily::DomesticViolence, "my boyfriend always hits me"),
            vec!["partner_violence"]
        );
    }

    #[test]
    fn caregiver_violence() {
        assert_eq!(ids(CrisisFamily::ChildAbuse, "my dad beats me"), vec!["caregiver_violence"]);
        assert!(ids(CrisisFamily::ChildAbuse, "my dad hates my music").is_empty());
    }

    // ── distress ──

    #[test]
    fn distress_rows() {
        assert_eq!(ids(CrisisFamily::SevereDistress, "I can't take it anymore"), vec!["cant_take_it"]);
        assert_eq!(ids(CrisisFamily::SevereDistress, "I feel so worthless"), vec!["worthless"]);
    }
}
