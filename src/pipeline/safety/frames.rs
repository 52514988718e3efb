//! False-positive framing filters.
//!
//! Literal crisis keywords inside hypothetical, past-tense, third-party,
//! figurative or family-drama framings are not a crisis. Neither is a user
//! questioning the previous crisis reply.
//!
//! Frames are scoped to the text around a hit: hypotheticals to the
//! sentence, everything else to the clause. "I used to love life but now I
//! want to die" keeps its second clause.

use std::sync::LazyLock;

use regex::{Regex, RegexSet};

use crate::pipeline::patterns::{compile, phrase_set};

use super::types::Suppression;

static HYPOTHETICAL: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"(?i)\bwhat\s+if\b",
        r"(?i)\bhypothetical(?:ly)?\b",
        r"(?i)\bimagine\s+(?:if|that|someone|a\s+(?:person|character))\b",
        r"(?i)\b(?:suppose|supposing|let'?s\s+say)\b",
        r"(?i)\bin\s+theory\b",
        r"(?i)\bif\s+(?:i\s+were\s+to|someone|a\s+person)\b",
    ])
});

static PAST_TENSE: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"(?i)\bused\s+to\b",
        r"(?i)\b(?:years|months|a\s+long\s+time)\s+ago\b",
        r"(?i)\bback\s+(?:then|in\s+(?:high\s+school|college|middle\s+school|\d{4}))\b",
        r"(?i)\bwhen\s+i\s+was\s+(?:younger|little|a\s+(?:kid|child|teen(?:ager)?)|in\s+(?:high|middle)\s+school)\b",
        r"(?i)\bin\s+the\s+past\b",
        r"(?i)\bnot\s+anymore\b",
    ])
});

/// Present-tense markers that cancel a past-tense framing.
static PRESENT_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\b(?:right\s+now|but\s+now|now|tonight|again|still|these\s+days|lately|today)\b")
});

static THIRD_PARTY: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"(?i)\b(?:my|a)\s+(?:friend|brother|sister|cousin|classmate|roommate|coworker)\s+(?:said|says|told\s+me|wants?|tried|is\s+(?:thinking|talking))\b.{0,60}\b(?:kill\s+(?:himself|herself|themselves)|suicid\w*|end\s+(?:his|her|their)\s+life|(?:hurt|cut)(?:s|ting|ing)?\s+(?:himself|herself|themselves))",
        r"(?i)\bin\s+(?:the|a|this|that)\s+(?:movie|film|show|series|book|novel|story|game|song|anime|episode|play)\b",
        r"(?i)\bthe\s+(?:character|protagonist|villain|narrator|main\s+character)\b",
        r"(?i)\b(?:movie|film|show|book|novel|song|anime)\s+(?:about|where)\b",
        r"(?i)\b(?:lyrics?|quote)\b",
        r"(?i)\basking\s+for\s+a\s+friend\b",
        r"(?i)\bfor\s+(?:a|my)\s+(?:school\s+)?(?:project|essay|report|paper|assignment|class|research)\b",
        r"(?i)\bwriting\s+(?:a|my)\s+(?:story|novel|essay|poem|script)\b",
    ])
});

static FAMILY_MEMBER: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\b(?:mom|mum|mother|dad|father|parents?|brother|sister|grandma|grandpa|aunt|uncle|family)\b")
});

static CHORES_OR_GROUNDING: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\b(?:clean(?:ing)?|tidy|my\s+room|chores?|dishes|laundry|homework|grounded|grounding|punished|curfew|took\s+my\s+phone|phone\s+(?:taken|away)|report\s+card|grades?|late\s+home)\b")
});

static PHYSICAL_HARM: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\b(?:hit|hits|hitting|beat|beats|beating|punch\w*|slap\w*|kick\w*|chok\w*|bruis\w*|bleed\w*|abus\w*|touch\w*|molest\w*)\b")
});

static FIGURATIVE: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"(?i)\b(?:this|that|it|homework|work|school|class|exam|traffic)\s+is\s+(?:literally\s+)?killing\s+me\b",
        r"(?i)\bi\s+could\s+(?:just\s+)?die\s+of\s+(?:embarrassment|laughter|shame|boredom)\b",
        r"(?i)\bdying\s+(?:of|from|with)\s+laughter\b",
        r"(?i)\b(?:kms|kill\s+me|i\s+want\s+to\s+die)\s+(?:lol|lmao|haha|xd)\b",
        r"(?i)\bkill(?:ed|ing)?\s+(?:the\s+)?(?:boss|zombies?|enemies|monsters?|dragon|players?|creepers?)\b",
        r"(?i)\bin\s+(?:minecraft|fortnite|roblox|valorant|league|the\s+game)\b",
    ])
});

static CRISIS_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)(?:crisis\s+hotline|hotline|\b988\b|741741|extremely\s+concerned|really\s+concerned|crisis\s+text\s+line|emergency:\s*911|samaritans)")
});

static CLARIFICATION: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"(?i)\bwhy\s+(?:are\s+you|did\s+you|would\s+you|the|so)\b",
        r"(?i)\bwhat\s+do\s+you\s+mean\b",
        r"(?i)\bi\s+(?:was|am|'m)\s+(?:just\s+)?(?:joking|kidding|venting|exaggerating)\b",
        r"(?i)\bi\s+didn'?t\s+mean\b",
        r"(?i)\bthat'?s\s+not\s+what\s+i\s+meant\b",
        r"(?i)\bi'?m\s+not\s+suicidal\b",
        r"(?i)\boverreact\w*\b",
    ])
});

static SENTENCE_BREAK: LazyLock<Regex> = LazyLock::new(|| compile(r"[.!?;\n]+"));

static CLAUSE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)[.!?;,\n]+|\s+(?:but|and|so)\s+"));

/// The trimmed piece of `text` between two `breaks` that contains byte offset `at`.
fn span_around<'a>(text: &'a str, at: usize, breaks: &Regex) -> &'a str {
    let mut start = 0;
    for m in breaks.find_iter(text) {
        if m.start() > at {
            return text[start..m.start()].trim();
        }
        start = m.end();
    }
    text[start.min(text.len())..].trim()
}

/// Sentence containing byte offset `at`.
pub fn sentence_at(text: &str, at: usize) -> &str {
    span_around(text, at, &SENTENCE_BREAK)
}

/// Clause containing byte offset `at`.
pub fn clause_at(text: &str, at: usize) -> &str {
    span_around(text, at, &CLAUSE_BREAK)
}

/// Framing around a crisis hit starting at byte offset `at`, if any.
///
/// First-person intent (`intent`) next to a present-time marker is only
/// neutralised by a hypothetical or figurative frame.
pub fn frame_for_hit(text: &str, at: usize, intent: bool) -> Option<Suppression> {
    if HYPOTHETICAL.is_match(sentence_at(text, at)) {
        return Some(Suppression::Hypothetical);
    }
    let clause = clause_at(text, at);
    if FIGURATIVE.is_match(clause) {
        return Some(Suppression::Figurative);
    }
    let present = PRESENT_MARKERS.is_match(clause);
    if intent && present {
        return None;
    }
    if is_family_drama(clause) {
        return Some(Suppression::FamilyDrama);
    }
    if THIRD_PARTY.is_match(clause) {
        return Some(Suppression::ThirdParty);
    }
    if PAST_TENSE.is_match(clause) && !present {
        return Some(Suppression::PastTense);
    }
    None
}

/// Family member plus chores/grounding vocabulary, with no physical harm.
pub fn is_family_drama(text: &str) -> bool {
    FAMILY_MEMBER.is_match(text)
        && CHORES_OR_GROUNDING.is_match(text)
        && !PHYSICAL_HARM.is_match(text)
}

/// The last reply was a crisis reply and the user is asking about it.
pub fn is_crisis_clarification(text: &str, last_assistant: Option<&str>) -> bool {
    let Some(previous) = last_assistant else {
        return false;
    };
    CRISIS_MARKERS.is_match(previous) && CLARIFICATION.is_match(text)
}

/// Whether a reply carries crisis-reply markers (hotlines, strong concern).
pub fn has_crisis_markers(text: &str) -> bool {
    CRISIS_MARKERS.is_match(text)
}
