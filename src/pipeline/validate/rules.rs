//! Ordered reply rules.
//!
//! Each rule returns `Some(reason)` on failure. The validator runs them in
//! table order and stops at the first failure.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Regex, RegexSet};

use crate::models::conversation::word_count;
use crate::models::{MessageElement, TemporalScope, UrgencyLevel};
use crate::pipeline::context::requests::{is_correction, needs_clarifying_question};
use crate::pipeline::context::ConversationContext;
use crate::pipeline::patterns::{compile, phrase_set};
use crate::pipeline::safety::output_sanitize::EMOJI_RE;

/// Absolute ceiling outside task mode.
pub const MAX_WORDS: usize = 120;
pub const GOODBYE_MAX_WORDS: usize = 25;
pub const PLAYFUL_MAX_WORDS: usize = 45;
pub const MIN_WORDS: usize = 3;
/// Emotional replies in the first turns.
pub const EARLY_EMOTIONAL_MIN_WORDS: usize = 15;
/// Emotional replies after the first turns.
pub const LATER_EMOTIONAL_MIN_WORDS: usize = 25;
pub const EMOTIONAL_MAX_WORDS: usize = 110;
pub const MAX_SENTENCE_WORDS: usize = 80;
pub const MAX_CONJUNCTIONS: usize = 8;
pub const MAX_QUESTIONS: usize = 2;

/// A candidate reply with the turn it answers.
pub struct Candidate<'a> {
    pub text: &'a str,
    pub lower: String,
    pub words: usize,
    pub context: &'a ConversationContext,
    pub user_text: &'a str,
}

impl<'a> Candidate<'a> {
    pub fn new(text: &'a str, context: &'a ConversationContext, user_text: &'a str) -> Self {
        Self {
            text,
            lower: text.to_lowercase(),
            words: word_count(text),
            context,
            user_text,
        }
    }

    fn sentences(&self) -> Vec<&str> {
        self.text
            .split(['.', '!', '?'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

pub struct Rule {
    pub name: &'static str,
    pub check: fn(&Candidate<'_>) -> Option<String>,
}

// ═══════════════════════════════════════════════════════════
// Phrase tables
// ═══════════════════════════════════════════════════════════

static GENDERED: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\b(man|bro|dude|girl|sis|guys)\b"));

static PROFANITY: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)\b(crap|damn|hell|ass)\b"));

static POETIC: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"(?i)dragging through.*(mud|thick)",
        r"(?i)drains? the colou?r",
        r"(?i)shouting into.*(empty|void)",
        r"(?i)stuck inside your.*head",
        r"(?i)acid in.*veins",
        r"(?i)heavy.*weight",
        r"(?i)thick.*fog",
        r"(?i)drowning in",
        r"(?i)cuts? deep",
        r"(?i)invisible.*everyone else",
    ])
});

static BANNED_INTERROGATIVES: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"(?i)\bwant to share more about what happens\?",
        r"(?i)\bdo you want to talk about it\?",
        r"(?i)\bwould you like to share more\?",
        r"(?i)\bwant to tell me more\?",
        r"(?i)\bcare to elaborate\?",
        r"(?i)\bwould you like to elaborate\?",
        r"(?i)\bwhat'?s coming up for you\?",
    ])
});

static THERAPIST: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"(?i)\bhow are you (doing|feeling|today)\b",
        r"(?i)\bhow (does|did) that make you feel\b",
        r"(?i)\bi hear what you\b",
        r"(?i)\bhold space\b",
    ])
});

static FILLER: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"(?i)\bthough honestly\b",
        r"(?i)\bhonestly though\b",
        r"(?i)\b(honestly|though|anyway)\.\.\.",
    ])
});

static STATEMENT_QUESTION: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"(?i)\bi'?ll be (here|right here|around)[^.!?]*\?",
        r"(?i)\bi'?m here (for you|anytime|whenever)[^.!?]*\?",
        r"(?i)\b(take care|sleep well|good night)[^.!?]*\?",
        r"(?i)\blike (things|are|is|seem|feel)[^.!?]{1,40}\?",
        r"(?i)\bsounds? like[^.!?]{1,40}\?",
        r"(?i)\bseems? like[^.!?]{1,40}\?",
        r"(?i)\b(call them|come back anytime|be safe|you can do this|that takes \w+)\?",
    ])
});

static GRATITUDE_ACK: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"(?i)\b(of course|you'?re welcome|welcome|anytime|glad)\b",
        r"(?i)\b(take care|be safe|stay safe|here for|no problem|no worries)\b",
    ])
});

static USER_PROBLEM: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"(?i)\b(problem|issue|trouble|difficult|hard|struggle|can'?t|cannot)\b",
        r"(?i)\b(wrong|bad|awful|terrible|hate|dislike)\b",
        r"(?i)\bnot (good|ok|okay|fine|working)\b",
    ])
});

static SINGLE_EVENT_QUESTIONS: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"(?i)\b(what happened|what did they do) today\b",
        r"(?i)\bthis morning.{0,10}what\b",
        r"(?i)\bjust now.{0,10}what\b",
    ])
});

static PATTERN_QUESTIONS: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\b(always|usually|typically|how long|how often)\b"));

static SINGLE_EVENT_USER: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\b(today|just|this time)\b"));

static ASSUMPTIVE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\bwhat (?:made you|brought) (?:a )?(smile|happy|laugh|feel good|joy|happiness)\b")
});

static BARE_ACK: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)(?:^|[.!?]\s+)(?:got it|gotcha)\s*\."));

static CRISIS_HELP: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\b(help|resources?|hotline|helpline|counsel\w*|professional|988|741741|crisis line)\b")
});

static CORRECTION_ACK: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\b(you'?re right|my bad|sorry|fair|my mistake|got that wrong)\b")
});

// ═══════════════════════════════════════════════════════════
// Length
// ═══════════════════════════════════════════════════════════

fn word_ceiling(c: &Candidate<'_>) -> Option<String> {
    let limit = match c.context.task_mode {
        Some(mode) => mode.word_limit(),
        None if c.context.message_elements.has(MessageElement::Goodbye) => GOODBYE_MAX_WORDS,
        None => MAX_WORDS,
    };
    (c.words > limit).then(|| format!("{} words exceeds the {limit}-word ceiling", c.words))
}

fn too_short(c: &Candidate<'_>) -> Option<String> {
    (c.words < MIN_WORDS).then(|| format!("only {} words", c.words))
}

fn playful_length(c: &Candidate<'_>) -> Option<String> {
    if c.words < MIN_WORDS {
        Some(format!("only {} words", c.words))
    } else if c.words > PLAYFUL_MAX_WORDS {
        Some(format!("{} words is too long for banter", c.words))
    } else {
        None
    }
}

// ═══════════════════════════════════════════════════════════
// Banned content
// ═══════════════════════════════════════════════════════════

fn emoji(c: &Candidate<'_>) -> Option<String> {
    EMOJI_RE.is_match(c.text).then(|| "contains emoji".to_string())
}

fn asterisks(c: &Candidate<'_>) -> Option<String> {
    c.text.contains('*').then(|| "contains asterisks".to_string())
}

fn gendered(c: &Candidate<'_>) -> Option<String> {
    GENDERED
        .find(c.text)
        .map(|m| format!("gendered address '{}'", m.as_str()))
}

fn profanity(c: &Candidate<'_>) -> Option<String> {
    PROFANITY
        .find(c.text)
        .map(|m| format!("mild profanity '{}'", m.as_str()))
}

fn poetic(c: &Candidate<'_>) -> Option<String> {
    POETIC
        .is_match(c.text)
        .then(|| "poetic or dramatic metaphor".to_string())
}

fn banned_interrogative(c: &Candidate<'_>) -> Option<String> {
    BANNED_INTERROGATIVES
        .is_match(c.text)
        .then(|| "therapist-style invitation question".to_string())
}

fn therapist(c: &Candidate<'_>) -> Option<String> {
    THERAPIST
        .is_match(c.text)
        .then(|| "therapist phrasing".to_string())
}

// ═══════════════════════════════════════════════════════════
// Repetition and formatting
// ═══════════════════════════════════════════════════════════

fn repetition(c: &Candidate<'_>) -> Option<String> {
    if c.lower.matches("sucks").count() > 1 {
        return Some("'sucks' used more than once".to_string());
    }
    if c.lower.matches("honestly").count() > 1 {
        return Some("'honestly' used more than once".to_string());
    }
    FILLER.is_match(c.text).then(|| "filler collocation".to_string())
}

fn ellipsis(c: &Candidate<'_>) -> Option<String> {
    let count = c.text.matches("...").count();
    (count > 1).then(|| format!("{count} ellipses"))
}

fn bullets(c: &Candidate<'_>) -> Option<String> {
    c.text
        .lines()
        .any(|line| line.matches('•').count() > 1)
        .then(|| "multiple bullets on one line".to_string())
}

fn statement_question(c: &Candidate<'_>) -> Option<String> {
    STATEMENT_QUESTION
        .is_match(c.text)
        .then(|| "statement ends with '?'".to_string())
}

// ═══════════════════════════════════════════════════════════
// Required content
// ═══════════════════════════════════════════════════════════

fn name_change(c: &Candidate<'_>) -> Option<String> {
    let name = c.context.message_elements.new_name.as_deref()?;
    (!c.lower.contains(&name.to_lowercase())).then(|| format!("new name '{name}' not used"))
}

fn gratitude(c: &Candidate<'_>) -> Option<String> {
    let thanked = c.context.expressing_gratitude
        || c.context.message_elements.has(MessageElement::Gratitude);
    if !thanked {
        return None;
    }
    if USER_PROBLEM.is_match(c.user_text) {
        let first = c.sentences().first().copied().unwrap_or("");
        return (!GRATITUDE_ACK.is_match(first))
            .then(|| "gratitude not acknowledged in the first sentence".to_string());
    }
    (!GRATITUDE_ACK.is_match(c.text)).then(|| "gratitude not acknowledged".to_string())
}

fn emotional_depth(c: &Candidate<'_>) -> Option<String> {
    let ctx = c.context;
    if !ctx.is_emotional()
        || ctx.task_mode.is_some()
        || ctx.message_elements.has(MessageElement::Goodbye)
    {
        return None;
    }

    if ctx.conversation_depth <= 3 {
        if c.words < EARLY_EMOTIONAL_MIN_WORDS {
            return Some(format!("{} words is too brief for early emotional support", c.words));
        }
        if needs_clarifying_question(ctx, c.user_text) && !c.text.contains('?') {
            return Some("bare feeling needs a clarifying question".to_string());
        }
    } else {
        if c.words < LATER_EMOTIONAL_MIN_WORDS {
            return Some(format!("{} words is too brief for emotional support", c.words));
        }
        if c.sentences().len() < 2 {
            return Some("emotional support needs two or more sentences".to_string());
        }
    }

    (c.words > EMOTIONAL_MAX_WORDS)
        .then(|| format!("{} words is too long for emotional support", c.words))
}

fn temporal(c: &Candidate<'_>) -> Option<String> {
    match c.context.temporal_scope {
        TemporalScope::Ongoing if SINGLE_EVENT_QUESTIONS.is_match(c.text) => {
            Some("single-event question about an ongoing pattern".to_string())
        }
        TemporalScope::SingleEvent
            if SINGLE_EVENT_USER.is_match(c.user_text) && PATTERN_QUESTIONS.is_match(c.text) =>
        {
            Some("pattern question about a single event".to_string())
        }
        _ => None,
    }
}

fn assumptive(c: &Candidate<'_>) -> Option<String> {
    let caps = ASSUMPTIVE.captures(c.text)?;
    let assumed = caps.get(1)?.as_str().to_lowercase();
    (!c.user_text.to_lowercase().contains(&assumed))
        .then(|| format!("assumed '{assumed}'"))
}

fn awkward(c: &Candidate<'_>) -> Option<String> {
    BARE_ACK
        .is_match(c.text)
        .then(|| "bare 'got it' acknowledgment".to_string())
}

// ═══════════════════════════════════════════════════════════
// Degeneration
// ═══════════════════════════════════════════════════════════

fn run_on(c: &Candidate<'_>) -> Option<String> {
    c.sentences()
        .iter()
        .map(|s| word_count(s))
        .find(|n| *n > MAX_SENTENCE_WORDS)
        .map(|n| format!("run-on sentence of {n} words"))
}

fn conjunctions(c: &Candidate<'_>) -> Option<String> {
    let count = [" and ", " but ", " or "]
        .iter()
        .map(|conj| c.lower.matches(conj).count())
        .sum::<usize>();
    (count > MAX_CONJUNCTIONS).then(|| format!("{count} conjunctions"))
}

fn tail_repetition(c: &Candidate<'_>) -> Option<String> {
    let words: Vec<&str> = c.lower.split_whitespace().collect();
    if words.len() <= 30 {
        return None;
    }
    let tail = &words[words.len() * 7 / 10..];
    let mut freq: HashMap<&str, usize> = HashMap::new();
    for word in tail.iter().copied().filter(|w| w.len() > 4) {
        *freq.entry(word).or_default() += 1;
    }
    freq.values()
        .any(|n| *n >= 4)
        .then(|| "repeated words at the end".to_string())
}

fn question_count(c: &Candidate<'_>) -> Option<String> {
    let count = c.text.matches('?').count();
    let limit = if c.context.disclosure_depth >= 4 && c.context.is_emotional() {
        1
    } else {
        MAX_QUESTIONS
    };
    (count > limit).then(|| format!("{count} questions, at most {limit}"))
}

// ═══════════════════════════════════════════════════════════
// Safety and corrections
// ═══════════════════════════════════════════════════════════

fn crisis_content(c: &Candidate<'_>) -> Option<String> {
    (c.context.urgency_level == UrgencyLevel::Crisis && !CRISIS_HELP.is_match(c.text))
        .then(|| "crisis reply without resources".to_string())
}

fn correction_ack(c: &Candidate<'_>) -> Option<String> {
    (c.context.user_corrections > 0
        && is_correction(c.user_text)
        && !CORRECTION_ACK.is_match(c.text))
    .then(|| "correction not acknowledged".to_string())
}

// ═══════════════════════════════════════════════════════════
// Tables
// ═══════════════════════════════════════════════════════════

/// Full rule list, first failure wins.
pub const RULES: &[Rule] = &[
    Rule { name: "word_ceiling", check: word_ceiling },
    Rule { name: "too_short", check: too_short },
    Rule { name: "emoji", check: emoji },
    Rule { name: "asterisks", check: asterisks },
    Rule { name: "gendered", check: gendered },
    Rule { name: "profanity", check: profanity },
    Rule { name: "poetic", check: poetic },
    Rule { name: "banned_interrogative", check: banned_interrogative },
    Rule { name: "therapist", check: therapist },
    Rule { name: "repetition", check: repetition },
    Rule { name: "ellipsis", check: ellipsis },
    Rule { name: "bullets", check: bullets },
    Rule { name: "statement_question", check: statement_question },
    Rule { name: "name_change", check: name_change },
    Rule { name: "gratitude", check: gratitude },
    Rule { name: "emotional_depth", check: emotional_depth },
    Rule { name: "temporal", check: temporal },
    Rule { name: "assumptive", check: assumptive },
    Rule { name: "awkward", check: awkward },
    Rule { name: "run_on", check: run_on },
    Rule { name: "conjunctions", check: conjunctions },
    Rule { name: "tail_repetition", check: tail_repetition },
    Rule { name: "question_count", check: question_count },
    Rule { name: "crisis_content", check: crisis_content },
    Rule { name: "correction_ack", check: correction_ack },
];

/// Playful banter is only held to length.
pub const PLAYFUL_RULES: &[Rule] = &[Rule { name: "playful_length", check: playful_length }];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EmotionalTone;
    use crate::pipeline::context::TaskMode;

    const USER_SHARE: &str = "nobody at school talks to me anymore and I feel so alone";

    fn failing(name: &str, text: &str, context: &ConversationContext, user: &str) -> bool {
        let rule = RULES
            .iter()
            .chain(PLAYFUL_RULES)
            .find(|r| r.name == name)
            .unwrap_or_else(|| panic!("no rule named {name}"));
        (rule.check)(&Candidate::new(text, context, user)).is_some()
    }

    fn first_failure(text: &str, context: &ConversationContext, user: &str) -> Option<&'static str> {
        let candidate = Candidate::new(text, context, user);
        RULES
            .iter()
            .find(|r| (r.check)(&candidate).is_some())
            .map(|r| r.name)
    }

    fn negative_at(depth: usize) -> ConversationContext {
        ConversationContext {
            emotional_tone: EmotionalTone::Negative,
            disclosure_depth: 4,
            conversation_depth: depth,
            ..ConversationContext::default()
        }
    }

    // ── emotional depth ──

    #[test]
    fn later_turns_accept_two_clean_sentences_without_question() {
        let reply = "That kind of loneliness at school wears anyone down, and it makes sense that you feel drained by it. \
                     Finding even one person to sit with at lunch could make the days feel lighter.";
        for depth in [4, 7] {
            assert_eq!(first_failure(reply, &negative_at(depth), USER_SHARE), None, "depth {depth}");
        }
    }

    #[test]
    fn later_turns_word_floor_is_25() {
        let ctx = negative_at(4);
        let at_floor = "That kind of loneliness at school wears anyone down, and it makes sense that you feel drained. \
                        Finding one person to sit with could help.";
        let below = "That kind of loneliness at school wears anyone down, and it makes sense that you feel drained. \
                     Finding someone to sit with could help.";
        assert_eq!(word_count(at_floor), 25);
        assert_eq!(word_count(below), 24);
        assert!(!failing("emotional_depth", at_floor, &ctx, USER_SHARE));
        assert!(failing("emotional_depth", below, &ctx, USER_SHARE));
    }

    #[test]
    fn depth_boundary_between_three_and_four() {
        let one_sentence = "That kind of loneliness at school wears anyone down, and it makes sense that you feel \
                            drained by it when nobody seems to notice how hard you are trying";
        assert!(!failing("emotional_depth", one_sentence, &negative_at(3), USER_SHARE));
        assert!(failing("emotional_depth", one_sentence, &negative_at(4), USER_SHARE));

        let short = "Feeling shut out at school is rough. What happened with your friends this week?";
        let longer = "Feeling shut out at school is really rough. What happened with your friends this week?";
        assert_eq!(word_count(short), 14);
        assert!(failing("emotional_depth", short, &negative_at(3), USER_SHARE));
        assert!(!failing("emotional_depth", longer, &negative_at(3), USER_SHARE));
        assert!(failing("emotional_depth", longer, &negative_at(4), USER_SHARE));
    }

    #[test]
    fn early_bare_feeling_needs_question() {
        let ctx = ConversationContext {
            emotional_tone: EmotionalTone::Negative,
            ..ConversationContext::default()
        };
        let statement = "Feeling that angry can take over the whole day, and it is okay to let it out here.";
        let question = "Feeling that angry can take over the whole day. What set it off this time?";
        assert!(failing("emotional_depth", statement, &ctx, "I feel furious"));
        assert!(!failing("emotional_depth", question, &ctx, "I feel furious"));
        assert!(!failing("emotional_depth", statement, &ctx, USER_SHARE));
    }

    #[test]
    fn emotional_depth_skips_neutral_goodbye_and_tasks() {
        let brief = "Okay, got that.";
        assert!(!failing("emotional_depth", brief, &ConversationContext::default(), "x"));

        let mut goodbye = negative_at(5);
        goodbye.message_elements.insert(MessageElement::Goodbye);
        assert!(!failing("emotional_depth", brief, &goodbye, "x"));

        let task = ConversationContext {
            task_mode: Some(TaskMode::Letter),
            ..negative_at(5)
        };
        assert!(!failing("emotional_depth", brief, &task, "x"));
    }

    // ── length caps ──

    #[test]
    fn word_caps() {
        let default = ConversationContext::default();
        assert!(!failing("word_ceiling", &"word ".repeat(MAX_WORDS), &default, "x"));
        assert!(failing("word_ceiling", &"word ".repeat(MAX_WORDS + 1), &default, "x"));

        let mut goodbye = ConversationContext::default();
        goodbye.message_elements.insert(MessageElement::Goodbye);
        assert!(!failing("word_ceiling", &"bye ".repeat(GOODBYE_MAX_WORDS), &goodbye, "x"));
        assert!(failing("word_ceiling", &"bye ".repeat(GOODBYE_MAX_WORDS + 1), &goodbye, "x"));

        assert!(!failing("playful_length", &"ha ".repeat(PLAYFUL_MAX_WORDS), &default, "x"));
        assert!(failing("playful_length", &"ha ".repeat(PLAYFUL_MAX_WORDS + 1), &default, "x"));
        assert!(failing("playful_length", "ha ha", &default, "x"));

        let letter = ConversationContext {
            task_mode: Some(TaskMode::Letter),
            ..ConversationContext::default()
        };
        assert!(!failing("word_ceiling", &"word ".repeat(200), &letter, "x"));
        assert!(failing("word_ceiling", &"word ".repeat(201), &letter, "x"));
    }

    // ── one row per rule ──

    #[test]
    fn rule_table() {
        let ctx = ConversationContext::default();
        let run_on = "word ".repeat(MAX_SENTENCE_WORDS + 1);
        let conjunctions = "tea and cake ".repeat(MAX_CONJUNCTIONS + 1);
        let degenerate = format!("{}really really really really", "ok ".repeat(30));
        let cases: &[(&str, &str, &str)] = &[
            // (rule, failing text, passing text)
            ("too_short", "Okay sure.", "Okay, sounds good."),
            ("emoji", "Nice one \u{1F600}", "Nice one."),
            ("asterisks", "That is *so* good.", "That is so good."),
            ("gendered", "Good call, bro.", "You can manage this."),
            ("profanity", "What the hell happened there.", "Hello there, good to see you."),
            ("poetic", "Losing that cuts deep.", "Losing that really hurts."),
            ("banned_interrogative", "That is a lot. Care to elaborate?", "That is a lot. What happened next?"),
            ("therapist", "How does that make you feel about it", "That would bug me too."),
            ("repetition", "Honestly, it is fine, honestly.", "Honestly, it is fine."),
            ("ellipsis", "Well... okay... sure.", "Well... okay then."),
            ("bullets", "• Walk • Sleep", "• Walk\n• Sleep"),
            ("statement_question", "Sounds like a long day?", "Sounds like a long day."),
            ("awkward", "Got it. Rest up tonight.", "Makes sense. Rest up tonight."),
            ("run_on", run_on.as_str(), "Short and sweet. Another one."),
            ("conjunctions", conjunctions.as_str(), "Tea and cake sounds lovely."),
            ("tail_repetition", degenerate.as_str(), "That went well."),
            ("question_count", "Why? How? When?", "Why? And how?"),
        ];
        for (rule, bad, good) in cases {
            assert!(failing(rule, bad, &ctx, "x"), "{rule} should reject {bad:?}");
            assert!(!failing(rule, good, &ctx, "x"), "{rule} should accept {good:?}");
        }
    }

    #[test]
    fn assumptive_needs_user_mention() {
        let ctx = ConversationContext::default();
        let reply = "Nice. What made you smile today?";
        assert!(failing("assumptive", reply, &ctx, "had a long day"));
        assert!(!failing("assumptive", reply, &ctx, "that show made me smile"));
    }

    #[test]
    fn single_event_forbids_pattern_questions() {
        let ctx = ConversationContext::default();
        assert!(failing("temporal", "That's rough. Does this always happen?", &ctx, "my boss yelled today"));
        assert!(!failing("temporal", "That's rough. What did he say?", &ctx, "my boss yelled today"));
    }

    #[test]
    fn deep_emotional_turns_allow_one_question() {
        let ctx = negative_at(5);
        assert!(failing("question_count", "Why? And how?", &ctx, USER_SHARE));
        assert!(!failing("question_count", "I hear you. What happened?", &ctx, USER_SHARE));
    }

    #[test]
    fn crisis_and_corrections() {
        let crisis = ConversationContext {
            urgency_level: UrgencyLevel::Crisis,
            ..ConversationContext::default()
        };
        assert!(failing("crisis_content", "That sounds so painful.", &crisis, "x"));
        assert!(!failing("crisis_content", "Please call a hotline now.", &crisis, "x"));

        let corrected = ConversationContext {
            user_corrections: 1,
            ..ConversationContext::default()
        };
        let user = "I just said I don't drink coffee";
        assert!(failing("correction_ack", "Tea is nice too.", &corrected, user));
        assert!(!failing("correction_ack", "You're right, sorry about that.", &corrected, user));
    }
}
