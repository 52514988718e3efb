//! Punctuation and spacing cleanup for accepted completions.
//!
//! Runs before validation. Normalizing twice gives the same text as
//! normalizing once.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::models::{EmotionalTone, UrgencyLevel};
use crate::pipeline::context::ConversationContext;
use crate::pipeline::patterns::compile;

static INLINE_SPACE: LazyLock<Regex> = LazyLock::new(|| compile(r"[ \t]+"));
static EXTRA_NEWLINES: LazyLock<Regex> = LazyLock::new(|| compile(r"\n{3,}"));
static SPACE_BEFORE_PUNCT: LazyLock<Regex> = LazyLock::new(|| compile(r"[ \t]+([.?!,])"));
static REPEATED_QUESTION: LazyLock<Regex> = LazyLock::new(|| compile(r"\?{2,}"));
static REPEATED_BANG: LazyLock<Regex> = LazyLock::new(|| compile(r"!{2,}"));
static REPEATED_COMMA: LazyLock<Regex> = LazyLock::new(|| compile(r",{2,}"));
static DOT_RUN: LazyLock<Regex> = LazyLock::new(|| compile(r"\.{2,}"));
static QUESTION_SENTENCE: LazyLock<Regex> = LazyLock::new(|| compile(r"[^.!?\n]*\?"));
static TRAILING_QUESTION: LazyLock<Regex> = LazyLock::new(|| compile(r"([^.!?\s])\?\s*$"));
static MISSING_SPACE: LazyLock<Regex> = LazyLock::new(|| compile(r"([.?!])([A-Z])"));

static WH_WORD: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\b(what|who|when|where|why|how)\b"));

static INTERROGATIVE_OPENER: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?i)^\s*(what|who|when|where|why|how|do|does|did|is|are|was|were|can|could|would|will|should|have|has|any|want|wanna)\b",
    )
});

static POST_CRISIS_CLOSER: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\b(here for you|anytime|take care|be safe)\b")
});

/// Statements the model likes to end with "?".
static STATEMENT_BODIES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(call|reach out to|contact) (them|someone|help)\b",
        r"(?i)\bcome back anytime\b",
        r"(?i)\b(take care|be safe|stay safe)\b",
        r"(?i)\byou(ve| have|'ve) got this\b|\byou can do this\b",
        r"(?i)\bthat takes \w+",
        r"(?i)\b(please|promise)\b.+",
        r"(?i)\bi'?m here (anytime|whenever)\b",
        r"(?i)\b(sounds|seems|like)\b.+",
        r"(?i)\byou could( try| talk| speak)?\b",
        r"(?i)\b(try|consider) (talking|reaching|calling|writing)\b",
        r"(?i)\b(would|might|could|may) help\b",
        r"(?i)\bhelp (you|them)\b",
        r"(?i)\b(keeping|maintaining|having|getting) \w+",
        r"(?i)\b(maybe|perhaps|possibly) \w+",
    ]
    .into_iter()
    .map(compile)
    .collect()
});

fn is_statement(body: &str) -> bool {
    !body.trim().is_empty()
        && !INTERROGATIVE_OPENER.is_match(body)
        && STATEMENT_BODIES.iter().any(|re| re.is_match(body))
}

fn collapse_spacing(text: &str) -> String {
    let lines: Vec<String> = text
        .lines()
        .map(|line| INLINE_SPACE.replace_all(line, " ").trim().to_string())
        .collect();
    let joined = lines.join("\n");
    EXTRA_NEWLINES
        .replace_all(&joined, "\n\n")
        .trim()
        .to_string()
}

fn collapse_punctuation(text: &str) -> String {
    let text = SPACE_BEFORE_PUNCT.replace_all(text, "$1");
    let text = REPEATED_QUESTION.replace_all(&text, "?");
    let text = REPEATED_BANG.replace_all(&text, "!");
    let text = REPEATED_COMMA.replace_all(&text, ",");
    DOT_RUN
        .replace_all(&text, |caps: &Captures<'_>| {
            if caps[0].len() == 2 { "." } else { "..." }
        })
        .into_owned()
}

/// "I'm here anytime?" becomes "I'm here anytime."
fn rewrite_statement_questions(text: &str) -> String {
    QUESTION_SENTENCE
        .replace_all(text, |caps: &Captures<'_>| {
            let sentence = &caps[0];
            let body = &sentence[..sentence.len() - 1];
            if is_statement(body) {
                format!("{body}.")
            } else {
                sentence.to_string()
            }
        })
        .into_owned()
}

fn drop_trailing_question(text: &str) -> String {
    TRAILING_QUESTION.replace(text, "$1.").into_owned()
}

/// Clean up a completion for display.
pub fn normalize(text: &str, context: &ConversationContext) -> String {
    let text = text.replace('*', "'");
    let text = collapse_spacing(&text);
    let text = collapse_punctuation(&text);
    let mut text = rewrite_statement_questions(&text);

    let crisis_register = matches!(context.urgency_level, UrgencyLevel::Crisis | UrgencyLevel::High)
        || context.emotional_tone == EmotionalTone::Crisis;
    if crisis_register && !WH_WORD.is_match(&text) {
        text = drop_trailing_question(&text);
    }
    if context.is_post_crisis && POST_CRISIS_CLOSER.is_match(&text) {
        text = drop_trailing_question(&text);
    }

    MISSING_SPACE
        .replace_all(&text, "$1 $2")
        .trim()
        .to_string()
}
