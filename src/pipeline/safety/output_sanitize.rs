//! Post-completion output sanitization.
//!
//! Strips chat-template artifacts and leaked prompt instructions from raw
//! completion text, removes emoji, turns emphasis asterisks into quotes and
//! detects gibberish. Runs BEFORE normalization and validation.

use std::sync::LazyLock;

use regex::{Regex, RegexSet};

use crate::pipeline::patterns::{compile, phrase_set};

/// Emoji and pictograph ranges. Shared with the validator.
pub static EMOJI_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"[\x{1F600}-\x{1F64F}\x{1F300}-\x{1F5FF}\x{1F680}-\x{1F6FF}\x{1F1E0}-\x{1F1FF}\x{1F900}-\x{1F9FF}\x{1FA00}-\x{1FAFF}\x{2600}-\x{26FF}\x{2700}-\x{27BF}\x{FE0F}]",
    )
});

static ARTIFACTS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        compile(r"<\|[^|>]*\|>"),
        compile(r"(?i)</?s>"),
        compile(r"(?i)\[/?(?:INST|B_INST|SYS)\]"),
        compile(r"(?i)<</?SYS>>"),
        compile(r"(?i)\[\s*assistant\s*\]"),
        compile(r"(?im)^\s*(?:assistant|snowfriend)\s*:\s*"),
        compile(r"(?i)session\s+(?:end|begin)\."),
        compile(r"(?i)\[(?:you\s+should'?ve\s+said|a\s+better\s+response\s+would\s+be|correct\s+response|note|important|instead|fix):[^\]]*\]"),
        compile(r"(?i)\((?:can't\s+recall\s+you\s+mentioning\s+it\s+already[^)]*|if\s+the\s+fact\s+is\s+better\s+known|not\s+sure\s+if[^)]*)\)"),
    ]
});

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)^\s*```\w*\s*$"));

static INSTRUCTION_KEYWORDS: &[&str] = &[
    "CRITICAL", "MUST", "NEVER", "ALWAYS", "REQUIRED", "FORBIDDEN", "IMPORTANT", "MANDATORY",
    "STRICTLY", "ABSOLUTELY", "DO NOT", "YOU SHOULD", "YOU MUST", "ENSURE", "MAKE SURE",
    "REMEMBER TO",
];

static RULE_HEADINGS: &[&str] = &[
    "RULES:", "GUIDELINES:", "INSTRUCTIONS:", "REQUIREMENTS:", "CONSTRAINTS:", "PRINCIPLES:",
    "WHAT TO DO NEXT:",
];

static CONVERSATIONAL_MARKERS: &[&str] = &[
    "i understand", "i hear", "i'm here", "you", "sounds like", "seems like", "that's", "i think",
];

static NUMBERED_RULE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)^\s*\d+[.)]\s+"));
static META_BRACKET: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\[(?:correct|wrong|note|important|fix|instead)\]"));
static DIRECTIVE_LINE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)^[A-Z][a-z\s]+:\s*$"));

/// Paragraph score at which the reply is cut.
const LEAK_THRESHOLD: u32 = 8;
/// Borderline score: cut unless the paragraph reads conversational.
const LEAK_BORDERLINE: u32 = 5;

static EMPHASIS: LazyLock<Regex> = LazyLock::new(|| compile(r"\*([^*\n]+)\*"));

static GIBBERISH: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"puts\w+\(",
        r"console\.",
        r"function\s*\(",
        r"=>\s*\{",
        r"(?i)\bundefined\b.*\bnull\b",
    ])
});

static RANDOM_CAPS: LazyLock<Regex> = LazyLock::new(|| compile(r"\b[a-z]+[A-Z][a-z]+\b"));

/// Clean raw completion text. Returns "" when nothing usable remains.
pub fn sanitize_completion(raw: &str) -> String {
    let mut text = raw.to_string();

    // 1. Chat-template and meta artifacts
    for re in ARTIFACTS.iter() {
        text = re.replace_all(&text, "").into_owned();
    }
    text = CODE_FENCE.replace_all(&text, "").into_owned();

    // 2. Leaked prompt instructions
    text = remove_leaked_instructions(&text);

    // 3. Wrapping quotes
    text = strip_wrapping_quotes(&text);

    // 4. Emoji and emphasis
    text = EMOJI_RE.replace_all(&text, "").into_owned();
    text = replace_emphasis_asterisks(&text);

    // 5. Line cleanup, one blank line max
    text = collapse_lines(&text);
    text = fix_bullet_list_spacing(&text);

    // 6. Dangling "or?" / "and?" endings
    static DANGLING: LazyLock<Regex> =
        LazyLock::new(|| compile(r"(?i),?\s+(?:or|and|but)\?\s*$"));
    text = DANGLING.replace(&text, ".").into_owned();

    unwrap_parentheses(text.trim())
}

/// Whether raw completion text is unusable noise.
pub fn contains_gibberish(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.chars().count() < 3 {
        return true;
    }
    if GIBBERISH.is_match(trimmed) {
        return true;
    }
    if !trimmed.chars().any(|c| c.is_ascii_alphabetic()) {
        return true;
    }
    let word_chars = trimmed
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>();
    if word_chars.trim().chars().count() < 3 {
        return true;
    }
    RANDOM_CAPS.find_iter(trimmed).count() >= 3
}

/// Cut the reply at the first paragraph that reads like prompt text.
pub fn remove_leaked_instructions(text: &str) -> String {
    if text.chars().count() < 50 {
        return text.to_string();
    }

    let mut kept: Vec<&str> = Vec::new();
    for (i, para) in text.split("\n\n").enumerate() {
        let stripped = para.trim();
        if stripped.is_empty() {
            kept.push("");
            continue;
        }
        let score = instruction_score(stripped, i);
        let leaked = score >= LEAK_THRESHOLD
            || (score >= LEAK_BORDERLINE && !is_conversational(stripped));
        if leaked {
            tracing::warn!(score, paragraph = i, "Instruction leak detected, truncating reply");
            return kept.join("\n\n").trim().to_string();
        }
        kept.push(para);
    }
    text.to_string()
}

fn instruction_score(paragraph: &str, index: usize) -> u32 {
    let upper = paragraph.to_uppercase();
    let mut score = 3 * INSTRUCTION_KEYWORDS.iter().filter(|k| upper.contains(*k)).count() as u32;

    if NUMBERED_RULE.is_match(paragraph) {
        score += 4;
    }
    if RULE_HEADINGS.iter().any(|h| upper.contains(h)) {
        score += 5;
    }
    if META_BRACKET.is_match(paragraph) {
        score += 4;
    }
    let words: Vec<&str> = paragraph.split_whitespace().collect();
    if words.len() > 5 {
        let caps = words
            .iter()
            .filter(|w| w.chars().count() > 2 && w.chars().any(char::is_alphabetic) && **w == w.to_uppercase())
            .count();
        if caps * 10 > words.len() * 3 {
            score += 3;
        }
    }
    if DIRECTIVE_LINE.is_match(paragraph) {
        score += 2;
    }
    if index > 2 {
        score += 1;
    }
    score
}

fn is_conversational(paragraph: &str) -> bool {
    let lower = paragraph.to_lowercase();
    CONVERSATIONAL_MARKERS.iter().any(|m| lower.contains(m))
}

/// `*word*` → 'word', `*longer phrase here*` → "longer phrase here".
pub fn replace_emphasis_asterisks(text: &str) -> String {
    EMPHASIS
        .replace_all(text, |caps: &regex::Captures| {
            let inner = &caps[1];
            if inner.split_whitespace().count() <= 2 {
                format!("'{inner}'")
            } else {
                format!("\"{inner}\"")
            }
        })
        .into_owned()
}

fn strip_wrapping_quotes(text: &str) -> String {
    const QUOTES: &[char] = &['"', '\'', '\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}', '`', '«', '»'];
    text.trim().trim_matches(|c: char| QUOTES.contains(&c)).trim().to_string()
}

fn collapse_lines(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut blank_run = 0;
    for line in text.lines() {
        let cleaned = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if cleaned.is_empty() {
            blank_run += 1;
            if blank_run == 1 {
                lines.push(String::new());
            }
        } else {
            blank_run = 0;
            lines.push(cleaned);
        }
    }
    lines.join("\n")
}

fn is_list_item(line: &str) -> bool {
    let t = line.trim_start();
    t.starts_with("- ") || t.starts_with("• ") || t.starts_with("* ") || {
        let digits: String = t.chars().take_while(char::is_ascii_digit).collect();
        !digits.is_empty() && t[digits.len()..].starts_with(". ")
    }
}

/// Blank line before and after a bullet list.
pub fn fix_bullet_list_spacing(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut in_list = false;
    for line in text.lines() {
        let item = is_list_item(line);
        if item && !in_list {
            if out.last().is_some_and(|l| !l.trim().is_empty()) {
                out.push("");
            }
            in_list = true;
        } else if !item && in_list && !line.trim().is_empty() {
            in_list = false;
            if out.last().is_some_and(|l| !l.trim().is_empty()) {
                out.push("");
            }
        }
        out.push(line);
    }
    out.join("\n")
}

/// Drop parentheses wrapping the whole reply, except the help disclaimer.
pub fn unwrap_parentheses(text: &str) -> String {
    let mut current = text.trim();
    while current.starts_with('(') && current.ends_with(')') && current.len() >= 2 {
        if is_disclaimer(current) {
            break;
        }
        current = current[1..current.len() - 1].trim();
    }
    current.to_string()
}

fn is_disclaimer(text: &str) -> bool {
    text.contains("I'm here to listen") && text.contains("professional")
}
