//! Direct answers to "what did I say" questions and the memory block that
//! goes into the prompt.

use std::sync::LazyLock;

use regex::RegexSet;

use crate::pipeline::patterns::phrase_set;

use super::facts::Facts;

static FIRST_MESSAGE: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"(?i)what.{0,20}first (message|thing)",
        r"(?i)first (message|thing).{0,20}\b(i|you)\b",
        r"(?i)what did i (first|initially) (say|send|tell)",
    ])
});

static GENERAL_MEMORY: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"(?i)\bdo you remember (what|when|how|anything|our|the|everything)\b",
        r"(?i)\bwhat do you remember\b",
        r"(?i)\bwhat did i (say|tell|mention)\b",
        r"(?i)\bearlier i (said|told|mentioned)\b",
    ])
});

fn join(items: impl IntoIterator<Item = impl AsRef<str>>) -> String {
    items
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Answer for a memory question, if the message is one.
pub fn memory_answer(text: &str, facts: &Facts) -> Option<String> {
    if FIRST_MESSAGE.is_match(text) {
        let answer = match (&facts.first_user_message, facts.exchange_count) {
            (Some(first), n) if n >= 2 => format!("Your first message was: \"{first}\""),
            _ => "This is the first message you've sent me.".to_string(),
        };
        return Some(answer);
    }

    if !GENERAL_MEMORY.is_match(text) {
        return None;
    }

    let mut parts = Vec::new();
    if !facts.topics_discussed.is_empty() {
        parts.push(format!("You've talked about {}", join(&facts.topics_discussed)));
    }
    if !facts.entities_mentioned.people.is_empty() {
        parts.push(format!("You mentioned your {}", join(&facts.entities_mentioned.people)));
    }
    if !facts.emotions_expressed.is_empty() {
        parts.push(format!("You've expressed {}", join(&facts.emotions_expressed)));
    }

    Some(if parts.is_empty() {
        "We've mostly just been exchanging greetings so far.".to_string()
    } else {
        format!("Here's what I remember: {}.", parts.join(". "))
    })
}

/// Conversation-state block for the prompt. Needs two or more exchanges.
pub fn memory_summary(facts: &Facts, user_name: Option<&str>) -> Option<String> {
    if facts.exchange_count < 2 {
        return None;
    }

    let mut lines = vec![
        "CONVERSATION MEMORY:".to_string(),
        format!(
            "- You've exchanged {} messages with {}.",
            facts.exchange_count,
            user_name.unwrap_or("this user")
        ),
    ];

    if facts.greetings_count >= 3 {
        lines.push(format!(
            "- They've sent {} greetings, they may just be saying hi casually.",
            facts.greetings_count
        ));
    }
    if facts.substantive_exchanges > 0 {
        lines.push(format!(
            "- {} substantive exchanges beyond greetings.",
            facts.substantive_exchanges
        ));
    }
    if let Some(first) = &facts.first_user_message {
        lines.push(format!("- Their first message was: \"{first}\". If asked, quote it exactly."));
    }
    if facts.last_3_user_messages.len() >= 2 {
        lines.push("- Recent messages:".to_string());
        for (i, msg) in facts.last_3_user_messages.iter().enumerate() {
            lines.push(format!("  {}. \"{msg}\"", i + 1));
        }
    }
    if !facts.topics_discussed.is_empty() {
        lines.push(format!("- Topics: {}", join(&facts.topics_discussed)));
    }
    if !facts.entities_mentioned.people.is_empty() {
        lines.push(format!("- People: {}", join(&facts.entities_mentioned.people)));
    }
    if !facts.emotions_expressed.is_empty() {
        lines.push(format!("- Emotions: {}", join(&facts.emotions_expressed)));
    }
    if facts.has_shared_problem {
        lines.push(
            "- They already shared a problem. Acknowledge it instead of asking what's going on."
                .to_string(),
        );
    }
    if !facts.bot_recent_questions.is_empty() {
        lines.push(format!(
            "- You recently asked about: {}. Don't ask the same kind of question again.",
            join(facts.bot_recent_questions.iter().map(|q| q.as_str()))
        ));
    }
    if !facts.user_answered_questions.is_empty() {
        lines.push(format!(
            "- They already told you {}. Build on it.",
            join(facts.user_answered_questions.iter().map(|a| a.as_str()))
        ));
    }
    if facts.exchange_count >= 4 && facts.substantive_exchanges == 0 {
        lines.push(
            "- They keep sending casual greetings. Match the energy and gently invite more."
                .to_string(),
        );
    }
    if let Some(combo) = &facts.pattern_combination {
        lines.push(format!(
            "- Latest message mixes {combo}. Acknowledge every part, gratitude first."
        ));
    }

    Some(lines.join("\n"))
}
