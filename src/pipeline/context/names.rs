//! Name-change detection ("call me Sam", "my name is Sam", "I'm Sam").
//!
//! Markers are tried in order. A captured token is rejected when it is a
//! common word rather than a name. Case-insensitive markers only accept a
//! token that is capitalized in the original text or introduced by an
//! explicit naming phrase.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::{Regex, RegexSet};

use crate::pipeline::patterns::{compile, phrase_set};

struct NameMarker {
    regex: Regex,
    /// Marker only matches capitalized tokens, no re-check needed.
    case_anchored: bool,
}

static MARKERS: LazyLock<Vec<NameMarker>> = LazyLock::new(|| {
    vec![
        NameMarker {
            regex: compile(r"(?i)\bcall me ([a-z][a-z'\-]*)"),
            case_anchored: false,
        },
        NameMarker {
            regex: compile(r"(?i)\bmy name(?:'s|\s+is)\s+([a-z][a-z'\-]*)"),
            case_anchored: false,
        },
        NameMarker {
            regex: compile(r"(?i)\bi go by ([a-z][a-z'\-]*)"),
            case_anchored: false,
        },
        NameMarker {
            regex: compile(r"\b(?:[Ii]'m|[Ii]m|[Ii] am)\s+([A-Z][a-zA-Z'\-]+)\b"),
            case_anchored: true,
        },
    ]
});

static EXPLICIT_MARKERS: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"(?i)\bmy name is\b",
        r"(?i)\bmy name's\b",
        r"(?i)\bi go by\b",
        r"(?i)\b(please|you can|just|pls) call me\b",
    ])
});

static NOT_A_NAME: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // time and place
        "later", "back", "tomorrow", "tonight", "today", "now", "soon", "again", "anytime",
        "whenever", "here", "there", "home", "out", "up", "down", "off", "in", "on", "at",
        // states
        "fine", "good", "okay", "ok", "alright", "great", "tired", "sad", "happy", "bored",
        "angry", "mad", "furious", "scared", "worried", "stressed", "alone", "lonely", "glad",
        "excited", "sick", "hungry", "sleepy", "busy", "done", "ready", "sorry", "sure",
        "crazy", "stupid", "lazy", "weird", "dumb", "lost", "confused", "new", "old", "free",
        "better", "worse", "nervous", "anxious", "depressed", "upset", "exhausted", "broke",
        // verbs and fillers
        "going", "gonna", "wanna", "just", "not", "so", "really", "very", "still", "also",
        "actually", "feeling", "trying", "getting", "doing", "having", "being", "talking",
        "thinking", "working", "leaving", "sleeping", "studying", "looking", "waiting",
        "like", "literally", "kinda", "sorta", "too", "pretty", "quite", "always", "never",
        // function words
        "the", "a", "an", "and", "but", "or", "because", "if", "when", "what", "with", "about",
        "for", "to", "from", "that", "this", "it", "me", "you", "anything", "whatever",
        "maybe", "anyway", "lol", "haha",
        // address terms
        "bro", "dude", "man", "girl", "friend", "buddy", "baby", "babe", "honey", "sweetie",
        "sir", "maam", "boss",
    ]
    .into_iter()
    .collect()
});

fn is_capitalized(token: &str) -> bool {
    token.chars().next().is_some_and(char::is_uppercase)
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The name the user asked to be called, if this message carries one.
pub fn detect_name_change(text: &str) -> Option<String> {
    for marker in MARKERS.iter() {
        let Some(token) = marker.regex.captures(text).and_then(|c| c.get(1)) else {
            continue;
        };
        let token = token.as_str().trim_matches(|c: char| c == '\'' || c == '-');
        if token.len() < 2 || NOT_A_NAME.contains(token.to_lowercase().as_str()) {
            continue;
        }
        if !marker.case_anchored && !is_capitalized(token) && !EXPLICIT_MARKERS.is_match(text) {
            continue;
        }
        return Some(capitalize(token));
    }
    None
}
