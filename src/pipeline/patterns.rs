//! Generic pattern tables.
//!
//! Every tagger in the pipeline is a data table of (id, regex, tag, weight)
//! rows evaluated by the same matcher, so each row can be tested on its own.

use regex::{Regex, RegexSet};

/// A compiled pattern with its tag metadata.
#[derive(Debug)]
pub struct TaggedPattern<T> {
    pub id: &'static str,
    pub regex: Regex,
    pub tag: T,
    pub weight: u8,
}

/// Build one table row. Panics on an invalid regex (static tables only).
pub fn tagged<T>(id: &'static str, regex_str: &str, tag: T, weight: u8) -> TaggedPattern<T> {
    TaggedPattern {
        id,
        regex: Regex::new(regex_str).expect("Invalid pattern table regex"),
        tag,
        weight,
    }
}

/// Compile a single static regex.
pub fn compile(regex_str: &str) -> Regex {
    Regex::new(regex_str).expect("Invalid pattern regex")
}

/// Compile an untagged phrase set.
pub fn phrase_set(patterns: &[&str]) -> RegexSet {
    RegexSet::new(patterns).expect("Invalid phrase set regex")
}

/// Ordered rows evaluated against one text.
#[derive(Debug)]
pub struct PatternTable<T> {
    rows: Vec<TaggedPattern<T>>,
}

impl<T> PatternTable<T> {
    pub fn new(rows: Vec<TaggedPattern<T>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[TaggedPattern<T>] {
        &self.rows
    }

    /// All matching rows in table order.
    pub fn matches<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a TaggedPattern<T>> + 'a {
        self.rows.iter().filter(move |row| row.regex.is_match(text))
    }

    /// First matching row in table order.
    pub fn first_match(&self, text: &str) -> Option<&TaggedPattern<T>> {
        self.rows.iter().find(|row| row.regex.is_match(text))
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.first_match(text).is_some()
    }

    pub fn count(&self, text: &str) -> usize {
        self.matches(text).count()
    }
}

impl<T: Copy> PatternTable<T> {
    /// Tag of the first matching row.
    pub fn first_tag(&self, text: &str) -> Option<T> {
        self.first_match(text).map(|row| row.tag)
    }
}

impl<T: Copy + PartialEq> PatternTable<T> {
    /// Summed weight of matching rows carrying `tag`.
    pub fn weight_for(&self, text: &str, tag: T) -> u32 {
        self.matches(text)
            .filter(|row| row.tag == tag)
            .map(|row| u32::from(row.weight))
            .sum()
    }
}

/// Lowercased words with surrounding punctuation trimmed.
pub fn words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}
