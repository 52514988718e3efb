//! Second-pass element extraction and the priority table.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{EmotionalTone, MessageElement};
use crate::pipeline::patterns::{compile, tagged, PatternTable};

use super::names::detect_name_change;
use super::taggers::is_declining;
use super::types::{ElementPriorities, MessageElements, Priority};

static ELEMENTS: LazyLock<PatternTable<MessageElement>> = LazyLock::new(|| {
    use MessageElement::*;
    PatternTable::new(vec![
        tagged("gratitude", r"(?i)\b(thanks?|thank you|thx|ty|appreciate|grateful)\b", Gratitude, 1),
        tagged("goodbye_opening", r"(?i)(?:^|[.!?,;]\s*)(?:(?:ok(?:ay)?|alright|well|anyway)[,\s]+)?(?:good ?night|gnight|nite|bye(?: bye)?|goodbye|see (?:you|ya)|ttyl|take care)\b", Goodbye, 1),
        tagged("goodbye_closing", r"(?i)\b(?:good ?night|gnight|nite|bye|goodbye|see (?:you|ya)(?: later| tomorrow| soon)?|ttyl|take care)(?:\s+(?:lol|haha\w*|xd))?[\s.!,~]*$", Goodbye, 1),
        tagged("goodbye_leaving", r"(?i)\b(going to (sleep|bed)|gotta go|heading (out|off)|(talk|catch you) later)\b", Goodbye, 1),
        tagged("question_start", r"(?i)^\s*(what|why|how|when|where|who|which|do|does|did|is|are|can|could|would|should)\b", Question, 1),
        tagged("problem", r"(?i)\b(problem|issue|trouble|struggl\w*|difficult|hard time|can'?t|cannot|stuck|failing|broke)\b", Problem, 1),
        tagged("emotion", r"(?i)\b(feel|feeling|felt|sad|happy|angry|furious|mad|scared|anxious|worried|lonely|depressed|excited|upset|frustrated|hurt|crying|nervous|stressed|overwhelmed|tired|proud)\b", Emotion, 1),
        tagged("future_plans", r"(?i)\b(tomorrow|next (week|month|year)|this weekend|going to|gonna|planning|plan to)\b", FuturePlans, 1),
        tagged("playfulness", r"(?i)(\b(lol|haha\w*|lmao|rofl|hehe|jk|kidding)\b|\bxd\b|:\))", Playfulness, 1),
        tagged("request", r"(?i)\b(can you|could you|would you|will you|please|help me|tell me|give me|show me|make me)\b", Request, 1),
        tagged("time_reference", r"(?i)\b(today|tonight|yesterday|this (morning|evening|afternoon)|right now|o'?clock|\d{1,2}(:\d{2})?\s?(am|pm)|what time|what day|date)\b", TimeReference, 1),
    ])
});

static REQUEST_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\b(?:can you|could you|would you|will you|please|help me|tell me|give me|show me|make me)\b[^.?!]*")
});

fn sentences_ending_with_question(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut start = 0;
    for (idx, ch) in text.char_indices() {
        if matches!(ch, '.' | '!' | '?') {
            let end = idx + ch.len_utf8();
            if ch == '?' {
                let sentence = text[start..end].trim();
                if sentence.len() > 1 {
                    out.push(sentence.to_string());
                }
            }
            start = end;
        }
    }
    out
}

/// Flags for one message plus the captured name, questions and requests.
pub fn extract_elements(text: &str) -> MessageElements {
    let mut elements = MessageElements::default();
    let declining = is_declining(text);

    for row in ELEMENTS.matches(text) {
        if row.tag == MessageElement::Gratitude && declining {
            continue;
        }
        elements.insert(row.tag);
    }

    elements.questions = sentences_ending_with_question(text);
    if !elements.questions.is_empty() {
        elements.insert(MessageElement::Question);
    }

    elements.requests = REQUEST_CLAUSE
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .collect();

    if let Some(name) = detect_name_change(text) {
        elements.insert(MessageElement::NameChange);
        elements.new_name = Some(name);
    }

    elements
}

/// Fixed priority table. Time references carry no priority. Keys are always
/// a subset of the detected elements.
pub fn element_priorities(
    elements: &MessageElements,
    tone: EmotionalTone,
    disclosure_depth: u8,
) -> ElementPriorities {
    let mut priorities = ElementPriorities::new();
    for element in elements.iter() {
        let priority = match element {
            MessageElement::NameChange | MessageElement::Gratitude => Priority::Critical,
            MessageElement::Goodbye | MessageElement::Question | MessageElement::Request => {
                Priority::Important
            }
            MessageElement::Emotion if tone == EmotionalTone::Crisis => Priority::Critical,
            MessageElement::Emotion if disclosure_depth >= 3 => Priority::Important,
            MessageElement::Emotion
            | MessageElement::Problem
            | MessageElement::FuturePlans
            | MessageElement::Playfulness => Priority::Optional,
            MessageElement::TimeReference => continue,
        };
        priorities.insert(element, priority);
    }
    priorities
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complex_goodbye_message() {
        let e = extract_elements("Thanks for tonight! Call me Snow. Good night lol");
        assert!(e.has(MessageElement::Gratitude));
        assert!(e.has(MessageElement::Goodbye));
        assert!(e.has(MessageElement::NameChange));
        assert!(e.has(MessageElement::Playfulness));
        assert!(e.has(MessageElement::TimeReference));
        assert_eq!(e.new_name.as_deref(), Some("Snow"));
        assert_eq!(e.complexity_score(), 10);
    }

    #[test]
    fn goodbye_needs_leave_taking() {
        for text in ["ok bye!", "good night, I'm tired", "thanks, talk to you soon. bye", "gotta go, see ya"] {
            assert!(extract_elements(text).has(MessageElement::Goodbye), "{text}");
        }
        for text in [
            "I never got to say goodbye to my dog and I feel so sad",
            "I feel so anxious I can't sleep",
            "I had a good night with my friends",
        ] {
            assert!(!extract_elements(text).has(MessageElement::Goodbye), "{text}");
        }
    }

    #[test]
    fn declining_is_not_gratitude() {
        let e = extract_elements("No thanks");
        assert!(!e.has(MessageElement::Gratitude));
    }

    #[test]
    fn questions_and_requests_captured() {
        let e = extract_elements("I'm stuck. Can you help me with this? Why is it so hard?");
        assert_eq!(e.questions, vec!["Can you help me with this?", "Why is it so hard?"]);
        assert_eq!(e.requests, vec!["Can you help me with this"]);
        assert!(e.has(MessageElement::Problem));
    }

    #[test]
    fn complexity_matches_flag_count() {
        for text in [
            "hello",
            "I feel furious",
            "thanks, see you tomorrow!",
            "can you tell me what time it is?",
            "",
        ] {
            let e = extract_elements(text);
            assert_eq!(usize::from(e.complexity_score()), (2 * e.count()).min(10), "{text}");
        }
    }

    #[test]
    fn priority_table() {
        let e = extract_elements("thanks! I feel sad, what should I do tomorrow at 5pm?");
        let p = element_priorities(&e, EmotionalTone::Negative, 4);
        assert_eq!(p.get(&MessageElement::Gratitude), Some(&Priority::Critical));
        assert_eq!(p.get(&MessageElement::Question), Some(&Priority::Important));
        assert_eq!(p.get(&MessageElement::Emotion), Some(&Priority::Important));
        assert_eq!(p.get(&MessageElement::FuturePlans), Some(&Priority::Optional));
        assert!(e.has(MessageElement::TimeReference));
        assert!(!p.contains_key(&MessageElement::TimeReference));

        let shallow = element_priorities(&e, EmotionalTone::Negative, 2);
        assert_eq!(shallow.get(&MessageElement::Emotion), Some(&Priority::Optional));
        let crisis = element_priorities(&e, EmotionalTone::Crisis, 2);
        assert_eq!(crisis.get(&MessageElement::Emotion), Some(&Priority::Critical));
    }

    #[test]
    fn priority_keys_subset_of_elements() {
        let e = extract_elements("bye, call me later");
        let p = element_priorities(&e, EmotionalTone::Neutral, 1);
        assert!(p.keys().all(|k| e.has(*k)));
        assert!(!e.has(MessageElement::NameChange));
    }
}
