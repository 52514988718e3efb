//! Category-gated entity extraction.
//!
//! A bare keyword is never enough: people need a possessive or a
//! relationship construction, places a preposition, activities a
//! first-person verb, objects a possessive. Idioms like "be like a friend"
//! are blanked out before matching.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::pipeline::patterns::compile;

/// Entities seen across the conversation, deduplicated and sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entities {
    pub people: BTreeSet<String>,
    pub places: BTreeSet<String>,
    pub activities: BTreeSet<String>,
    pub objects: BTreeSet<String>,
}

impl Entities {
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
            && self.places.is_empty()
            && self.activities.is_empty()
            && self.objects.is_empty()
    }

    pub fn absorb(&mut self, other: Entities) {
        self.people.extend(other.people);
        self.places.extend(other.places);
        self.activities.extend(other.activities);
        self.objects.extend(other.objects);
    }
}

const PEOPLE: &str = "mom|mum|mother|dad|father|parent|sister|brother|sibling|grandma|grandmother|grandpa|grandfather|aunt|uncle|cousin|friend|bestie|classmate|roommate|boyfriend|girlfriend|partner|husband|wife|crush|ex|teacher|professor|boss|manager|coach|coworker";

const PLACES: &str = "school|work|office|home|church|gym|hospital|mall|park|library|class|university|college|dorm|campus";

const ACTIVITIES: &str = "gaming|video games|basketball|football|soccer|volleyball|guitar|piano|drawing|painting|reading|writing|running|swimming|dancing|singing|cooking|baking|chess|hiking|coding";

const OBJECTS: &str = "phone|laptop|computer|car|bike|dog|cat|pet|room|house|apartment|bag|wallet|keys|grades|plant";

static IDIOMS: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?i)\b(be like a friend|like a friend|as a friend|just friends|friend ?zone|you'?re my friend|you are my friend|be my friend|my friend,|hey friend|thanks,? friend)\b",
    )
});

static PEOPLE_POSSESSIVE: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"(?i)\b(?:my|our)\s+(?:best\s+|older\s+|younger\s+|little\s+|big\s+|step\s?)?({PEOPLE})s?\b"
    ))
});

static PEOPLE_RELATION: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"(?i)\b(?:(?:i|we)\s+(?:have|had|got)\s+a|a)\s+({PEOPLE})\s+(?:who|that|of mine)\b"
    ))
});

static PLACES_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"(?i)\b(?:at|to|from|in|my)\s+(?:the\s+|my\s+)?({PLACES})\b"
    ))
});

static ACTIVITIES_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"(?i)\b(?:i|we)\s+(?:really\s+)?(?:love|like|enjoy|started|play|do|hate|quit|practice|miss)\s+(?:playing\s+|doing\s+)?({ACTIVITIES})\b|\bmy hobby is\s+({ACTIVITIES})\b"
    ))
});

static OBJECTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(r"(?i)\b(?:my|our)\s+(?:new\s+|old\s+)?({OBJECTS})\b"))
});

fn collect(regex: &Regex, text: &str, into: &mut BTreeSet<String>) {
    for caps in regex.captures_iter(text) {
        if let Some(m) = caps.iter().skip(1).flatten().next() {
            into.insert(m.as_str().to_lowercase());
        }
    }
}

/// Entities in one message.
pub fn extract_entities(text: &str) -> Entities {
    let cleaned = IDIOMS.replace_all(text, " ");
    let mut entities = Entities::default();
    collect(&PEOPLE_POSSESSIVE, &cleaned, &mut entities.people);
    collect(&PEOPLE_RELATION, &cleaned, &mut entities.people);
    collect(&PLACES_RE, &cleaned, &mut entities.places);
    collect(&ACTIVITIES_RE, &cleaned, &mut entities.activities);
    collect(&OBJECTS_RE, &cleaned, &mut entities.objects);
    entities
}
