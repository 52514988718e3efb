use serde::{Deserialize, Serialize};

use super::enums::Role;

/// One message in the conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }
}

/// Text of the latest user turn, or "" when the history has none.
pub fn latest_user_text(history: &[Turn]) -> &str {
    history
        .iter()
        .rev()
        .find(|t| t.is_user())
        .map(|t| t.content.as_str())
        .unwrap_or("")
}

/// Text of the latest assistant turn, if any.
pub fn latest_assistant_text(history: &[Turn]) -> Option<&str> {
    history
        .iter()
        .rev()
        .find(|t| t.is_assistant())
        .map(|t| t.content.as_str())
}

/// Count of user turns before the latest one.
pub fn prior_user_turns(history: &[Turn]) -> usize {
    history.iter().filter(|t| t.is_user()).count().saturating_sub(1)
}

/// All user turn texts, oldest first.
pub fn user_texts(history: &[Turn]) -> impl Iterator<Item = &str> {
    history
        .iter()
        .filter(|t| t.is_user())
        .map(|t| t.content.as_str())
}

/// Up to `n` most recent assistant texts, newest first.
pub fn recent_assistant_texts(history: &[Turn], n: usize) -> Vec<&str> {
    history
        .iter()
        .rev()
        .filter(|t| t.is_assistant())
        .take(n)
        .map(|t| t.content.as_str())
        .collect()
}

/// Whitespace-separated word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> Vec<Turn> {
        vec![
            Turn::user("hi"),
            Turn::assistant("Hey! What's on your mind?"),
            Turn::user("school is rough"),
            Turn::assistant("That sounds hard."),
            Turn::user("yeah"),
        ]
    }

    #[test]
    fn latest_user_text_picks_last_user_turn() {
        assert_eq!(latest_user_text(&history()), "yeah");
        assert_eq!(latest_user_text(&[]), "");
    }

    #[test]
    fn prior_user_turns_excludes_current() {
        assert_eq!(prior_user_turns(&history()), 2);
        assert_eq!(prior_user_turns(&[Turn::user("hello")]), 0);
        assert_eq!(prior_user_turns(&[]), 0);
    }

    #[test]
    fn recent_assistant_texts_newest_first() {
        let h = history();
        let recent = recent_assistant_texts(&h, 3);
        assert_eq!(recent, vec!["That sounds hard.", "Hey! What's on your mind?"]);
    }

    #[test]
    fn turn_deserializes_from_wire_shape() {
        let turn: Turn = serde_json::from_str(r#"{"role":"assistant","content":"hello"}"#).unwrap();
        assert!(turn.is_assistant());
        assert_eq!(turn.content, "hello");
    }
}
