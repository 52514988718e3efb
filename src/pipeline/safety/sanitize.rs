use super::types::{InputModification, InputModificationKind, SafetyError, SanitizedInput};

/// Maximum user message length in characters.
pub const MAX_INPUT_CHARS: usize = 1_000;

/// Clean a user message before any analysis.
pub fn sanitize_user_input(raw: &str, max_chars: usize) -> Result<SanitizedInput, SafetyError> {
    let mut text = raw.to_string();
    let mut modifications = Vec::new();

    // Step 1: Remove non-visible Unicode characters
    let before = text.clone();
    text = remove_invisible_unicode(&text);
    if text != before {
        modifications.push(InputModification {
            kind: InputModificationKind::InvisibleUnicodeRemoved,
            description: "Stripped non-visible Unicode characters".to_string(),
        });
    }

    // Step 2: Remove control characters (except newline, tab)
    let before = text.clone();
    text = remove_control_characters(&text);
    if text != before {
        modifications.push(InputModification {
            kind: InputModificationKind::ControlCharacterRemoved,
            description: "Stripped control characters".to_string(),
        });
    }

    // Step 3: Truncate to maximum length
    let char_count = text.chars().count();
    if char_count > max_chars {
        text = truncate_at_word_boundary(&text, max_chars);
        modifications.push(InputModification {
            kind: InputModificationKind::ExcessiveLengthTruncated,
            description: format!(
                "Truncated from {} to {} characters",
                char_count,
                text.chars().count()
            ),
        });
    }

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(SafetyError::EmptyInput);
    }

    Ok(SanitizedInput {
        was_modified: !modifications.is_empty(),
        text,
        modifications,
    })
}

/// Default sanitization with the standard length limit.
pub fn sanitize_message(raw: &str) -> Result<SanitizedInput, SafetyError> {
    sanitize_user_input(raw, MAX_INPUT_CHARS)
}

/// Remove zero-width and invisible Unicode characters.
fn remove_invisible_unicode(text: &str) -> String {
    text.chars()
        .filter(|c| {
            !matches!(
                *c,
                '\u{200B}'..='\u{200F}'
                | '\u{202A}'..='\u{202E}'
                | '\u{2060}'..='\u{2064}'
                | '\u{2066}'..='\u{2069}'
                | '\u{FEFF}'
                | '\u{00AD}'
            )
        })
        .collect()
}

/// Remove control characters except newline and tab.
fn remove_control_characters(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

/// Cut at the last whitespace before `max_chars`, or hard-cut if none.
fn truncate_at_word_boundary(text: &str, max_chars: usize) -> String {
    let cut: String = text.chars().take(max_chars).collect();
    match cut.rfind(char::is_whitespace) {
        Some(idx) if idx > 0 => cut[..idx].trim_end().to_string(),
        _ => cut,
    }
}
