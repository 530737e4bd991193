//! Identifier character-class rules for frame fields
//!
//! Both identifiers are decoded as UTF-8 and checked per character against
//! the Unicode general categories L* (letters) and N* (numbers), so
//! `"Kalender2"` and `"時計"` are valid destinations while combining marks
//! (Mn, Mc, Me) are not.

use unicode_general_category::{get_general_category, GeneralCategory};

use crate::constants::SOURCE_EXTRA_CHAR;
use crate::error::FrameError;

/// Letter or number by general category
pub fn is_letter_or_number(ch: char) -> bool {
    matches!(
        get_general_category(ch),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
            | GeneralCategory::DecimalNumber
            | GeneralCategory::LetterNumber
            | GeneralCategory::OtherNumber
    )
}

/// Characters permitted in a source identifier
pub fn is_source_char(ch: char) -> bool {
    is_letter_or_number(ch) || ch == SOURCE_EXTRA_CHAR
}

/// Characters permitted in a destination identifier
pub fn is_destination_char(ch: char) -> bool {
    is_letter_or_number(ch)
}

/// Validate a raw source field and return it as an owned string
pub fn validate_source(raw: &[u8]) -> Result<String, FrameError> {
    match identifier(raw, is_source_char) {
        Some(source) => Ok(source),
        None => Err(FrameError::InvalidSource {
            value: String::from_utf8_lossy(raw).into_owned(),
        }),
    }
}

/// Validate a raw destination field against the character rules and the reserved prefix
pub fn validate_destination(raw: &[u8], reserved_prefix: &str) -> Result<String, FrameError> {
    let destination = identifier(raw, is_destination_char).ok_or_else(|| {
        FrameError::InvalidDestination {
            value: String::from_utf8_lossy(raw).into_owned(),
        }
    })?;

    if !reserved_prefix.is_empty() && destination.starts_with(reserved_prefix) {
        return Err(FrameError::ReservedDestination {
            value: destination,
            prefix: reserved_prefix.to_string(),
        });
    }

    Ok(destination)
}

fn identifier(raw: &[u8], allowed: fn(char) -> bool) -> Option<String> {
    let text = std::str::from_utf8(raw).ok()?;
    if text.is_empty() || !text.chars().all(allowed) {
        return None;
    }
    Some(text.to_string())
}
