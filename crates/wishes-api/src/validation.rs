use thiserror::Error;

use wishes_types::api::CreateWishRequest;
use wishes_types::models::{MESSAGE_MAX_LEN, NAME_MAX_LEN, NewWish};

/// First rule a submission broke. Rules are checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name is required")]
    NameRequired,

    #[error("Name too long")]
    NameTooLong,

    #[error("Message is required")]
    MessageRequired,

    #[error("Message too long")]
    MessageTooLong,
}

/// Trim and bound-check a submission. `emoji` passes through untouched.
pub fn validate(req: CreateWishRequest) -> Result<NewWish, ValidationError> {
    let name = req.name.as_deref().map(trim).unwrap_or_default();
    if name.is_empty() {
        return Err(ValidationError::NameRequired);
    }
    if text_len(name) > NAME_MAX_LEN {
        return Err(ValidationError::NameTooLong);
    }

    let message = req.message.as_deref().map(trim).unwrap_or_default();
    if message.is_empty() {
        return Err(ValidationError::MessageRequired);
    }
    if text_len(message) > MESSAGE_MAX_LEN {
        return Err(ValidationError::MessageTooLong);
    }

    Ok(NewWish {
        name: name.to_string(),
        message: message.to_string(),
        emoji: req.emoji,
    })
}

/// Whitespace trim that also strips the byte-order mark, matching what
/// browsers treat as blank.
fn trim(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

/// Length in UTF-16 code units, the unit browsers count in, so emoji and
/// other astral characters count twice.
fn text_len(text: &str) -> usize {
    text.encode_utf16().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(name: Option<&str>, message: Option<&str>) -> CreateWishRequest {
        CreateWishRequest {
            name: name.map(String::from),
            message: message.map(String::from),
            emoji: None,
        }
    }

    #[test]
    fn trims_name_and_message() {
        let wish = validate(CreateWishRequest {
            name: Some("  Ana ".into()),
            message: Some("\tHappy birthday!\n".into()),
            emoji: Some("🎉".into()),
        })
        .unwrap();

        assert_eq!(wish.name, "Ana");
        assert_eq!(wish.message, "Happy birthday!");
        assert_eq!(wish.emoji.as_deref(), Some("🎉"));
    }

    #[test]
    fn missing_or_blank_name_is_required() {
        assert_eq!(validate(req(None, Some("hi"))), Err(ValidationError::NameRequired));
        assert_eq!(validate(req(Some(""), Some("hi"))), Err(ValidationError::NameRequired));
        assert_eq!(validate(req(Some("   "), Some("hi"))), Err(ValidationError::NameRequired));
    }

    #[test]
    fn blank_message_is_required() {
        assert_eq!(validate(req(Some("Ana"), None)), Err(ValidationError::MessageRequired));
        assert_eq!(validate(req(Some("Ana"), Some(" \n "))), Err(ValidationError::MessageRequired));
    }

    #[test]
    fn length_bounds_are_inclusive() {
        let name = "a".repeat(NAME_MAX_LEN);
        let message = "m".repeat(MESSAGE_MAX_LEN);
        assert!(validate(req(Some(&name), Some(&message))).is_ok());

        let long_name = "a".repeat(NAME_MAX_LEN + 1);
        assert_eq!(validate(req(Some(&long_name), Some("hi"))), Err(ValidationError::NameTooLong));

        let long_message = "m".repeat(MESSAGE_MAX_LEN + 1);
        assert_eq!(
            validate(req(Some("Ana"), Some(&long_message))),
            Err(ValidationError::MessageTooLong)
        );
    }

    #[test]
    fn name_rule_reported_before_message_rule() {
        let long_name = "a".repeat(NAME_MAX_LEN + 1);
        let long_message = "m".repeat(MESSAGE_MAX_LEN + 1);
        assert_eq!(
            validate(req(Some(&long_name), Some(&long_message))),
            Err(ValidationError::NameTooLong)
        );
        assert_eq!(validate(req(None, None)), Err(ValidationError::NameRequired));
    }

    #[test]
    fn length_counts_utf16_units_not_bytes() {
        // 50 two-byte characters are 50 units
        let name = "é".repeat(NAME_MAX_LEN);
        assert!(validate(req(Some(&name), Some("hi"))).is_ok());
    }

    #[test]
    fn astral_emoji_count_as_two_units() {
        let name = "🎉".repeat(NAME_MAX_LEN / 2);
        assert!(validate(req(Some(&name), Some("hi"))).is_ok());

        let name = "🎉".repeat(NAME_MAX_LEN / 2 + 1);
        assert_eq!(validate(req(Some(&name), Some("hi"))), Err(ValidationError::NameTooLong));

        let message = "🎂".repeat(MESSAGE_MAX_LEN / 2 + 1);
        assert_eq!(
            validate(req(Some("Ana"), Some(&message))),
            Err(ValidationError::MessageTooLong)
        );
    }

    #[test]
    fn byte_order_mark_is_trimmed() {
        assert_eq!(validate(req(Some("\u{FEFF}"), Some("hi"))), Err(ValidationError::NameRequired));
        assert_eq!(
            validate(req(Some("Ana"), Some(" \u{FEFF}\n"))),
            Err(ValidationError::MessageRequired)
        );

        let wish = validate(req(Some("\u{FEFF}Ana\u{FEFF}"), Some("hi"))).unwrap();
        assert_eq!(wish.name, "Ana");
    }

    #[test]
    fn surrounding_whitespace_does_not_count() {
        let name = format!("  {}  ", "a".repeat(NAME_MAX_LEN));
        assert!(validate(req(Some(&name), Some("hi"))).is_ok());
    }
}
