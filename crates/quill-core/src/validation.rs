//! Input validation shared by every entry point.

use crate::error::DomainError;

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 32;
pub const PASSWORD_MIN: usize = 8;
pub const TITLE_MAX: usize = 200;
pub const CONTENT_MAX: usize = 100_000;
pub const COMMENT_MAX: usize = 5_000;
pub const CATEGORY_NAME_MAX: usize = 64;

pub fn username(value: &str) -> Result<(), DomainError> {
    let len = value.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        return Err(DomainError::Validation(format!(
            "Username must be {USERNAME_MIN}-{USERNAME_MAX} characters"
        )));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(DomainError::Validation(
            "Username may only contain letters, digits, '_' and '-'".to_string(),
        ));
    }
    Ok(())
}

pub fn email(value: &str) -> Result<(), DomainError> {
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    };
    if valid && !value.chars().any(char::is_whitespace) {
        Ok(())
    } else {
        Err(DomainError::Validation("Invalid email address".to_string()))
    }
}

pub fn password(value: &str) -> Result<(), DomainError> {
    if value.chars().count() < PASSWORD_MIN {
        return Err(DomainError::Validation(format!(
            "Password must be at least {PASSWORD_MIN} characters"
        )));
    }
    Ok(())
}

/// Non-blank text no longer than `max` characters.
pub fn required_text(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{field} is required")));
    }
    if value.chars().count() > max {
        return Err(DomainError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(username("ada_l").is_ok());
        assert!(username("ab").is_err());
        assert!(username("has space").is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(email("a@example.com").is_ok());
        assert!(email("nope").is_err());
        assert!(email("@example.com").is_err());
        assert!(email("a@localhost").is_err());
    }

    #[test]
    fn test_required_text() {
        assert!(required_text("Title", "  ", 10).is_err());
        assert!(required_text("Title", "abcdefghijk", 10).is_err());
        assert!(required_text("Title", "ok", 10).is_ok());
    }
}
