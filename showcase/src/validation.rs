//! Field rules shared by sign-in, registration and review submission.

use crate::error::ValidationError;

/// Minimum password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// Minimum display name length at registration
pub const MIN_NAME_LEN: usize = 2;

/// Minimum review comment length
pub const MIN_COMMENT_LEN: usize = 10;

/// Lowest review rating
pub const MIN_RATING: u8 = 1;

/// Highest review rating
pub const MAX_RATING: u8 = 5;

/// Rejects blank values.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] if `value` is empty after trimming.
pub fn ensure_present(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

/// Rejects values shorter than `min` characters (after trimming).
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] for blank values and
/// [`ValidationError::TooShort`] for short ones.
pub fn ensure_min_len(field: &'static str, value: &str, min: usize) -> Result<(), ValidationError> {
    ensure_present(field, value)?;
    if value.trim().chars().count() < min {
        return Err(ValidationError::TooShort { field, min });
    }
    Ok(())
}

/// Loose email shape check: `local@domain.tld`, no whitespace.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

/// Checks an email field.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] or [`ValidationError::InvalidEmail`].
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    ensure_present("email", email)?;
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail(email.trim().to_string()));
    }
    Ok(())
}

/// Checks a password field.
///
/// # Errors
///
/// Returns [`ValidationError::TooShort`] below [`MIN_PASSWORD_LEN`].
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    // Passwords are not trimmed: surrounding spaces are significant.
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password",
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

/// Checks a review star rating.
///
/// # Errors
///
/// Returns [`ValidationError::RatingOutOfRange`] outside 1 to 5.
pub fn validate_rating(rating: u8) -> Result<(), ValidationError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ValidationError::RatingOutOfRange(rating));
    }
    Ok(())
}

/// Checks a review comment.
///
/// # Errors
///
/// Returns [`ValidationError::TooShort`] below [`MIN_COMMENT_LEN`] characters.
pub fn validate_comment(comment: &str) -> Result<(), ValidationError> {
    ensure_min_len("comment", comment, MIN_COMMENT_LEN)
}
