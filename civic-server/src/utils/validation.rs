//! Input validation helpers
//!
//! Length limits for free-text fields accepted over HTTP. Semantic checks
//! (description length, required address fields) live in the composer.

use shared::models::{IssueSubmission, LoginRequest};

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Issue descriptions
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// Display names
pub const MAX_NAME_LEN: usize = 200;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// City / state / district / postal code
pub const MAX_ADDRESS_FIELD_LEN: usize = 200;

/// Validate that a string is within the length limit (in chars).
pub fn validate_text_len(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    match value {
        Some(v) => validate_text_len(v, field, max_len),
        None => Ok(()),
    }
}

/// Length checks for a create / edit payload
pub fn validate_submission(submission: &IssueSubmission) -> Result<(), AppError> {
    validate_text_len(&submission.description, "description", MAX_DESCRIPTION_LEN)?;
    let address = &submission.address;
    validate_text_len(&address.city, "city", MAX_ADDRESS_FIELD_LEN)?;
    validate_text_len(&address.state, "state", MAX_ADDRESS_FIELD_LEN)?;
    validate_text_len(&address.district, "district", MAX_ADDRESS_FIELD_LEN)?;
    validate_text_len(&address.postal_code, "postalCode", MAX_ADDRESS_FIELD_LEN)?;
    Ok(())
}

/// Length checks for a login payload
pub fn validate_login(request: &LoginRequest) -> Result<(), AppError> {
    validate_text_len(&request.email, "email", MAX_EMAIL_LEN)?;
    validate_optional_text(&request.name, "name", MAX_NAME_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    #[test]
    fn rejects_overlong_description() {
        let submission = IssueSubmission {
            description: "x".repeat(MAX_DESCRIPTION_LEN + 1),
            ..Default::default()
        };
        let err = validate_submission(&submission).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn counts_chars_not_bytes() {
        let name = "é".repeat(MAX_NAME_LEN);
        assert!(validate_text_len(&name, "name", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn optional_none_is_ok() {
        assert!(validate_optional_text(&None, "name", 1).is_ok());
        assert!(validate_optional_text(&Some("ab".into()), "name", 1).is_err());
    }
}
