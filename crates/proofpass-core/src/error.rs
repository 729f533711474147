//! Validation errors shared across the engine

use thiserror::Error;

/// Maximum length accepted for purpose and recipient labels.
pub const MAX_LABEL_LEN: usize = 256;

/// Malformed input supplied by the caller. Never retried automatically.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required attribute: {0}")]
    MissingAttribute(&'static str),

    #[error("empty {0}")]
    EmptyField(&'static str),

    #[error("{0} exceeds {MAX_LABEL_LEN} characters")]
    FieldTooLong(&'static str),

    #[error("{0} contains control characters")]
    ControlCharacters(&'static str),

    #[error("malformed proof id")]
    MalformedProofId,

    #[error("expiry does not follow issuance")]
    InvalidWindow,
}

/// Validate a purpose or recipient label: non-empty, bounded, printable.
pub fn validate_label(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    if value.len() > MAX_LABEL_LEN {
        return Err(ValidationError::FieldTooLong(field));
    }
    if value.chars().any(|c| c.is_control()) {
        return Err(ValidationError::ControlCharacters(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_labels() {
        assert!(validate_label("purpose", "bar-entry").is_ok());
        assert!(validate_label("recipient", "VenueX").is_ok());
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(
            validate_label("purpose", "   "),
            Err(ValidationError::EmptyField("purpose"))
        ));
    }

    #[test]
    fn test_rejects_oversized() {
        let long = "x".repeat(MAX_LABEL_LEN + 1);
        assert!(matches!(
            validate_label("recipient", &long),
            Err(ValidationError::FieldTooLong("recipient"))
        ));
    }

    #[test]
    fn test_rejects_control_chars() {
        assert!(matches!(
            validate_label("purpose", "bar\nentry"),
            Err(ValidationError::ControlCharacters("purpose"))
        ));
    }
}
