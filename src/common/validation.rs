// src/common/validation.rs

use validator::ValidationError;

/// Rejects values that are empty once surrounding whitespace is removed.
/// Handlers trim before storing, so `length(min = 1)` alone lets `"  "` through.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("This field cannot be blank.".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn blank_values_are_rejected(#[case] value: &str) {
        let err = validate_not_blank(value).unwrap_err();
        assert_eq!(err.code, "blank");
    }

    #[test]
    fn padded_values_pass() {
        assert!(validate_not_blank("  LOC-001 ").is_ok());
    }
}
