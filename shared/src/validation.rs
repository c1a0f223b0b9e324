//! Input validation functions
//!
//! Field-level checks that the `validator` derive cannot express. Struct-level
//! length checks live on the request types themselves.

use crate::errors::ValidationError;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;
/// Maximum accepted password length
pub const MAX_PASSWORD_LEN: usize = 128;

/// Validate a phone number used as login identifier
///
/// Digits only, with an optional leading `+`.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    if digits.is_empty() {
        return Err(ValidationError::new("phone", "Phone cannot be empty"));
    }
    if digits.len() > 20 {
        return Err(ValidationError::new("phone", "Phone too long"));
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("phone", "Phone must contain digits only"));
    }
    Ok(())
}

/// Validate password length
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::new(
            "password",
            "Password must be at least 6 characters",
        ));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(ValidationError::new("password", "Password too long"));
    }
    Ok(())
}

/// Validate a role name
pub fn validate_role(role: &str) -> Result<(), ValidationError> {
    if role.is_empty() {
        return Err(ValidationError::new("roles", "Role cannot be empty"));
    }
    if role.len() > 64 || role.chars().any(char::is_whitespace) {
        return Err(ValidationError::new("roles", "Invalid role name"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("555", true)]
    #[case("+992900000000", true)]
    #[case("", false)]
    #[case("+", false)]
    #[case("555-12", false)]
    #[case("12345678901234567890", true)]
    #[case("123456789012345678901", false)]
    fn test_validate_phone(#[case] phone: &str, #[case] valid: bool) {
        assert_eq!(validate_phone(phone).is_ok(), valid, "phone {:?}", phone);
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"a".repeat(129)).is_err());
    }

    #[test]
    fn test_validate_role() {
        assert!(validate_role("ADMIN").is_ok());
        assert!(validate_role("").is_err());
        assert!(validate_role("two words").is_err());
    }

    proptest! {
        #[test]
        fn prop_digit_strings_are_valid_phones(phone in "[0-9]{1,20}") {
            prop_assert!(validate_phone(&phone).is_ok());
        }

        #[test]
        fn prop_letters_are_rejected(phone in "[0-9]{0,5}[a-z]{1,5}[0-9]{0,5}") {
            prop_assert!(validate_phone(&phone).is_err());
        }
    }
}
