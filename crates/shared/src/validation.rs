//! Common validation utilities for participant fields.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

/// Institutional email domains accepted on the allow-list.
///
/// An address is accepted when its domain equals one of these suffixes or is
/// a subdomain of one (e.g. `student.du.ac.in`).
const INSTITUTIONAL_DOMAINS: &[&str] = &["du.ac.in", "dtu.ac.in", "ipu.ac.in", "nsut.ac.in"];

lazy_static! {
    static ref GENERIC_EMAIL_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$").unwrap();
    static ref MOBILE_REGEX: Regex = Regex::new(r"^[6-9][0-9]{9}$").unwrap();
}

/// Validates an email address against the institutional allow-list or the
/// generic `user@domain.tld` pattern.
pub fn validate_email_address(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        let mut err = ValidationError::new("email_required");
        err.message = Some("Email is required".into());
        return Err(err);
    }

    if is_institutional_email(email) || GENERIC_EMAIL_REGEX.is_match(email) {
        Ok(())
    } else {
        let mut err = ValidationError::new("email_format");
        err.message = Some("Enter a valid email address".into());
        Err(err)
    }
}

/// Returns true when the address has a well-formed local part and a domain
/// on the institutional allow-list.
pub fn is_institutional_email(email: &str) -> bool {
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };
    if local.is_empty() || local.contains(char::is_whitespace) {
        return false;
    }
    let domain = domain.to_ascii_lowercase();
    INSTITUTIONAL_DOMAINS
        .iter()
        .any(|allowed| domain == *allowed || domain.ends_with(&format!(".{}", allowed)))
}

/// Validates a 10-digit mobile number in the national format
/// (first digit 6-9).
pub fn validate_mobile_number(phone: &str) -> Result<(), ValidationError> {
    if MOBILE_REGEX.is_match(phone.trim()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("mobile_format");
        err.message = Some("Mobile number must be 10 digits starting with 6-9".into());
        Err(err)
    }
}

/// Validates that a string is non-empty after trimming.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("This field is required".into());
        Err(err)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_institutional_email_accepted() {
        assert!(validate_email_address("alice@du.ac.in").is_ok());
        assert!(validate_email_address("bob.kumar@student.du.ac.in").is_ok());
        assert!(validate_email_address("carol@dtu.ac.in").is_ok());
    }

    #[test]
    fn test_generic_email_accepted() {
        assert!(validate_email_address("someone@gmail.com").is_ok());
        assert!(validate_email_address("a.b+tag@example.co.uk").is_ok());
    }

    #[test]
    fn test_malformed_email_rejected() {
        assert!(validate_email_address("").is_err());
        assert!(validate_email_address("not-an-email").is_err());
        assert!(validate_email_address("missing@domain").is_err());
        assert!(validate_email_address("@du.ac.in").is_err());
    }

    #[test]
    fn test_email_required_message() {
        let err = validate_email_address("   ").unwrap_err();
        assert_eq!(err.message.unwrap().to_string(), "Email is required");
    }

    #[test]
    fn test_is_institutional_email_subdomains() {
        assert!(is_institutional_email("x@du.ac.in"));
        assert!(is_institutional_email("x@cs.du.ac.in"));
        assert!(!is_institutional_email("x@du.ac.in.evil.com"));
        assert!(!is_institutional_email("x@gmail.com"));
    }

    #[test]
    fn test_valid_mobile_numbers() {
        assert!(validate_mobile_number("9876543210").is_ok());
        assert!(validate_mobile_number("6000000000").is_ok());
        assert!(validate_mobile_number(" 7012345678 ").is_ok());
    }

    #[test]
    fn test_invalid_mobile_numbers() {
        // Wrong first digit
        assert!(validate_mobile_number("5876543210").is_err());
        // Too short / too long
        assert!(validate_mobile_number("987654321").is_err());
        assert!(validate_mobile_number("98765432100").is_err());
        // Non-digits
        assert!(validate_mobile_number("98765abc10").is_err());
        assert!(validate_mobile_number("").is_err());
    }

    #[test]
    fn test_mobile_error_message() {
        let err = validate_mobile_number("12345").unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Mobile number must be 10 digits starting with 6-9"
        );
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("x").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   ").is_err());
    }
}
