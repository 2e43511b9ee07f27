//! Reversible registration-token codec.
//!
//! A registration token is the participant's email address, lowercased and
//! URL-safe base64 encoded. It exists so the confirmation page shown right
//! after submission can look the registration back up without a login.
//!
//! This is NOT a security credential: the encoding is reversible by design
//! and must never gate admin or cross-session access.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use thiserror::Error;

/// Errors produced when decoding a registration token.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("Token does not decode to UTF-8 text")]
    NotUtf8,

    #[error("Token does not decode to an email address")]
    NotAnEmail,
}

/// Encodes an email address into a registration token.
///
/// The email is trimmed and lowercased first, so the token is deterministic
/// for any casing the client submits. The round trip therefore yields the
/// normalized form: `decode_email(&encode_email(e))` equals
/// `e.trim().to_lowercase()`, which is exactly the key used for duplicate
/// comparisons and storage lookups.
pub fn encode_email(email: &str) -> String {
    URL_SAFE_NO_PAD.encode(email.trim().to_lowercase())
}

/// Decodes a registration token back into the email it was issued for,
/// in its normalized (trimmed, lowercased) form.
pub fn decode_email(token: &str) -> Result<String, TokenError> {
    let bytes = URL_SAFE_NO_PAD.decode(token.trim())?;
    let email = String::from_utf8(bytes).map_err(|_| TokenError::NotUtf8)?;
    if email.contains('@') {
        Ok(email)
    } else {
        Err(TokenError::NotAnEmail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let email = "alice@du.ac.in";
        let token = encode_email(email);
        assert_eq!(decode_email(&token).unwrap(), email);
    }

    #[test]
    fn test_round_trip_normalizes_casing() {
        // Mixed-case input decodes to the normalized comparison key.
        let token = encode_email("  Alice@DU.AC.IN ");
        assert_eq!(decode_email(&token).unwrap(), "alice@du.ac.in");
    }

    #[test]
    fn test_deterministic_across_casing() {
        assert_eq!(encode_email("Alice@DU.AC.IN"), encode_email("alice@du.ac.in"));
        assert_eq!(encode_email(" alice@du.ac.in "), encode_email("alice@du.ac.in"));
    }

    #[test]
    fn test_token_is_url_safe() {
        let token = encode_email("user+tag@example.com");
        assert!(!token.contains('+'));
        assert!(!token.contains('/'));
        assert!(!token.contains('='));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_email("%%%not-base64%%%"),
            Err(TokenError::Encoding(_))
        ));
    }

    #[test]
    fn test_decode_rejects_non_email_payload() {
        let token = URL_SAFE_NO_PAD.encode("just-a-string");
        assert!(matches!(decode_email(&token), Err(TokenError::NotAnEmail)));
    }

    #[test]
    fn test_decode_rejects_non_utf8() {
        let token = URL_SAFE_NO_PAD.encode([0xff, 0xfe, 0x40]);
        assert!(matches!(decode_email(&token), Err(TokenError::NotUtf8)));
    }
}
