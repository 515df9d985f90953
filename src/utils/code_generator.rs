//! Short code generation.
//!
//! Codes are the first [`CODE_LENGTH`] characters of a URL-safe base64
//! encoding of random bytes: 64^6 (about 6.9e10) possible codes. With `n`
//! live links the chance that a fresh code collides is roughly
//! `n / 6.9e10`, which is why callers still re-check existence before use.

use base64::Engine as _;

/// Length of a generated short code.
pub const CODE_LENGTH: usize = 6;

/// Random bytes drawn per code; 6 bytes encode to 8 base64 characters.
const CODE_LENGTH_BYTES: usize = 6;

/// Generates a random short code of [`CODE_LENGTH`] URL-safe characters.
///
/// # Panics
///
/// Panics if the system random number generator fails (extremely rare).
pub fn generate_code() -> String {
    let mut buffer = [0u8; CODE_LENGTH_BYTES];

    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

    let mut code = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer);
    code.truncate(CODE_LENGTH);
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_code_has_correct_length() {
        let code = generate_code();
        assert_eq!(code.len(), CODE_LENGTH);
    }

    #[test]
    fn test_generate_code_url_safe_characters() {
        let code = generate_code();
        assert!(
            code.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_generate_code_produces_unique_codes() {
        let codes: HashSet<String> = (0..1000).map(|_| generate_code()).collect();

        // 1000 draws from 6.9e10 values; a duplicate here means the RNG is broken
        assert_eq!(codes.len(), 1000);
    }
}
