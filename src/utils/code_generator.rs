//! Short code generation and validation utilities.

use crate::error::AppError;
use rand::Rng;
use serde_json::json;

/// Length of generated short codes.
const CODE_LENGTH: usize = 8;

/// Alphabet for generated codes. Lowercase only, because lookups case-fold
/// the incoming code before matching.
const CODE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Reserved codes that cannot be used as short links.
///
/// These collide with system route prefixes.
const RESERVED_CODES: &[&str] = &["s", "auth", "pvt", "health", "static"];

/// Generates a random 8-character short code from `[a-z0-9]`.
///
/// Collision probability is negligible (36^8 keyspace); creation still
/// retries on collision and the store enforces uniqueness as the final
/// arbiter.
pub fn generate_code() -> String {
    let mut rng = rand::rng();

    (0..CODE_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..CODE_ALPHABET.len());
            CODE_ALPHABET[idx] as char
        })
        .collect()
}

/// Validates a user-provided custom short code.
///
/// # Rules
///
/// - Length: 3-30 characters
/// - Allowed characters: letters, digits, hyphens, underscores
/// - Cannot be a reserved route prefix
///
/// The caller lowercases the code before storage, so validation is
/// case-insensitive.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if code.len() < 3 || code.len() > 30 {
        return Err(AppError::bad_request(
            "Custom URL must be 3-30 characters",
            json!({ "provided_length": code.len() }),
        ));
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::bad_request(
            "Custom URL can only contain letters, numbers, hyphens, or underscores",
            json!({ "code": code }),
        ));
    }

    if RESERVED_CODES.contains(&code.to_ascii_lowercase().as_str()) {
        return Err(AppError::bad_request(
            "This custom URL is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}

/// Normalizes a short code for lookup: trim surrounding whitespace and
/// case-fold.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_lowercase()
}
