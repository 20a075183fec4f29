//! Short code generation.
//!
//! Codes are drawn from the operating system CSPRNG so they cannot be guessed
//! from previously issued ones.

use crate::error::AppError;
use serde_json::json;

/// Alphabet used for generated short codes.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of codes issued by [`crate::application::services::LinkService`].
pub const SHORT_CODE_LENGTH: usize = 6;

/// Largest multiple of the alphabet size that fits in a byte.
///
/// Bytes at or above this value are discarded so that every character is
/// equally likely.
const REJECTION_THRESHOLD: u8 = (256 / ALPHABET.len() * ALPHABET.len()) as u8;

/// Random bytes fetched from the OS per refill.
const ENTROPY_CHUNK: usize = 32;

/// Generates a random short code of `length` characters.
///
/// # Errors
///
/// Returns [`AppError::InvalidArgument`] if `length` is zero, and
/// [`AppError::RandomSource`] if the system entropy source cannot be read.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(6)?;
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code(length: usize) -> Result<String, AppError> {
    if length == 0 {
        return Err(AppError::invalid_argument(
            "Short code length must be greater than zero",
            json!({ "length": length }),
        ));
    }

    let mut code = String::with_capacity(length);
    let mut buffer = [0u8; ENTROPY_CHUNK];

    while code.len() < length {
        getrandom::fill(&mut buffer).map_err(|e| AppError::RandomSource(e.to_string()))?;

        for byte in buffer.iter().copied().filter(|b| *b < REJECTION_THRESHOLD) {
            code.push(char::from(ALPHABET[usize::from(byte) % ALPHABET.len()]));

            if code.len() == length {
                break;
            }
        }
    }

    Ok(code)
}
