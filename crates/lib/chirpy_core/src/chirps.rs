//! Chirp body validation and censorship.

use thiserror::Error;

/// Maximum chirp length, in characters.
pub const MAX_CHIRP_LENGTH: usize = 140;

/// Words replaced by [`CENSOR_MASK`], matched case-insensitively.
const PROFANE_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

const CENSOR_MASK: &str = "****";

/// Chirp validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChirpError {
    #[error("Chirp is too long")]
    TooLong,
}

/// Validate a chirp body and return it with profane words masked.
///
/// Words are the pieces between single spaces, so punctuation attached to a
/// word (`"kerfuffle!"`) keeps it from matching.
pub fn validate_chirp(body: &str) -> Result<String, ChirpError> {
    if body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(ChirpError::TooLong);
    }
    Ok(censor(body))
}

fn censor(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            if PROFANE_WORDS.contains(&word.to_lowercase().as_str()) {
                CENSOR_MASK
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
