//! Chirp body rules.

/// Longest accepted chirp, in characters.
pub const MAX_CHIRP_LENGTH: usize = 140;

const BANNED_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

const MASK: &str = "****";

/// True if the body fits in a chirp.
pub fn within_limit(body: &str) -> bool {
    body.chars().count() <= MAX_CHIRP_LENGTH
}

/// Mask banned words.
///
/// Words are split on single spaces and matched case-insensitively as whole
/// words, so `Kerfuffle!` survives but `KERFUFFLE` does not.
pub fn clean_chirp(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            let lower = word.to_lowercase();
            if BANNED_WORDS.contains(&lower.as_str()) {
                MASK
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
