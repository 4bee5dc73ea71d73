//! Random token generation for short URLs

/// Alphabet used for generated tokens
pub const TOKEN_ALPHABET: &[u8; 62] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

// 6 bits cover indices 0..=63; draws >= 62 are discarded so every
// symbol keeps exactly equal selection probability (no `% 62` bias).
const INDEX_BITS: u32 = 6;
const INDEX_MASK: u64 = (1 << INDEX_BITS) - 1;
const INDICES_PER_WORD: u32 = u64::BITS / INDEX_BITS;

/// Generate a random token of `length` characters from [`TOKEN_ALPHABET`].
///
/// Each position is drawn independently and uniformly. One 64-bit random
/// word yields up to ten 6-bit indices before a new word is drawn.
pub fn generate_token(length: usize) -> String {
    let mut token = String::with_capacity(length);
    let mut word: u64 = rand::random();
    let mut remaining = INDICES_PER_WORD;

    while token.len() < length {
        if remaining == 0 {
            word = rand::random();
            remaining = INDICES_PER_WORD;
        }
        let idx = (word & INDEX_MASK) as usize;
        word >>= INDEX_BITS;
        remaining -= 1;

        if idx < TOKEN_ALPHABET.len() {
            token.push(TOKEN_ALPHABET[idx] as char);
        }
    }

    token
}
