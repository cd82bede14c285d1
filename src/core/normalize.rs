//! Query normalization for exact-match detection.
//!
//! A term is packed into a fixed buffer of eight code points (zero padded on
//! the right) and unpacked again. Terms longer than the buffer cannot equal
//! any catalog glyph, so they simply have no exact key.

use crate::error::NormalizeError;
use crate::services::catalog::MAX_CODE_POINTS;

/// Fixed-width code-point buffer. Zero slots are padding.
pub type CodePoints = [u32; MAX_CODE_POINTS];

/// Pack `input` into eight code-point slots.
pub fn encode_code_points(input: &str) -> Result<CodePoints, NormalizeError> {
    let len = input.chars().count();
    if len > MAX_CODE_POINTS {
        return Err(NormalizeError::TooLong { len });
    }

    let mut slots = [0u32; MAX_CODE_POINTS];
    for (slot, c) in slots.iter_mut().zip(input.chars()) {
        *slot = c as u32;
    }
    Ok(slots)
}

/// Reassemble a string from slots, skipping padding.
pub fn decode_code_points(slots: &CodePoints) -> String {
    slots
        .iter()
        .filter(|&&cp| cp != 0)
        .filter_map(|&cp| char::from_u32(cp))
        .collect()
}

/// The term as it would be compared against catalog glyphs, or `None` when
/// no exact match is possible.
pub fn exact_key(term: &str) -> Option<String> {
    if term.is_empty() {
        return None;
    }
    match encode_code_points(term) {
        Ok(slots) => Some(decode_code_points(&slots)),
        Err(e) => {
            tracing::trace!("No exact key: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_is_identity() {
        for s in ["", "a", "😀", "🏳️", "👋🏽", "👨‍👩‍👧‍👦", "grinning", "🏴\u{E0067}\u{E0062}\u{E0065}\u{E006E}\u{E0067}\u{E007F}"] {
            assert_eq!(decode_code_points(&encode_code_points(s).unwrap()), s);
        }
    }

    #[test]
    fn test_padding_is_zero() {
        let slots = encode_code_points("😀").unwrap();
        assert_eq!(slots[0], 0x1F600);
        assert!(slots[1..].iter().all(|&cp| cp == 0));
    }

    #[test]
    fn test_too_long() {
        assert_eq!(
            encode_code_points("grinning face"),
            Err(NormalizeError::TooLong { len: 13 })
        );
        // Exactly eight is fine, nine is not
        assert!(encode_code_points("12345678").is_ok());
        assert!(encode_code_points("123456789").is_err());
    }

    #[test]
    fn test_exact_key_swallows_too_long() {
        assert_eq!(exact_key("😀").as_deref(), Some("😀"));
        assert_eq!(exact_key("a much longer search term"), None);
        assert_eq!(exact_key(""), None);
    }
}
