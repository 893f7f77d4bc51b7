//! Raw hex text decoding.

use crate::error::{Error, Result};

/// Value of a single ASCII hex digit, or `None` for anything outside `[0-9A-Fa-f]`.
pub fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        _ => None,
    }
}

/// Decode two hex digits (high nibble first) into one byte.
pub fn decode_pair(high: u8, low: u8) -> Option<u8> {
    Some((hex_value(high)? << 4) | hex_value(low)?)
}

/// Decode hex text into bytes in the order the pairs appear.
///
/// The caller is expected to have checked that `text` has an even length.
pub fn decode_pairs(text: &str) -> Result<Vec<u8>> {
    if let Some((position, ch)) = text.char_indices().find(|(_, c)| !c.is_ascii_hexdigit()) {
        return Err(Error::InvalidHexCharacter { ch, position });
    }

    // Every character is ASCII at this point, so byte pairs line up with digit pairs.
    text.as_bytes()
        .chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| {
            decode_pair(pair[0], pair[1]).ok_or(Error::InvalidHexCharacter {
                ch: pair[0] as char,
                position: i * 2,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_value_ranges() {
        assert_eq!(hex_value(b'0'), Some(0));
        assert_eq!(hex_value(b'9'), Some(9));
        assert_eq!(hex_value(b'a'), Some(10));
        assert_eq!(hex_value(b'F'), Some(15));
        assert_eq!(hex_value(b'g'), None);
        assert_eq!(hex_value(b' '), None);
    }

    #[test]
    fn test_decode_pair_mixed_case() {
        assert_eq!(decode_pair(b'd', b'E'), Some(0xDE));
        assert_eq!(decode_pair(b'0', b'1'), Some(0x01));
        assert_eq!(decode_pair(b'Z', b'1'), None);
    }

    #[test]
    fn test_decode_pairs_in_order() {
        assert_eq!(
            decode_pairs("DEADbeef").unwrap(),
            vec![0xDE, 0xAD, 0xBE, 0xEF]
        );
    }

    #[test]
    fn test_decode_pairs_reports_position() {
        match decode_pairs("00x1") {
            Err(Error::InvalidHexCharacter { ch, position }) => {
                assert_eq!(ch, 'x');
                assert_eq!(position, 2);
            }
            other => panic!("Expected InvalidHexCharacter, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_pairs_rejects_non_ascii() {
        let result = decode_pairs("é0");
        assert!(matches!(
            result,
            Err(Error::InvalidHexCharacter { ch: 'é', position: 0 })
        ));
    }
}
