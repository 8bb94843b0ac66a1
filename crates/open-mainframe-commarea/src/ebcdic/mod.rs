//! EBCDIC character translation for commarea text fields.
//!
//! Translation is position-wise through the two fixed tables in
//! [`tables`]. The only state that spans positions is the trailing
//! blank detection used when an alphanumeric field becomes a string.

mod tables;

pub use tables::{MAINFRAME_TO_PORTABLE, PORTABLE_TO_MAINFRAME};

/// Mainframe byte for the portable space character.
pub const MAINFRAME_BLANK: u8 = PORTABLE_TO_MAINFRAME[b' ' as usize];

/// Mainframe exclamation mark. Text decoding maps it to `!` even though
/// the table sends it elsewhere.
const MAINFRAME_EXCLAMATION: u8 = 0x5A;

/// Translate one mainframe byte through the table.
#[inline]
pub fn to_portable(byte: u8) -> u8 {
    MAINFRAME_TO_PORTABLE[byte as usize]
}

/// Translate one portable byte through the table.
#[inline]
pub fn to_mainframe(byte: u8) -> u8 {
    PORTABLE_TO_MAINFRAME[byte as usize]
}

/// Translate alphanumeric field bytes to portable bytes.
pub fn decode_text(bytes: &[u8]) -> Vec<u8> {
    bytes
        .iter()
        .map(|&b| {
            if b == MAINFRAME_EXCLAMATION {
                b'!'
            } else {
                to_portable(b)
            }
        })
        .collect()
}

/// Strip the trailing run of NUL and blank bytes from portable text.
pub fn trim_trailing_blanks(portable: &[u8]) -> &[u8] {
    let end = portable
        .iter()
        .rposition(|&b| b != 0x00 && b != b' ')
        .map_or(0, |pos| pos + 1);
    &portable[..end]
}

/// Build a string from portable bytes, one Latin-1 character per byte.
pub fn portable_to_string(portable: &[u8]) -> String {
    portable.iter().map(|&b| char::from(b)).collect()
}

/// Map a character to its mainframe byte.
///
/// Returns `None` for characters outside the single-byte portable range.
pub fn encode_char(ch: char) -> Option<u8> {
    u8::try_from(u32::from(ch)).ok().map(to_mainframe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_is_0x40() {
        assert_eq!(MAINFRAME_BLANK, 0x40);
        assert_eq!(to_portable(0x40), b' ');
    }

    #[test]
    fn test_letters_and_digits() {
        assert_eq!(to_mainframe(b'A'), 0xC1);
        assert_eq!(to_mainframe(b'J'), 0xD1);
        assert_eq!(to_mainframe(b'a'), 0x81);
        for (i, digit) in (b'0'..=b'9').enumerate() {
            assert_eq!(to_mainframe(digit), 0xF0 + i as u8);
            assert_eq!(to_portable(0xF0 + i as u8), digit);
        }
    }

    #[test]
    fn test_printable_ascii_roundtrip() {
        for b in 0x20u8..0x7F {
            assert_eq!(to_portable(to_mainframe(b)), b, "byte 0x{:02X}", b);
        }
    }

    #[test]
    fn test_tables_are_not_inverses() {
        assert_eq!(to_portable(0x05), 0x09);
        assert_eq!(to_portable(0x09), 0x09);
        assert_eq!(to_portable(0x15), 0x15);
        assert_ne!(to_mainframe(0x15), 0x15);
        // Text decoding reads 0x5A as '!', which encodes back to 0x21.
        assert_eq!(to_portable(0x5A), 0x9A);
        assert_eq!(to_mainframe(b'!'), 0x21);
    }

    #[test]
    fn test_decode_text_exclamation_override() {
        assert_eq!(decode_text(&[0xC8, 0xC9, 0x5A]), b"HI!".to_vec());
    }

    #[test]
    fn test_trim_trailing_blanks() {
        assert_eq!(trim_trailing_blanks(b"AB \0 "), b"AB");
        assert_eq!(trim_trailing_blanks(b" A B "), b" A B");
        assert_eq!(trim_trailing_blanks(b"   "), b"");
        assert_eq!(trim_trailing_blanks(b""), b"");
    }

    #[test]
    fn test_encode_char() {
        assert_eq!(encode_char('A'), Some(0xC1));
        assert_eq!(encode_char(' '), Some(0x40));
        assert_eq!(encode_char('€'), None);
    }

    #[test]
    fn test_portable_to_string_latin1() {
        assert_eq!(portable_to_string(&[0x41, 0xE9]), "Aé");
    }
}
