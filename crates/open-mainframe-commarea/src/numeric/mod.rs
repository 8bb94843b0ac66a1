//! Numeric storage formats used by copybook fields.
//!
//! - **Zoned decimal (DISPLAY)**: one character per digit, translated
//!   through the character tables
//! - **Packed decimal (COMP-3)**: two digits per byte, sign in the last nibble
//! - **Binary (COMP)**: big-endian halfword, fullword or doubleword
//!
//! All conversions work on `i64` and report errors against the field
//! descriptor they were called for.

mod binary;
mod packed;
mod zoned;

pub use binary::{decode_binary, encode_binary};
pub use packed::{pack, unpack, NEGATIVE_SIGN, POSITIVE_SIGN};
pub use zoned::{unzone, zone};

/// Number of decimal digits in the magnitude of `value`.
pub(crate) fn digit_count(value: i64) -> usize {
    let mut v = value.unsigned_abs();
    let mut count = 1;
    while v >= 10 {
        v /= 10;
        count += 1;
    }
    count
}
