//! Packed decimal (COMP-3) fields.
//!
//! Two digits per byte, most significant first. The final byte holds the
//! last digit in its high nibble and the sign in its low nibble.
//!
//! Example: -245 in `COMP-3(3)` is `0x24 0x5D`.

use crate::error::CodecError;
use crate::numeric::digit_count;
use crate::picture::FieldDescriptor;
use crate::Result;

/// Sign nibble written for zero and positive values.
pub const POSITIVE_SIGN: u8 = 0x0C;
/// Sign nibble that marks a negative value.
pub const NEGATIVE_SIGN: u8 = 0x0D;

/// Decode packed decimal bytes to an integer.
///
/// Any sign nibble other than `0xD` reads as non-negative.
///
/// # Errors
/// Returns `CodecError::MalformedNumeric` when a digit nibble is above 9
/// or the digits overflow an `i64`.
pub fn unpack(field: &FieldDescriptor, bytes: &[u8]) -> Result<i64> {
    let Some((&last, body)) = bytes.split_last() else {
        return Err(CodecError::malformed(&field.name, ""));
    };

    let mut text = String::with_capacity(bytes.len() * 2 + 1);
    if last & 0x0F == NEGATIVE_SIGN {
        text.push('-');
    }
    for &byte in body {
        text.push(nibble_char(byte >> 4));
        text.push(nibble_char(byte & 0x0F));
    }
    text.push(nibble_char(last >> 4));

    text.parse::<i64>()
        .map_err(|_| CodecError::malformed(&field.name, text))
}

/// Encode an integer as packed decimal bytes of exactly `storage_width`.
///
/// # Errors
/// Returns `CodecError::ValueTooLarge` when the value needs more digits
/// than the field declares.
pub fn pack(field: &FieldDescriptor, value: i64) -> Result<Vec<u8>> {
    let digits = digit_count(value);
    if digits > field.declared_width {
        return Err(CodecError::too_large(
            &field.name,
            format!(
                "{} requires {} digits but only {} available",
                value, digits, field.declared_width
            ),
        ));
    }

    let width = field.storage_width;
    let mut result = vec![0u8; width];
    let sign = if value < 0 { NEGATIVE_SIGN } else { POSITIVE_SIGN };

    // least significant digit first
    let magnitude = value.unsigned_abs().to_string();
    let mut nibbles = magnitude.bytes().rev().map(|d| d - b'0');

    result[width - 1] = (nibbles.next().unwrap_or(0) << 4) | sign;
    for byte in result[..width - 1].iter_mut().rev() {
        let low = nibbles.next().unwrap_or(0);
        let high = nibbles.next().unwrap_or(0);
        *byte = (high << 4) | low;
    }

    Ok(result)
}

/// Render a nibble the way the digit string is assembled. Nibbles above
/// 9 become non-digit characters and fail to parse.
fn nibble_char(nibble: u8) -> char {
    char::from(b'0' + (nibble & 0x0F))
}
