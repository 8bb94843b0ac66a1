//! Zoned decimal (DISPLAY) fields.
//!
//! Each digit is stored as its mainframe character. A signed field
//! (`S9(n)`) carries one extra leading position for the sign, so
//! `-123` in `S9(5)` reads `-00123` once translated.

use crate::ebcdic::{to_mainframe, to_portable};
use crate::error::CodecError;
use crate::numeric::digit_count;
use crate::picture::FieldDescriptor;
use crate::Result;

/// Decode zoned decimal bytes to an integer.
///
/// NUL and blank positions read as `0`, since mainframe programs often
/// leave unused high-order positions blank.
///
/// # Errors
/// Returns `CodecError::MalformedNumeric` when the translated text is not
/// a decimal integer.
pub fn unzone(field: &FieldDescriptor, bytes: &[u8]) -> Result<i64> {
    let text: String = bytes
        .iter()
        .map(|&b| match to_portable(b) {
            0x00 | b' ' => '0',
            c => char::from(c),
        })
        .collect();
    text.parse::<i64>()
        .map_err(|_| CodecError::malformed(&field.name, text))
}

/// Encode an integer as zoned decimal bytes of exactly `storage_width`.
///
/// Unsigned fields store the magnitude of the value.
///
/// # Errors
/// Returns `CodecError::ValueTooLarge` when the value needs more digits
/// than the field declares.
pub fn zone(field: &FieldDescriptor, value: i64) -> Result<Vec<u8>> {
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

    let text = if field.signed {
        format!("{:0width$}", value, width = field.storage_width)
    } else {
        format!("{:0width$}", value.unsigned_abs(), width = field.declared_width)
    };
    Ok(text.bytes().map(to_mainframe).collect())
}
