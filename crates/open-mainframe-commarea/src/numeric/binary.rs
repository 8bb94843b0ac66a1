//! Binary (COMP) fields.
//!
//! Big-endian integers in a halfword, fullword or doubleword. Signed
//! fields use two's complement; unsigned fields hold non-negative values
//! only. Binary data is never character-translated.

use crate::error::CodecError;
use crate::picture::FieldDescriptor;
use crate::Result;

/// Decode big-endian binary bytes to an integer.
///
/// # Errors
/// Returns `CodecError::InvalidSchema` for a width other than 2, 4 or 8,
/// and `CodecError::MalformedNumeric` for an unsigned doubleword above
/// `i64::MAX`.
pub fn decode_binary(field: &FieldDescriptor, bytes: &[u8]) -> Result<i64> {
    let value = match (bytes.len(), field.signed) {
        (2, true) => i64::from(i16::from_be_bytes([bytes[0], bytes[1]])),
        (2, false) => i64::from(u16::from_be_bytes([bytes[0], bytes[1]])),
        (4, true) => i64::from(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])),
        (4, false) => i64::from(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])),
        (8, signed) => {
            let mut word = [0u8; 8];
            word.copy_from_slice(bytes);
            if signed {
                i64::from_be_bytes(word)
            } else {
                let unsigned = u64::from_be_bytes(word);
                i64::try_from(unsigned)
                    .map_err(|_| CodecError::malformed(&field.name, unsigned.to_string()))?
            }
        }
        (len, _) => {
            return Err(CodecError::schema(format!(
                "binary field {} has unsupported width {}",
                field.name, len
            )))
        }
    };
    Ok(value)
}

/// Encode an integer as `storage_width` big-endian bytes.
///
/// # Errors
/// Returns `CodecError::ValueTooLarge` when the value is outside the
/// range of the storage width (or negative for an unsigned field).
pub fn encode_binary(field: &FieldDescriptor, value: i64) -> Result<Vec<u8>> {
    let out_of_range = || {
        CodecError::too_large(
            &field.name,
            format!(
                "{} does not fit {} {}-byte binary",
                value,
                if field.signed { "signed" } else { "unsigned" },
                field.storage_width
            ),
        )
    };

    let bytes = match (field.storage_width, field.signed) {
        (2, true) => i16::try_from(value).map_err(|_| out_of_range())?.to_be_bytes().to_vec(),
        (2, false) => u16::try_from(value).map_err(|_| out_of_range())?.to_be_bytes().to_vec(),
        (4, true) => i32::try_from(value).map_err(|_| out_of_range())?.to_be_bytes().to_vec(),
        (4, false) => u32::try_from(value).map_err(|_| out_of_range())?.to_be_bytes().to_vec(),
        (8, true) => value.to_be_bytes().to_vec(),
        (8, false) => u64::try_from(value).map_err(|_| out_of_range())?.to_be_bytes().to_vec(),
        (width, _) => {
            return Err(CodecError::schema(format!(
                "binary field {} has unsupported width {}",
                field.name, width
            )))
        }
    };
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(tag: &str) -> FieldDescriptor {
        FieldDescriptor::parse(tag, "count").unwrap()
    }

    #[test]
    fn test_halfword() {
        let f = field("COMP(4)");
        assert_eq!(encode_binary(&f, 258).unwrap(), vec![0x01, 0x02]);
        assert_eq!(decode_binary(&f, &[0xFF, 0xFF]).unwrap(), 65535);
    }

    #[test]
    fn test_signed_halfword_twos_complement() {
        let f = field("S9(4)COMP");
        assert_eq!(encode_binary(&f, -2).unwrap(), vec![0xFF, 0xFE]);
        assert_eq!(decode_binary(&f, &[0xFF, 0xFE]).unwrap(), -2);
    }

    #[test]
    fn test_fullword() {
        let f = field("COMP(7)");
        let bytes = encode_binary(&f, 1_000_000).unwrap();
        assert_eq!(bytes, vec![0x00, 0x0F, 0x42, 0x40]);
        assert_eq!(decode_binary(&f, &bytes).unwrap(), 1_000_000);
    }

    #[test]
    fn test_doubleword() {
        let f = field("S9(12)COMP");
        let bytes = encode_binary(&f, -123_456_789_012).unwrap();
        assert_eq!(bytes.len(), 8);
        assert_eq!(decode_binary(&f, &bytes).unwrap(), -123_456_789_012);
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(
            encode_binary(&field("COMP(4)"), 70_000).unwrap_err(),
            CodecError::ValueTooLarge { .. }
        ));
        assert!(matches!(
            encode_binary(&field("COMP(4)"), -1).unwrap_err(),
            CodecError::ValueTooLarge { .. }
        ));
    }

    #[test]
    fn test_unsigned_doubleword_overflow() {
        let err = decode_binary(&field("COMP(18)"), &[0xFF; 8]).unwrap_err();
        assert!(matches!(err, CodecError::MalformedNumeric { .. }));
    }
}
