//! Commarea decoding: mainframe bytes into a live record.

use tracing::{debug, trace};

use crate::ebcdic::{decode_text, portable_to_string, trim_trailing_blanks};
use crate::error::CodecError;
use crate::numeric::{decode_binary, unpack, unzone};
use crate::picture::{FieldDescriptor, FieldKind};
use crate::record::{Copybook, Record, SlotMut};
use crate::schema::walker::{walk_mut, VisitorMut};
use crate::schema::Schema;
use crate::Result;

/// Decode a new record of type `R` from `buffer`.
///
/// Bytes past the end of the layout are ignored.
///
/// # Errors
/// Returns `CodecError::TruncatedInput` when the buffer is shorter than
/// the layout, `CodecError::MalformedNumeric` for unparsable numeric
/// data, and `CodecError::InvalidSchema` for an unusable layout.
pub fn decode<R: Copybook>(buffer: &[u8]) -> Result<R> {
    let schema = R::schema()?;
    let mut record = R::default();
    decode_with(&schema, buffer, &mut record)?;
    Ok(record)
}

/// Decode `buffer` into a caller-owned record.
///
/// Returns the number of bytes consumed. On error `record` is left as
/// it was.
///
/// # Errors
/// Same as [`decode`].
pub fn decode_into<R: Copybook>(buffer: &[u8], record: &mut R) -> Result<usize> {
    let schema = R::schema()?;
    let mut fresh = R::default();
    let consumed = decode_with(&schema, buffer, &mut fresh)?;
    *record = fresh;
    Ok(consumed)
}

/// Decode against an already built schema. Returns bytes consumed.
pub(crate) fn decode_with(schema: &Schema, buffer: &[u8], record: &mut dyn Record) -> Result<usize> {
    let mut decoder = Decoder { buffer, cursor: 0 };
    walk_mut(schema, record, &mut decoder)?;
    debug!(
        record = schema.record_name(),
        consumed = decoder.cursor,
        available = buffer.len(),
        "decoded commarea"
    );
    Ok(decoder.cursor)
}

/// Single-pass reader over the input buffer.
struct Decoder<'b> {
    buffer: &'b [u8],
    cursor: usize,
}

impl<'b> Decoder<'b> {
    /// Take the next `storage_width` bytes.
    fn take(&mut self, field: &FieldDescriptor) -> Result<&'b [u8]> {
        let available = self.buffer.len() - self.cursor;
        if field.storage_width > available {
            return Err(CodecError::TruncatedInput {
                field: field.name.clone(),
                needed: field.storage_width,
                available,
            });
        }
        let bytes = &self.buffer[self.cursor..self.cursor + field.storage_width];
        self.cursor += field.storage_width;
        Ok(bytes)
    }
}

impl VisitorMut for Decoder<'_> {
    fn visit_field(&mut self, field: &FieldDescriptor, slot: SlotMut<'_>) -> Result<()> {
        let offset = self.cursor;
        let bytes = self.take(field)?;

        match field.kind {
            FieldKind::Alphanumeric => store_text(field, bytes, slot)?,
            FieldKind::ZonedDecimal => store_int(field, unzone(field, bytes)?, slot)?,
            FieldKind::PackedDecimal => store_int(field, unpack(field, bytes)?, slot)?,
            FieldKind::Binary => store_int(field, decode_binary(field, bytes)?, slot)?,
        }

        trace!(field = %field.name, kind = %field.kind, offset, width = field.storage_width, "decoded field");
        Ok(())
    }

    fn begin_occurs(&mut self, field: &str, count: usize, element: &Schema) -> Result<()> {
        // every element takes at least min_size bytes
        let available = self.buffer.len() - self.cursor;
        let needed = count.checked_mul(element.min_size());
        match needed {
            Some(needed) if needed <= available => Ok(()),
            _ => Err(CodecError::TruncatedInput {
                field: field.to_string(),
                needed: needed.unwrap_or(usize::MAX),
                available,
            }),
        }
    }
}

fn store_text(field: &FieldDescriptor, bytes: &[u8], slot: SlotMut<'_>) -> Result<()> {
    let portable = decode_text(bytes);
    match slot {
        SlotMut::Text(target) => {
            *target = portable_to_string(trim_trailing_blanks(&portable));
        }
        SlotMut::Bytes(target) if target.len() == portable.len() => {
            target.copy_from_slice(&portable);
        }
        SlotMut::Char(target) if portable.len() == 1 => {
            *target = portable[0];
        }
        other => return Err(slot_mismatch(field, other.type_name())),
    }
    Ok(())
}

fn store_int(field: &FieldDescriptor, value: i64, slot: SlotMut<'_>) -> Result<()> {
    match slot {
        SlotMut::Int(target) => {
            if target.set(value) {
                Ok(())
            } else {
                Err(CodecError::malformed(&field.name, value.to_string()))
            }
        }
        other => Err(slot_mismatch(field, other.type_name())),
    }
}

pub(crate) fn slot_mismatch(field: &FieldDescriptor, slot: &str) -> CodecError {
    CodecError::schema(format!(
        "{} field {} ({} bytes) cannot be stored as {}",
        field.kind, field.name, field.storage_width, slot
    ))
}
