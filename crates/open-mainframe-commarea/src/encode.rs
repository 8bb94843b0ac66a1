//! Commarea encoding: a live record into mainframe bytes.

use tracing::{debug, trace};

use crate::decode::slot_mismatch;
use crate::ebcdic::{encode_char, to_mainframe, MAINFRAME_BLANK};
use crate::error::CodecError;
use crate::numeric::{encode_binary, pack, zone};
use crate::picture::{FieldDescriptor, FieldKind};
use crate::record::{Copybook, Record, Slot};
use crate::schema::walker::{walk, Visitor};
use crate::schema::Schema;
use crate::Result;

/// Encode `record` into its wire layout.
///
/// The output is exactly as long as the layout of this record instance.
/// Repeated group counts are taken from the record as populated by the
/// caller; the encoder never fills them in.
///
/// # Errors
/// Returns `CodecError::ValueTooLarge` when a value does not fit its
/// field, `CodecError::CountMismatch` when a repeated group disagrees with
/// its count field, and `CodecError::InvalidSchema` for an unusable
/// layout.
pub fn encode<R: Copybook>(record: &R) -> Result<Vec<u8>> {
    let schema = R::schema()?;
    encode_with(&schema, record)
}

/// Wire size of `record`, including every repeated group element.
///
/// # Errors
/// Same layout errors as [`encode`].
pub fn encoded_size<R: Copybook>(record: &R) -> Result<usize> {
    let schema = R::schema()?;
    if let Some(size) = schema.fixed_size() {
        return Ok(size);
    }
    let mut sizer = Sizer(0);
    walk(&schema, record, &mut sizer)?;
    Ok(sizer.0)
}

pub(crate) fn encode_with(schema: &Schema, record: &dyn Record) -> Result<Vec<u8>> {
    let mut encoder = Encoder {
        out: Vec::with_capacity(schema.fixed_size().unwrap_or(0)),
    };
    walk(schema, record, &mut encoder)?;
    debug!(
        record = schema.record_name(),
        length = encoder.out.len(),
        "encoded commarea"
    );
    Ok(encoder.out)
}

struct Encoder {
    out: Vec<u8>,
}

impl Visitor for Encoder {
    fn visit_field(&mut self, field: &FieldDescriptor, slot: Slot<'_>) -> Result<()> {
        let offset = self.out.len();
        let bytes = match field.kind {
            FieldKind::Alphanumeric => encode_text(field, slot)?,
            FieldKind::ZonedDecimal => zone(field, load_int(field, slot)?)?,
            FieldKind::PackedDecimal => pack(field, load_int(field, slot)?)?,
            FieldKind::Binary => encode_binary(field, load_int(field, slot)?)?,
        };
        debug_assert_eq!(bytes.len(), field.storage_width);
        self.out.extend_from_slice(&bytes);

        trace!(field = %field.name, kind = %field.kind, offset, width = field.storage_width, "encoded field");
        Ok(())
    }
}

struct Sizer(usize);

impl Visitor for Sizer {
    fn visit_field(&mut self, field: &FieldDescriptor, _slot: Slot<'_>) -> Result<()> {
        self.0 += field.storage_width;
        Ok(())
    }
}

fn encode_text(field: &FieldDescriptor, slot: Slot<'_>) -> Result<Vec<u8>> {
    let width = field.storage_width;
    let mut bytes = Vec::with_capacity(width);
    match slot {
        Slot::Text(text) => {
            for ch in text.chars() {
                if bytes.len() == width {
                    return Err(CodecError::too_large(
                        &field.name,
                        format!("'{}' is longer than {} characters", text, width),
                    ));
                }
                let byte = encode_char(ch).ok_or_else(|| CodecError::UnmappableCharacter {
                    field: field.name.clone(),
                    ch,
                })?;
                bytes.push(byte);
            }
        }
        Slot::Bytes(raw) if raw.len() == width => {
            bytes.extend(raw.iter().map(|&b| to_mainframe(b)));
        }
        Slot::Char(byte) if width == 1 => bytes.push(to_mainframe(byte)),
        other => return Err(slot_mismatch(field, other.type_name())),
    }
    bytes.resize(width, MAINFRAME_BLANK);
    Ok(bytes)
}

fn load_int(field: &FieldDescriptor, slot: Slot<'_>) -> Result<i64> {
    match slot {
        Slot::Int(value) => value.get().ok_or_else(|| {
            CodecError::too_large(&field.name, "value exceeds the 64-bit signed range")
        }),
        other => Err(slot_mismatch(field, other.type_name())),
    }
}
