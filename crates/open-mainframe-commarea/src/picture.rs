//! Field descriptors parsed from copybook type tags.
//!
//! A tag has the form `[NAME,][S]KIND[(WIDTH)]`:
//!
//! | Tag          | Kind            | Storage bytes              |
//! |--------------|-----------------|----------------------------|
//! | `X(30)`      | Alphanumeric    | 30                         |
//! | `9(5)`       | Zoned decimal   | 5                          |
//! | `S9(7)`      | Zoned decimal   | 8 (separate sign position) |
//! | `COMP-3(5)`  | Packed decimal  | 3                          |
//! | `S9(4)COMP`  | Binary          | 2                          |
//!
//! `COMP-3` is checked before `COMP`, so `COMP-3` never reads as binary.
//! A `9` picture may carry a `COMP`, `COMP-3` or `COMP-4` usage suffix;
//! anything else around the width (`V99`, editing symbols) is rejected.

use std::fmt;

use crate::error::CodecError;
use crate::Result;

/// Storage format of an elementary field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Character data, `X`.
    Alphanumeric,
    /// One digit per byte, `9`.
    ZonedDecimal,
    /// Two digits per byte plus a sign nibble, `COMP-3`.
    PackedDecimal,
    /// Big-endian integer, `COMP`.
    Binary,
}

impl FieldKind {
    /// Whether the field holds an integer.
    pub fn is_numeric(self) -> bool {
        !matches!(self, FieldKind::Alphanumeric)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FieldKind::Alphanumeric => "X",
            FieldKind::ZonedDecimal => "9",
            FieldKind::PackedDecimal => "COMP-3",
            FieldKind::Binary => "COMP",
        };
        f.write_str(s)
    }
}

/// Descriptor of one elementary field, derived from its tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Display name (tag override or upper-cased structural name).
    pub name: String,
    /// Storage format.
    pub kind: FieldKind,
    /// Digit or character count as written in the tag.
    pub declared_width: usize,
    /// Whether the tag carried a leading `S`.
    pub signed: bool,
    /// Bytes the field occupies on the wire.
    pub storage_width: usize,
}

impl FieldDescriptor {
    /// Parse a type tag for the field `structural_name`.
    ///
    /// # Errors
    /// Returns `CodecError::InvalidSchema` for a malformed width, an empty
    /// name override, or a kind this codec does not support.
    pub fn parse(tag: &str, structural_name: &str) -> Result<Self> {
        let (name, picture) = match tag.split_once(',') {
            Some((name, picture)) => {
                let name = name.trim();
                if name.is_empty() || picture.contains(',') {
                    return Err(CodecError::schema(format!("wrong cobol type tag '{}'", tag)));
                }
                (name.to_string(), picture.trim())
            }
            None => (structural_name.to_uppercase(), tag.trim()),
        };

        let (signed, picture) = match picture.strip_prefix('S') {
            Some(rest) => (true, rest),
            None => (false, picture),
        };
        let declared_width = parse_width(picture, tag)?;

        let kind = if picture.contains("COMP-3") {
            FieldKind::PackedDecimal
        } else if picture.contains("COMP-1") || picture.contains("COMP-2") {
            return Err(CodecError::schema(format!(
                "floating point usage is not supported in tag '{}'",
                tag
            )));
        } else if picture.contains("COMP") {
            FieldKind::Binary
        } else if picture.starts_with('X') {
            FieldKind::Alphanumeric
        } else if picture.starts_with('9') {
            FieldKind::ZonedDecimal
        } else {
            return Err(CodecError::schema(format!(
                "unsupported cobol type in tag '{}'",
                tag
            )));
        };
        check_shape(picture, tag)?;

        let storage_width = storage_width(kind, declared_width, signed)
            .ok_or_else(|| CodecError::schema(format!("width out of range in tag '{}'", tag)))?;

        Ok(Self {
            name,
            kind,
            declared_width,
            signed,
            storage_width,
        })
    }
}

/// Wire size for a kind, declared width and sign flag.
///
/// Returns `None` when a binary field asks for more than 18 digits.
pub fn storage_width(kind: FieldKind, declared_width: usize, signed: bool) -> Option<usize> {
    match kind {
        FieldKind::Alphanumeric => Some(declared_width),
        FieldKind::ZonedDecimal => Some(declared_width + usize::from(signed)),
        // one nibble per digit plus the sign nibble, rounded up
        FieldKind::PackedDecimal => Some((declared_width + 2) / 2),
        FieldKind::Binary => match declared_width {
            0..=4 => Some(2),
            5..=9 => Some(4),
            10..=18 => Some(8),
            _ => None,
        },
    }
}

/// Picture forms left once the width group and blanks are removed.
const PICTURE_SHAPES: [&str; 8] = [
    "X", "9", "COMP", "COMP-3", "COMP-4", "9COMP", "9COMP-3", "9COMP-4",
];

/// Reject pictures with symbols the codec does not lay out.
fn check_shape(picture: &str, tag: &str) -> Result<()> {
    let shape: String = match (picture.find('('), picture.find(')')) {
        (Some(open), Some(close)) if open < close => {
            format!("{}{}", &picture[..open], &picture[close + 1..])
        }
        _ => picture.to_string(),
    }
    .split_whitespace()
    .collect();

    if PICTURE_SHAPES.contains(&shape.as_str()) {
        Ok(())
    } else {
        Err(CodecError::schema(format!(
            "unsupported picture symbols in tag '{}'",
            tag
        )))
    }
}

/// Extract the parenthesized count, defaulting to one.
fn parse_width(picture: &str, tag: &str) -> Result<usize> {
    let Some(open) = picture.find('(') else {
        return Ok(1);
    };
    let malformed = || CodecError::schema(format!("wrong cobol type tag '{}'", tag));

    let rest = &picture[open + 1..];
    let close = rest.find(')').ok_or_else(malformed)?;
    if rest[close + 1..].contains('(') {
        return Err(malformed());
    }
    let width: usize = rest[..close].trim().parse().map_err(|_| malformed())?;
    if width == 0 {
        return Err(malformed());
    }
    Ok(width)
}
