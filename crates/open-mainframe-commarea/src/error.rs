//! Commarea codec error types.

use miette::Diagnostic;
use thiserror::Error;

/// Errors produced while deriving a schema or converting a record.
///
/// Every variant is fatal for the call that produced it. A failed decode
/// never hands back a partially populated record.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum CodecError {
    /// The record layout cannot be used (bad tag, missing count field,
    /// unsupported kind, slot that does not match its tag).
    #[error("invalid schema: {message}")]
    #[diagnostic(code(commarea::invalid_schema))]
    InvalidSchema {
        /// Description of the problem.
        message: String,
    },

    /// Zoned or packed digits did not parse as an integer.
    #[error("malformed numeric value '{text}' in field {field}")]
    #[diagnostic(code(commarea::malformed_numeric))]
    MalformedNumeric {
        /// Field name.
        field: String,
        /// The portable text that failed to parse.
        text: String,
    },

    /// The buffer ended before the layout did.
    #[error("truncated input at field {field}: need {needed} bytes, {available} available")]
    #[diagnostic(code(commarea::truncated_input))]
    TruncatedInput {
        /// Field being read when the buffer ran out.
        field: String,
        /// Bytes required by the field.
        needed: usize,
        /// Bytes left in the buffer.
        available: usize,
    },

    /// A value does not fit the declared width of its field.
    #[error("value too large for field {field}: {message}")]
    #[diagnostic(code(commarea::value_too_large))]
    ValueTooLarge {
        /// Field name.
        field: String,
        /// Description of the overflow.
        message: String,
    },

    /// A repeated group holds a different number of elements than its
    /// count field declares.
    #[error("field {field} declares {declared} elements but holds {actual}")]
    #[diagnostic(
        code(commarea::count_mismatch),
        help("set the count field to the collection length before encoding")
    )]
    CountMismatch {
        /// Repeated group name.
        field: String,
        /// Value of the count field.
        declared: usize,
        /// Number of elements in the collection.
        actual: usize,
    },

    /// A character has no single-byte mainframe representation.
    #[error("character '{ch}' in field {field} has no mainframe representation")]
    #[diagnostic(code(commarea::unmappable_character))]
    UnmappableCharacter {
        /// Field name.
        field: String,
        /// Offending character.
        ch: char,
    },
}

impl CodecError {
    pub(crate) fn schema(message: impl Into<String>) -> Self {
        CodecError::InvalidSchema {
            message: message.into(),
        }
    }

    pub(crate) fn too_large(field: &str, message: impl Into<String>) -> Self {
        CodecError::ValueTooLarge {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn malformed(field: &str, text: impl Into<String>) -> Self {
        CodecError::MalformedNumeric {
            field: field.to_string(),
            text: text.into(),
        }
    }
}
