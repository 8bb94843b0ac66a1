//! Record schemas built from static field declarations.
//!
//! A [`Schema`] is the ordered list of fields of one record type. Order is
//! declaration order, which is also wire order. Nested records and
//! repeated groups carry their own schema.
//!
//! Schemas are built through [`SchemaBuilder`]. Building parses every tag
//! and resolves each repeated group's count field to an earlier numeric
//! sibling, so a schema that builds never fails on layout grounds during
//! a decode or encode.

pub mod walker;

use tracing::warn;

use crate::error::CodecError;
use crate::picture::FieldDescriptor;
use crate::record::{Copybook, Occurs};
use crate::Result;

/// Link from a repeated group to the sibling field holding its count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountRef {
    /// Structural name of the count field, as resolved at build time.
    pub field: String,
    /// Index of the count field among the enclosing schema's entries.
    pub index: usize,
}

/// What a schema entry holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaNode {
    /// Elementary field.
    Leaf(FieldDescriptor),
    /// Nested record.
    Group(Schema),
    /// Repeated group whose element count lives in a sibling field.
    Occurs {
        /// The sibling count field.
        count: CountRef,
        /// Layout of each element.
        element: Schema,
    },
}

/// One field of a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaEntry {
    /// Structural field name, used to reach the slot in a live record.
    pub field: String,
    /// Field contents.
    pub node: SchemaNode,
}

impl SchemaEntry {
    /// Display name: the descriptor name for leaves, the upper-cased
    /// structural name otherwise.
    pub fn display_name(&self) -> String {
        match &self.node {
            SchemaNode::Leaf(desc) => desc.name.clone(),
            _ => self.field.to_uppercase(),
        }
    }
}

/// Ordered layout of one record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    record: String,
    entries: Vec<SchemaEntry>,
}

impl Schema {
    /// Name of the record type this schema describes.
    pub fn record_name(&self) -> &str {
        &self.record
    }

    /// Entries in wire order.
    pub fn entries(&self) -> &[SchemaEntry] {
        &self.entries
    }

    /// Look up an entry by structural name.
    pub fn entry(&self, field: &str) -> Option<&SchemaEntry> {
        self.entries.iter().find(|e| e.field == field)
    }

    /// Whether the schema contains no fields.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Smallest wire size, counting every repeated group as empty.
    pub fn min_size(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| match &entry.node {
                SchemaNode::Leaf(desc) => desc.storage_width,
                SchemaNode::Group(schema) => schema.min_size(),
                SchemaNode::Occurs { .. } => 0,
            })
            .sum()
    }

    /// Total wire size, if the layout has no repeated groups.
    pub fn fixed_size(&self) -> Option<usize> {
        self.entries.iter().try_fold(0usize, |total, entry| {
            let size = match &entry.node {
                SchemaNode::Leaf(desc) => desc.storage_width,
                SchemaNode::Group(schema) => schema.fixed_size()?,
                SchemaNode::Occurs { .. } => return None,
            };
            Some(total + size)
        })
    }
}

/// Declared but not yet validated field.
#[derive(Debug)]
enum PendingEntry {
    Leaf { field: String, tag: String },
    Group { field: String, layout: SchemaBuilder },
    Occurs { field: String, count: String, layout: SchemaBuilder },
    Skip { field: String },
}

/// Builder for a [`Schema`].
///
/// # Example
///
/// ```rust
/// use open_mainframe_commarea::SchemaBuilder;
///
/// let schema = SchemaBuilder::new("Customer")
///     .field("id", "S9(7)")
///     .field("name", "CUST-NAME,X(30)")
///     .build()
///     .unwrap();
/// assert_eq!(schema.fixed_size(), Some(38));
/// ```
#[derive(Debug)]
pub struct SchemaBuilder {
    record: String,
    pending: Vec<PendingEntry>,
}

impl SchemaBuilder {
    /// Start a layout for the record type `record`.
    pub fn new(record: impl Into<String>) -> Self {
        Self {
            record: record.into(),
            pending: Vec::new(),
        }
    }

    /// Add an elementary field with a type tag.
    pub fn field(mut self, field: &str, tag: &str) -> Self {
        self.pending.push(PendingEntry::Leaf {
            field: field.to_string(),
            tag: tag.to_string(),
        });
        self
    }

    /// Add a nested record of type `G`.
    pub fn group<G: Copybook>(mut self, field: &str) -> Self {
        self.pending.push(PendingEntry::Group {
            field: field.to_string(),
            layout: G::layout(),
        });
        self
    }

    /// Add a repeated group whose count is held by the earlier field `count`.
    pub fn occurs<O: Occurs>(mut self, field: &str, count: &str) -> Self {
        self.pending.push(PendingEntry::Occurs {
            field: field.to_string(),
            count: count.to_string(),
            layout: <O::Element as Copybook>::layout(),
        });
        self
    }

    /// Note a field that carries no tag and is not a record. It takes no
    /// part in the layout.
    pub fn skip(mut self, field: &str) -> Self {
        self.pending.push(PendingEntry::Skip {
            field: field.to_string(),
        });
        self
    }

    /// Validate the declarations and produce the schema.
    ///
    /// # Errors
    /// Returns `CodecError::InvalidSchema` for a malformed tag, a duplicate
    /// field, or a repeated group whose count field is missing, declared
    /// later, or not numeric.
    pub fn build(self) -> Result<Schema> {
        let record = self.record;
        let mut entries: Vec<SchemaEntry> = Vec::with_capacity(self.pending.len());

        for pending in self.pending {
            let entry = match pending {
                PendingEntry::Leaf { field, tag } => {
                    let desc = FieldDescriptor::parse(&tag, &field)?;
                    SchemaEntry {
                        field,
                        node: SchemaNode::Leaf(desc),
                    }
                }
                PendingEntry::Group { field, layout } => {
                    let schema = layout.build()?;
                    if schema.is_empty() {
                        warn!(record = %record, field = %field, "no tag on field and no sub-fields, skipping");
                        continue;
                    }
                    SchemaEntry {
                        field,
                        node: SchemaNode::Group(schema),
                    }
                }
                PendingEntry::Occurs {
                    field,
                    count,
                    layout,
                } => {
                    let index = resolve_count(&record, &entries, &field, &count)?;
                    // link by structural name, whichever name the caller used
                    let count = entries[index].field.clone();
                    let element = layout.build()?;
                    if element.is_empty() {
                        return Err(CodecError::schema(format!(
                            "array {}.{} has an element type with no fields",
                            record, field
                        )));
                    }
                    SchemaEntry {
                        field,
                        node: SchemaNode::Occurs {
                            count: CountRef {
                                field: count,
                                index,
                            },
                            element,
                        },
                    }
                }
                PendingEntry::Skip { field } => {
                    warn!(record = %record, field = %field, "no tag on field, skipping");
                    continue;
                }
            };

            if entries.iter().any(|e| e.field == entry.field) {
                return Err(CodecError::schema(format!(
                    "duplicate field {}.{}",
                    record, entry.field
                )));
            }
            entries.push(entry);
        }

        Ok(Schema { record, entries })
    }
}

/// Find the count field for a repeated group among the entries built so
/// far. Matches the structural name or the descriptor name.
fn resolve_count(
    record: &str,
    entries: &[SchemaEntry],
    array: &str,
    count: &str,
) -> Result<usize> {
    let index = entries
        .iter()
        .position(|e| {
            e.field == count || matches!(&e.node, SchemaNode::Leaf(desc) if desc.name == count)
        })
        .ok_or_else(|| {
            CodecError::schema(format!(
                "array {}.{} size field not found {}",
                record, array, count
            ))
        })?;

    match &entries[index].node {
        SchemaNode::Leaf(desc) if desc.kind.is_numeric() => Ok(index),
        _ => Err(CodecError::schema(format!(
            "array {}.{} size field {} is not numeric",
            record, array, count
        ))),
    }
}
