//! Schema-guided traversal of a live record.
//!
//! The walker pairs each leaf descriptor with the matching slot of a
//! record and hands both to a visitor, in wire order. It descends into
//! nested records and repeats a repeated group's element layout as many
//! times as the group's count field says.
//!
//! The read walk ([`walk`]) requires each repeated group to hold exactly
//! the declared number of elements. The write walk ([`walk_mut`]) reads
//! the count after the visitor has filled it, lets the visitor vet it, and
//! then rebuilds the collection one element at a time, which is what
//! decoding needs.

use crate::error::CodecError;
use crate::picture::FieldDescriptor;
use crate::record::{Record, Slot, SlotMut};
use crate::schema::{CountRef, Schema, SchemaEntry, SchemaNode};
use crate::Result;

/// Receives leaf fields during a read walk.
pub trait Visitor {
    /// Called once per leaf, in wire order.
    fn visit_field(&mut self, field: &FieldDescriptor, slot: Slot<'_>) -> Result<()>;
}

/// Receives leaf fields during a write walk.
pub trait VisitorMut {
    /// Called once per leaf, in wire order.
    fn visit_field(&mut self, field: &FieldDescriptor, slot: SlotMut<'_>) -> Result<()>;

    /// Called before a repeated group of `count` elements laid out as
    /// `element` is filled. An error stops the walk before any element
    /// is created.
    fn begin_occurs(&mut self, _field: &str, _count: usize, _element: &Schema) -> Result<()> {
        Ok(())
    }
}

/// Walk `record` for reading.
///
/// # Errors
/// Fails with `CodecError::InvalidSchema` when a slot is missing or does
/// not match its entry, `CodecError::CountMismatch` when a repeated group
/// disagrees with its count field, or with any error the visitor returns.
pub fn walk<V: Visitor>(schema: &Schema, record: &dyn Record, visitor: &mut V) -> Result<()> {
    for entry in schema.entries() {
        let slot = record
            .slot(&entry.field)
            .ok_or_else(|| missing_slot(schema, entry))?;

        match (&entry.node, slot) {
            (SchemaNode::Leaf(_), slot @ (Slot::Group(_) | Slot::Occurs(_))) => {
                return Err(mismatch(schema, entry, slot.type_name()));
            }
            (SchemaNode::Leaf(desc), slot) => visitor.visit_field(desc, slot)?,
            (SchemaNode::Group(nested), Slot::Group(inner)) => walk(nested, inner, visitor)?,
            (SchemaNode::Occurs { count, element }, Slot::Occurs(items)) => {
                let declared = count_value(schema, record, count)?;
                if items.len() != declared {
                    return Err(CodecError::CountMismatch {
                        field: entry.display_name(),
                        declared,
                        actual: items.len(),
                    });
                }
                for index in 0..declared {
                    let item = items
                        .element(index)
                        .ok_or_else(|| missing_slot(schema, entry))?;
                    walk(element, item, visitor)?;
                }
            }
            (_, slot) => return Err(mismatch(schema, entry, slot.type_name())),
        }
    }
    Ok(())
}

/// Walk `record` for writing.
///
/// Each repeated group is cleared and refilled with as many elements as
/// its count field holds at the moment the group is reached.
///
/// # Errors
/// Fails with `CodecError::InvalidSchema` when a slot is missing, does not
/// match its entry, or a count is negative, or with any error the visitor
/// returns.
pub fn walk_mut<V: VisitorMut>(
    schema: &Schema,
    record: &mut dyn Record,
    visitor: &mut V,
) -> Result<()> {
    for entry in schema.entries() {
        let declared = match &entry.node {
            SchemaNode::Occurs { count, .. } => Some(count_value(schema, record, count)?),
            _ => None,
        };

        let slot = record
            .slot_mut(&entry.field)
            .ok_or_else(|| missing_slot(schema, entry))?;

        match (&entry.node, slot) {
            (SchemaNode::Leaf(_), slot @ (SlotMut::Group(_) | SlotMut::Occurs(_))) => {
                return Err(mismatch(schema, entry, slot.type_name()));
            }
            (SchemaNode::Leaf(desc), slot) => visitor.visit_field(desc, slot)?,
            (SchemaNode::Group(nested), SlotMut::Group(inner)) => {
                walk_mut(nested, inner, visitor)?
            }
            (SchemaNode::Occurs { element, .. }, SlotMut::Occurs(items)) => {
                let declared = declared.unwrap_or_default();
                visitor.begin_occurs(&entry.display_name(), declared, element)?;
                items.clear();
                for _ in 0..declared {
                    walk_mut(element, items.push_default(), visitor)?;
                }
            }
            (_, slot) => return Err(mismatch(schema, entry, slot.type_name())),
        }
    }
    Ok(())
}

/// Current value of a repeated group's count field.
fn count_value(schema: &Schema, record: &dyn Record, count: &CountRef) -> Result<usize> {
    let field = schema
        .entries()
        .get(count.index)
        .map_or(count.field.as_str(), |entry| entry.field.as_str());
    let value = match record.slot(field) {
        Some(Slot::Int(value)) => value.get(),
        _ => {
            return Err(CodecError::schema(format!(
                "array size field {}.{} is not an integer slot",
                schema.record_name(),
                count.field
            )))
        }
    };
    value
        .and_then(|v| usize::try_from(v).ok())
        .ok_or_else(|| {
            CodecError::schema(format!(
                "array size field {}.{} holds an invalid count",
                schema.record_name(),
                count.field
            ))
        })
}

fn missing_slot(schema: &Schema, entry: &SchemaEntry) -> CodecError {
    CodecError::schema(format!(
        "record {} has no slot for field {}",
        schema.record_name(),
        entry.field
    ))
}

fn mismatch(schema: &Schema, entry: &SchemaEntry, slot: &str) -> CodecError {
    let expected = match &entry.node {
        SchemaNode::Leaf(desc) => format!("{} field", desc.kind),
        SchemaNode::Group(_) => "group".to_string(),
        SchemaNode::Occurs { .. } => "repeated group".to_string(),
    };
    CodecError::schema(format!(
        "field {}.{} is declared as {} but stored as {}",
        schema.record_name(),
        entry.field,
        expected,
        slot
    ))
}
