//! Live record access for the codec.
//!
//! A record type exposes its storage through [`Record`], keyed by the
//! structural field name used in its layout. The codec never allocates a
//! top-level record on the caller's behalf except through `Default`, and
//! only reads or writes fields through these slots.
//!
//! Most records are declared with the [`copybook!`](crate::copybook) macro,
//! which generates both traits from one field list.

use crate::schema::{Schema, SchemaBuilder};
use crate::Result;

/// Read access to one field of a live record.
pub enum Slot<'a> {
    /// Alphanumeric field held as a string.
    Text(&'a str),
    /// Alphanumeric field held as a fixed byte array.
    Bytes(&'a [u8]),
    /// One-byte alphanumeric field held as a single byte.
    Char(u8),
    /// Numeric field.
    Int(&'a dyn Integer),
    /// Nested record.
    Group(&'a dyn Record),
    /// Repeated group.
    Occurs(&'a dyn Repeated),
}

/// Write access to one field of a live record.
pub enum SlotMut<'a> {
    /// Alphanumeric field held as a string.
    Text(&'a mut String),
    /// Alphanumeric field held as a fixed byte array.
    Bytes(&'a mut [u8]),
    /// One-byte alphanumeric field held as a single byte.
    Char(&'a mut u8),
    /// Numeric field.
    Int(&'a mut dyn Integer),
    /// Nested record.
    Group(&'a mut dyn Record),
    /// Repeated group.
    Occurs(&'a mut dyn Repeated),
}

impl Slot<'_> {
    /// Short name of the slot type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Slot::Text(_) => "string",
            Slot::Bytes(_) => "byte array",
            Slot::Char(_) => "byte",
            Slot::Int(_) => "integer",
            Slot::Group(_) => "group",
            Slot::Occurs(_) => "repeated group",
        }
    }
}

impl SlotMut<'_> {
    /// Short name of the slot type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            SlotMut::Text(_) => "string",
            SlotMut::Bytes(_) => "byte array",
            SlotMut::Char(_) => "byte",
            SlotMut::Int(_) => "integer",
            SlotMut::Group(_) => "group",
            SlotMut::Occurs(_) => "repeated group",
        }
    }
}

/// A structure whose fields the codec can reach by name.
pub trait Record {
    /// Read access to the field called `name`.
    fn slot(&self, name: &str) -> Option<Slot<'_>>;

    /// Write access to the field called `name`.
    fn slot_mut(&mut self, name: &str) -> Option<SlotMut<'_>>;
}

/// A record type with a static copybook layout.
pub trait Copybook: Record + Default {
    /// Declare the fields in wire order.
    fn layout() -> SchemaBuilder;

    /// Build and validate the layout.
    fn schema() -> Result<Schema> {
        Self::layout().build()
    }
}

/// Leaf storage that maps onto a slot.
pub trait FieldSlot {
    /// Borrow as a read slot.
    fn slot(&self) -> Slot<'_>;

    /// Borrow as a write slot.
    fn slot_mut(&mut self) -> SlotMut<'_>;
}

impl FieldSlot for String {
    fn slot(&self) -> Slot<'_> {
        Slot::Text(self)
    }

    fn slot_mut(&mut self) -> SlotMut<'_> {
        SlotMut::Text(self)
    }
}

impl FieldSlot for u8 {
    fn slot(&self) -> Slot<'_> {
        Slot::Char(*self)
    }

    fn slot_mut(&mut self) -> SlotMut<'_> {
        SlotMut::Char(self)
    }
}

impl<const N: usize> FieldSlot for [u8; N] {
    fn slot(&self) -> Slot<'_> {
        Slot::Bytes(self)
    }

    fn slot_mut(&mut self) -> SlotMut<'_> {
        SlotMut::Bytes(self)
    }
}

/// Integer storage of any primitive width.
pub trait Integer {
    /// Current value, or `None` if it does not fit an `i64`.
    fn get(&self) -> Option<i64>;

    /// Store `value`; returns `false` if it does not fit.
    fn set(&mut self, value: i64) -> bool;
}

macro_rules! impl_integer {
    ($($t:ty),*) => {
        $(
            impl Integer for $t {
                fn get(&self) -> Option<i64> {
                    i64::try_from(*self).ok()
                }

                fn set(&mut self, value: i64) -> bool {
                    match <$t>::try_from(value) {
                        Ok(v) => {
                            *self = v;
                            true
                        }
                        Err(_) => false,
                    }
                }
            }

            impl FieldSlot for $t {
                fn slot(&self) -> Slot<'_> {
                    Slot::Int(self)
                }

                fn slot_mut(&mut self) -> SlotMut<'_> {
                    SlotMut::Int(self)
                }
            }
        )*
    };
}

impl_integer!(i16, i32, i64, u16, u32, u64, isize, usize);

/// A variable-length sequence of nested records.
pub trait Repeated {
    /// Number of elements held.
    fn len(&self) -> usize;

    /// Whether no elements are held.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index`.
    fn element(&self, index: usize) -> Option<&dyn Record>;

    /// Mutable element at `index`.
    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Record>;

    /// Remove every element.
    fn clear(&mut self);

    /// Append a default element and return it.
    fn push_default(&mut self) -> &mut dyn Record;
}

/// A repeated group whose element type has a copybook layout.
pub trait Occurs: Repeated {
    /// Element record type.
    type Element: Copybook;
}

impl<R: Copybook> Repeated for Vec<R> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn element(&self, index: usize) -> Option<&dyn Record> {
        self.get(index).map(|r| r as &dyn Record)
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Record> {
        self.get_mut(index).map(|r| r as &mut dyn Record)
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn push_default(&mut self) -> &mut dyn Record {
        let index = Vec::len(self);
        self.push(R::default());
        &mut self[index]
    }
}

impl<R: Copybook> Occurs for Vec<R> {
    type Element = R;
}
