//! Field-by-field listing of a record, for logs and troubleshooting.

use tracing::debug;

use crate::picture::FieldDescriptor;
use crate::record::{Copybook, Slot};
use crate::schema::walker::{walk, Visitor};
use crate::Result;

/// Render every leaf field of `record` as `NAME : value`, one per line,
/// names right-aligned to 16 columns.
///
/// # Errors
/// Fails on the same layout errors as encoding.
pub fn dump<R: Copybook>(record: &R) -> Result<String> {
    let schema = R::schema()?;
    let mut dumper = Dumper(String::new());
    walk(&schema, record, &mut dumper)?;
    Ok(dumper.0)
}

/// Emit [`dump`] output at debug level.
pub fn log_record<R: Copybook>(record: &R) -> Result<()> {
    let listing = dump(record)?;
    for line in listing.lines() {
        debug!("{}", line);
    }
    Ok(())
}

struct Dumper(String);

impl Visitor for Dumper {
    fn visit_field(&mut self, field: &FieldDescriptor, slot: Slot<'_>) -> Result<()> {
        let value = match slot {
            Slot::Text(text) => text.to_string(),
            Slot::Bytes(bytes) => format!("{:02X?}", bytes),
            Slot::Char(byte) => char::from(byte).to_string(),
            Slot::Int(value) => value
                .get()
                .map_or_else(|| "<out of range>".to_string(), |v| v.to_string()),
            Slot::Group(_) | Slot::Occurs(_) => String::new(),
        };
        self.0.push_str(&format!("{:>16} : {}\n", field.name, value));
        Ok(())
    }
}
