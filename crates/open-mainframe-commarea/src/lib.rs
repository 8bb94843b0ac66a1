//! Copybook commarea codec for OpenMainframe.
//!
//! Converts between Rust records and the fixed-layout EBCDIC byte buffers
//! that COBOL programs exchange through a transaction gateway commarea.
//!
//! # Features
//!
//! - **Character Tables**: 256-entry mainframe/portable byte translation
//! - **Type Tags**: `X(n)`, `9(n)`, `S9(n)`, `COMP-3(n)`, `COMP(n)` field
//!   declarations with optional display-name overrides
//! - **Nested Records**: groups and count-driven repeated groups
//! - **Decoding / Encoding**: single-pass, position-sequential, no padding
//!   or alignment between fields
//! - **Gateway Calls**: request/response round trip over any [`Gateway`]
//!
//! # Example
//!
//! ```rust
//! use open_mainframe_commarea::{copybook, decode, encode};
//!
//! copybook! {
//!     #[derive(Debug, Default, PartialEq)]
//!     pub struct Customer {
//!         #[pic("S9(7)")]
//!         pub id: i32,
//!         #[pic("CUST-NAME,X(10)")]
//!         pub name: String,
//!         #[pic("S9(7)COMP-3")]
//!         pub balance: i64,
//!     }
//! }
//!
//! let customer = Customer { id: -12, name: "SMITH".into(), balance: 1050 };
//! let bytes = encode(&customer).unwrap();
//! assert_eq!(bytes.len(), 8 + 10 + 4);
//! assert_eq!(decode::<Customer>(&bytes).unwrap(), customer);
//! ```

mod macros;

pub mod config;
pub mod decode;
pub mod dump;
pub mod ebcdic;
pub mod encode;
pub mod error;
pub mod gateway;
pub mod numeric;
pub mod picture;
pub mod record;
pub mod schema;

// Re-export commonly used types at crate root
pub use config::{Config, ConfigError, GatewayConfig};
pub use decode::{decode, decode_into};
pub use dump::{dump, log_record};
pub use encode::{encode, encoded_size};
pub use error::CodecError;
pub use gateway::{call, Commarea, EciRequest, Gateway, GatewayError, ReturnCode};
pub use picture::{FieldDescriptor, FieldKind};
pub use record::{Copybook, FieldSlot, Integer, Occurs, Record, Repeated, Slot, SlotMut};
pub use schema::{CountRef, Schema, SchemaBuilder, SchemaEntry, SchemaNode};

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
