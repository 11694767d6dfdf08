//! Form domain layer
//!
//! Fields, validators, the composite group tree, and address records. The
//! engine wires these together; everything here is synchronous and pure.

mod address;
mod field;
mod group;
mod validate;

pub use address::{AddressCollection, AddressRecord, AddressType};
pub use field::{Field, FieldValue};
pub use group::{ControlNode, FieldGroup};
pub use validate::{
    project_group_message, project_message, run_validators, ErrorKind, GroupValidator,
    MessageEntry, MessageTable, Validator,
};
