pub mod audit_record;
pub mod display_reference;
pub mod entity_kind;

pub use audit_record::*;
pub use display_reference::*;
pub use entity_kind::*;
