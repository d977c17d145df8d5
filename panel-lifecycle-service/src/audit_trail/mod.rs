//! Field-level audit trail for every auditable entity.
//!
//! Writes store only the fields that changed, keyed by their raw field name.
//! Reads turn those into humanized field names and display-formatted values
//! and attach display names for the record and the actor.

pub mod diff;
pub mod format;
pub mod recorder;
pub mod resolver;

pub use diff::{changed_fields, display_changes, humanize, is_structural, STRUCTURAL_FIELDS};
pub use format::format_value;
pub use recorder::AuditTrailRecorder;
pub use resolver::{DisplayNameResolver, UNKNOWN_DISPLAY_NAME};
