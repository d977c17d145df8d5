use serde_json::Value;
use uuid::Uuid;

use super::identifiable::Identifiable;

/// Trait for entities whose changes are recorded in the audit trail
pub trait Auditable: Identifiable {
    /// Table name the audit records of this entity are filed under
    const TABLE_NAME: &'static str;

    /// Returns the ID of the most recent audit record for this entity, if any
    fn get_audit_log_id(&self) -> Option<Uuid>;

    /// Field-name to value snapshot used to diff successive versions
    fn audit_snapshot(&self) -> Value;
}
