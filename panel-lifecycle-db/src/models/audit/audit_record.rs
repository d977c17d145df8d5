use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use panel_lifecycle_api::domain::AuditAction;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;
use crate::utils::hash_as_i64;

/// # Documentation
/// - One row of the generic audit trail (table `audit_log`).
/// - `old_values` / `new_values` hold only the fields that actually changed,
///   keyed by display field name. Created records have no old values and
///   deleted records have no new values.
/// - `hash` is computed over the record with `hash` set to 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecordModel {
    pub id: Uuid,
    pub table_name: HeaplessString<100>,
    pub record_id: Uuid,
    pub action: AuditAction,
    pub old_values: Option<Value>,
    pub new_values: Option<Value>,
    pub changed_by: Uuid,
    pub changed_at: DateTime<Utc>,
    pub description: Option<HeaplessString<200>>,
    pub hash: i64,
}

impl Identifiable for AuditRecordModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl AuditRecordModel {
    /// Fills in `hash` from the remaining fields.
    pub fn sealed(mut self) -> Result<Self, String> {
        self.hash = 0;
        self.hash = hash_as_i64(&self)?;
        Ok(self)
    }

    /// True when the stored hash matches the record content.
    pub fn verify(&self) -> bool {
        let mut copy = self.clone();
        copy.hash = 0;
        hash_as_i64(&copy).map(|h| h == self.hash).unwrap_or(false)
    }
}
