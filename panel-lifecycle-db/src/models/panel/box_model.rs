use heapless::String as HeaplessString;
use panel_lifecycle_api::domain::BoxStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// # Documentation
/// A shipping box grouping the panels of one project.
/// Once `Dispatched`, the box and every panel in it are read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxModel {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: HeaplessString<100>,
    /// Human-facing box tag shown in the audit trail
    pub tag: HeaplessString<50>,
    pub status: BoxStatus,
}

impl Identifiable for BoxModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl BoxModel {
    pub fn is_dispatched(&self) -> bool {
        self.status.is_dispatched()
    }
}
