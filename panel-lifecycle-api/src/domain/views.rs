use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::{ApprovalStatus, AuditAction, PanelLocationStatus, PanelStatus, ScanType};
use crate::error::LifecycleError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalSlotView {
    pub status: Option<ApprovalStatus>,
    pub actor_id: Option<Uuid>,
    pub decided_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Read projection of a panel returned by every mutating operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelView {
    pub id: Uuid,
    pub box_id: Uuid,
    pub name: String,
    pub barcode: Option<String>,
    pub status: PanelStatus,
    pub first_approval: ApprovalSlotView,
    pub second_approval: ApprovalSlotView,
    pub location_status: Option<PanelLocationStatus>,
    pub dispatched_at: Option<DateTime<Utc>>,
    pub arrived_at: Option<DateTime<Utc>>,
    pub installed_at: Option<DateTime<Utc>>,
    pub last_modified_by: Option<Uuid>,
    pub last_modified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanLogView {
    pub id: Uuid,
    pub panel_id: Uuid,
    pub barcode: String,
    pub scan_type: ScanType,
    pub scan_location: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub scanned_by: Uuid,
    pub scanned_at: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Result of a barcode scan.
///
/// The scan log entry is always present once the panel was resolved. When the
/// status change that the scan implies could not be applied, `transition_error`
/// says why and `panel` reflects the state actually persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOutcome {
    pub scan_log: ScanLogView,
    pub panel: PanelView,
    /// Statuses the panel passed through, in order
    pub applied: Vec<PanelStatus>,
    pub auto_approved: bool,
    pub transition_error: Option<LifecycleError>,
}

impl ScanOutcome {
    pub fn is_complete(&self) -> bool {
        self.transition_error.is_none()
    }
}

/// One field-level change of an audit record, formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditChange {
    pub field: String,
    pub old_value: String,
    pub new_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogView {
    pub id: Uuid,
    pub table_name: String,
    pub record_id: Uuid,
    pub entity_name: String,
    pub action: AuditAction,
    pub changed_by: Uuid,
    pub changed_by_name: String,
    pub changed_at: DateTime<Utc>,
    pub description: Option<String>,
    pub changes: Vec<AuditChange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogPage {
    pub items: Vec<AuditLogView>,
    pub total_count: usize,
    pub page_number: usize,
    pub page_size: usize,
    pub total_pages: usize,
}
