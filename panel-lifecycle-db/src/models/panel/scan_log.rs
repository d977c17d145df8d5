use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use panel_lifecycle_api::domain::{ScanLogView, ScanType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// # Documentation
/// Append-only record of a single barcode scan (table `panel_scan_log`).
/// Written before the scan's status change is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanLogModel {
    pub id: Uuid,
    pub panel_id: Uuid,
    pub barcode: HeaplessString<50>,
    pub scan_type: ScanType,
    pub scan_location: Option<HeaplessString<200>>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub scanned_by: Uuid,
    pub scanned_at: DateTime<Utc>,
    pub notes: Option<HeaplessString<500>>,
}

impl Identifiable for ScanLogModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl ScanLogModel {
    pub fn to_view(&self) -> ScanLogView {
        ScanLogView {
            id: self.id,
            panel_id: self.panel_id,
            barcode: self.barcode.to_string(),
            scan_type: self.scan_type,
            scan_location: self.scan_location.as_ref().map(|l| l.to_string()),
            latitude: self.latitude,
            longitude: self.longitude,
            scanned_by: self.scanned_by,
            scanned_at: self.scanned_at,
            notes: self.notes.as_ref().map(|n| n.to_string()),
        }
    }
}
