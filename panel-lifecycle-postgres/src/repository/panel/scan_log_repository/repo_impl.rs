use panel_lifecycle_db::models::panel::ScanLogModel;
use sqlx::{postgres::PgRow, Row};
use std::error::Error;

use postgres_unit_of_work::Executor;
use crate::utils::{get_heapless_string, get_optional_heapless_string, TryFromRow};

/// Append-only; the table rejects updates and deletes.
pub struct ScanLogRepositoryImpl {
    pub executor: Executor,
}

impl ScanLogRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for ScanLogModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(ScanLogModel {
            id: row.try_get("id")?,
            panel_id: row.try_get("panel_id")?,
            barcode: get_heapless_string(row, "barcode")?,
            scan_type: row.try_get("scan_type")?,
            scan_location: get_optional_heapless_string(row, "scan_location")?,
            latitude: row.try_get("latitude")?,
            longitude: row.try_get("longitude")?,
            scanned_by: row.try_get("scanned_by")?,
            scanned_at: row.try_get("scanned_at")?,
            notes: get_optional_heapless_string(row, "notes")?,
        })
    }
}
