use panel_lifecycle_db::models::panel::PanelModel;
use sqlx::{postgres::PgRow, Row};
use std::error::Error;

use postgres_unit_of_work::Executor;
use crate::utils::{get_heapless_string, get_optional_heapless_string, TryFromRow};

pub struct PanelRepositoryImpl {
    pub executor: Executor,
}

impl PanelRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for PanelModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(PanelModel {
            id: row.try_get("id")?,
            box_id: row.try_get("box_id")?,
            panel_type_id: row.try_get("panel_type_id")?,
            name: get_heapless_string(row, "name")?,
            barcode: get_optional_heapless_string(row, "barcode")?,
            status: row.try_get("status")?,
            first_approval_status: row.try_get("first_approval_status")?,
            first_approval_by: row.try_get("first_approval_by")?,
            first_approval_at: row.try_get("first_approval_at")?,
            first_approval_notes: get_optional_heapless_string(row, "first_approval_notes")?,
            second_approval_status: row.try_get("second_approval_status")?,
            second_approval_by: row.try_get("second_approval_by")?,
            second_approval_at: row.try_get("second_approval_at")?,
            second_approval_notes: get_optional_heapless_string(row, "second_approval_notes")?,
            location_status: row.try_get("location_status")?,
            dispatched_at: row.try_get("dispatched_at")?,
            arrived_at: row.try_get("arrived_at")?,
            installed_at: row.try_get("installed_at")?,
            created_by: row.try_get("created_by")?,
            created_at: row.try_get("created_at")?,
            last_modified_by: row.try_get("last_modified_by")?,
            last_modified_at: row.try_get("last_modified_at")?,
            version: row.try_get("version")?,
            audit_log_id: row.try_get("audit_log_id")?,
        })
    }
}
