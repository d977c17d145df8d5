use panel_lifecycle_db::models::audit::AuditRecordModel;
use sqlx::{postgres::PgRow, Row};
use std::error::Error;

use postgres_unit_of_work::Executor;
use crate::utils::{get_heapless_string, get_optional_heapless_string, TryFromRow};

pub struct AuditRecordRepositoryImpl {
    pub executor: Executor,
}

impl AuditRecordRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for AuditRecordModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(AuditRecordModel {
            id: row.try_get("id")?,
            table_name: get_heapless_string(row, "table_name")?,
            record_id: row.try_get("record_id")?,
            action: row.try_get("action")?,
            old_values: row.try_get("old_values")?,
            new_values: row.try_get("new_values")?,
            changed_by: row.try_get("changed_by")?,
            changed_at: row.try_get("changed_at")?,
            description: get_optional_heapless_string(row, "description")?,
            hash: row.try_get("hash")?,
        })
    }
}
