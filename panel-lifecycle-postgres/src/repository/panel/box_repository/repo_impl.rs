use panel_lifecycle_db::models::panel::BoxModel;
use sqlx::{postgres::PgRow, Row};
use std::error::Error;

use postgres_unit_of_work::Executor;
use crate::utils::{get_heapless_string, TryFromRow};

/// Read side of boxes. Box status is owned by the box workflow.
pub struct BoxRepositoryImpl {
    pub executor: Executor,
}

impl BoxRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for BoxModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(BoxModel {
            id: row.try_get("id")?,
            project_id: row.try_get("project_id")?,
            name: get_heapless_string(row, "name")?,
            tag: get_heapless_string(row, "tag")?,
            status: row.try_get("status")?,
        })
    }
}
