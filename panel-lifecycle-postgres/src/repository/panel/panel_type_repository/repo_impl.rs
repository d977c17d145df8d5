use panel_lifecycle_db::models::panel::PanelTypeModel;
use sqlx::{postgres::PgRow, Row};
use std::error::Error;

use postgres_unit_of_work::Executor;
use crate::utils::{get_heapless_string, TryFromRow};

pub struct PanelTypeRepositoryImpl {
    pub executor: Executor,
}

impl PanelTypeRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for PanelTypeModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(PanelTypeModel {
            id: row.try_get("id")?,
            project_id: row.try_get("project_id")?,
            name: get_heapless_string(row, "name")?,
            width_mm: row.try_get("width_mm")?,
            height_mm: row.try_get("height_mm")?,
            quantity: row.try_get("quantity")?,
        })
    }
}
