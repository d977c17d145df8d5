use chrono::{DateTime, SubsecRound, Utc};
use heapless::String as HeaplessString;
use panel_lifecycle_api::domain::{AuditAction, BoxStatus, ScanType};
use panel_lifecycle_db::models::audit::AuditRecordModel;
use panel_lifecycle_db::models::panel::{PanelModel, ScanLogModel};
use serde_json::json;
use std::error::Error;
use uuid::Uuid;

use postgres_unit_of_work::Executor;

type TestResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

pub const TEST_PROJECT_CODE: &str = "PRJ001";

/// Projects have no repository of their own; tests insert them directly.
pub async fn create_test_project(executor: &Executor) -> TestResult<Uuid> {
    let id = Uuid::new_v4();
    // project codes are unique per database
    let code = format!("T{}", &id.simple().to_string()[..8].to_ascii_uppercase());
    let mut tx = executor.tx.lock().await;
    let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
    sqlx::query(r#"INSERT INTO project (id, name, code) VALUES ($1, $2, $3)"#)
        .bind(id)
        .bind("Test Project")
        .bind(code)
        .execute(&mut **transaction)
        .await?;
    Ok(id)
}

pub async fn create_test_box(executor: &Executor, project_id: Uuid) -> TestResult<Uuid> {
    let id = Uuid::new_v4();
    let mut tx = executor.tx.lock().await;
    let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
    sqlx::query(
        r#"INSERT INTO box (id, project_id, name, tag, status) VALUES ($1, $2, $3, $4, $5)"#,
    )
    .bind(id)
    .bind(project_id)
    .bind(format!("Box {}", &id.simple().to_string()[..6]))
    .bind("BX-001")
    .bind(BoxStatus::InProgress)
    .execute(&mut **transaction)
    .await?;
    Ok(id)
}

pub async fn set_box_status(executor: &Executor, box_id: Uuid, status: BoxStatus) -> TestResult<()> {
    let mut tx = executor.tx.lock().await;
    let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
    sqlx::query(r#"UPDATE box SET status = $2 WHERE id = $1"#)
        .bind(box_id)
        .bind(status)
        .execute(&mut **transaction)
        .await?;
    Ok(())
}

pub async fn create_test_panel_type(
    executor: &Executor,
    project_id: Uuid,
    name: &str,
    quantity: i32,
) -> TestResult<Uuid> {
    let id = Uuid::new_v4();
    let mut tx = executor.tx.lock().await;
    let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
    sqlx::query(
        r#"INSERT INTO panel_type (id, project_id, name, width_mm, height_mm, quantity)
           VALUES ($1, $2, $3, 1200.00, 2400.00, $4)"#,
    )
    .bind(id)
    .bind(project_id)
    .bind(name)
    .bind(quantity)
    .execute(&mut **transaction)
    .await?;
    Ok(id)
}

pub async fn create_test_user(
    executor: &Executor,
    full_name: Option<&str>,
    email: Option<&str>,
) -> TestResult<Uuid> {
    let id = Uuid::new_v4();
    let mut tx = executor.tx.lock().await;
    let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
    sqlx::query(r#"INSERT INTO app_user (id, full_name, email) VALUES ($1, $2, $3)"#)
        .bind(id)
        .bind(full_name)
        .bind(email)
        .execute(&mut **transaction)
        .await?;
    Ok(id)
}

pub fn create_test_panel(box_id: Uuid, name: &str) -> PanelModel {
    PanelModel::new(box_id, None, name, Uuid::new_v4(), Utc::now().trunc_subsecs(6))
        .expect("test panel name fits")
}

pub fn create_test_scan_log(panel: &PanelModel, scanned_at: DateTime<Utc>) -> ScanLogModel {
    ScanLogModel {
        id: Uuid::new_v4(),
        panel_id: panel.id,
        barcode: panel.barcode.clone().unwrap_or_default(),
        scan_type: ScanType::Inspection,
        scan_location: None,
        latitude: None,
        longitude: None,
        scanned_by: Uuid::new_v4(),
        scanned_at: scanned_at.trunc_subsecs(6),
        notes: Some(HeaplessString::try_from("routine check").expect("note fits")),
    }
}

pub fn create_test_audit_record(
    table_name: &str,
    record_id: Uuid,
    action: AuditAction,
    changed_at: DateTime<Utc>,
) -> TestResult<AuditRecordModel> {
    let record = AuditRecordModel {
        id: Uuid::new_v4(),
        table_name: HeaplessString::try_from(table_name).map_err(|_| "table name too long")?,
        record_id,
        action,
        old_values: None,
        new_values: Some(json!({"Name": "Panel 1"})),
        changed_by: Uuid::new_v4(),
        changed_at: changed_at.trunc_subsecs(6),
        description: None,
        hash: 0,
    };
    Ok(record.sealed()?)
}
