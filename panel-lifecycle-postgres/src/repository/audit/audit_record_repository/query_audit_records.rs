use async_trait::async_trait;
use panel_lifecycle_db::models::audit::AuditRecordModel;
use panel_lifecycle_db::repository::{AuditRecordFilter, Page, PageRequest, QueryAuditRecords};
use sqlx::Postgres;
use std::error::Error;

use crate::utils::rows_into;

use super::repo_impl::AuditRecordRepositoryImpl;

/// Every filter is optional; `NULL` disables it.
const FILTER: &str = r#"
    ($1::text IS NULL OR lower(table_name) = lower($1))
    AND ($2::uuid IS NULL OR record_id = $2)
    AND ($3::audit_action IS NULL OR action = $3)
    AND ($4::timestamptz IS NULL OR changed_at >= $4)
    AND ($5::timestamptz IS NULL OR changed_at <= $5)
    AND ($6::uuid IS NULL OR changed_by = $6)
"#;

impl AuditRecordRepositoryImpl {
    /// Newest first.
    pub(super) async fn query_audit_records_impl(
        &self,
        filter: &AuditRecordFilter,
        page: PageRequest,
    ) -> Result<Page<AuditRecordModel>, Box<dyn Error + Send + Sync>> {
        let count_query = format!("SELECT COUNT(*) FROM audit_log WHERE {FILTER}");
        let page_query = format!(
            "SELECT * FROM audit_log WHERE {FILTER} ORDER BY changed_at DESC, id DESC LIMIT $7 OFFSET $8"
        );

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(filter.table_name.as_deref())
            .bind(filter.record_id)
            .bind(filter.action)
            .bind(filter.from)
            .bind(filter.to)
            .bind(filter.changed_by)
            .fetch_one(&mut **transaction)
            .await?;

        let rows = sqlx::query(&page_query)
            .bind(filter.table_name.as_deref())
            .bind(filter.record_id)
            .bind(filter.action)
            .bind(filter.from)
            .bind(filter.to)
            .bind(filter.changed_by)
            .bind(page.limit as i64)
            .bind(page.offset as i64)
            .fetch_all(&mut **transaction)
            .await?;

        Ok(Page::new(
            rows_into(&rows)?,
            total as usize,
            page.limit,
            page.offset,
        ))
    }
}

#[async_trait]
impl QueryAuditRecords<Postgres> for AuditRecordRepositoryImpl {
    async fn query_audit_records(
        &self,
        filter: &AuditRecordFilter,
        page: PageRequest,
    ) -> Result<Page<AuditRecordModel>, Box<dyn Error + Send + Sync>> {
        self.query_audit_records_impl(filter, page).await
    }
}
