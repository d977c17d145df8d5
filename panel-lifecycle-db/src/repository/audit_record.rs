use async_trait::async_trait;
use chrono::{DateTime, Utc};
use panel_lifecycle_api::domain::AuditAction;
use sqlx::Database;
use uuid::Uuid;

use crate::models::AuditRecordModel;
use crate::repository::pagination::{Page, PageRequest};
use crate::repository::RepositoryError;

/// Storage-side filter of the audit query. All criteria are conjunctive;
/// `None` means "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditRecordFilter {
    /// Case-insensitive
    pub table_name: Option<String>,
    pub record_id: Option<Uuid>,
    pub action: Option<AuditAction>,
    /// Inclusive
    pub from: Option<DateTime<Utc>>,
    /// Inclusive
    pub to: Option<DateTime<Utc>>,
    pub changed_by: Option<Uuid>,
}

impl AuditRecordFilter {
    pub fn matches(&self, record: &AuditRecordModel) -> bool {
        self.table_name
            .as_deref()
            .is_none_or(|t| t.eq_ignore_ascii_case(record.table_name.as_str()))
            && self.record_id.is_none_or(|id| id == record.record_id)
            && self.action.is_none_or(|a| a == record.action)
            && self.from.is_none_or(|from| record.changed_at >= from)
            && self.to.is_none_or(|to| record.changed_at <= to)
            && self.changed_by.is_none_or(|by| by == record.changed_by)
    }
}

/// Filtered audit records, newest first.
#[async_trait]
pub trait QueryAuditRecords<DB: Database>: Send + Sync {
    async fn query_audit_records(
        &self,
        filter: &AuditRecordFilter,
        page: PageRequest,
    ) -> Result<Page<AuditRecordModel>, RepositoryError>;
}
