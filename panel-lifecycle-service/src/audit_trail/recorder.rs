use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use heapless::String as HeaplessString;
use panel_lifecycle_api::domain::{AuditAction, AuditLogPage, AuditLogView, GetAuditLogs};
use panel_lifecycle_api::error::{LifecycleError, LifecycleResult};
use panel_lifecycle_db::models::{bounded, AuditRecordModel, Auditable};
use panel_lifecycle_db::repository::{AuditRecordFilter, PageRequest};
use serde_json::Value;
use sqlx::Database;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::diff::{changed_fields, display_changes};
use super::resolver::DisplayNameResolver;
use crate::repositories::AuditRecordRepository;

pub struct AuditTrailRecorder<DB: Database> {
    audit_records: Arc<dyn AuditRecordRepository<DB>>,
    resolver: DisplayNameResolver<DB>,
}

impl<DB: Database> Clone for AuditTrailRecorder<DB> {
    fn clone(&self) -> Self {
        Self {
            audit_records: self.audit_records.clone(),
            resolver: self.resolver.clone(),
        }
    }
}

impl<DB: Database> AuditTrailRecorder<DB> {
    pub fn new(
        audit_records: Arc<dyn AuditRecordRepository<DB>>,
        resolver: DisplayNameResolver<DB>,
    ) -> Self {
        Self {
            audit_records,
            resolver,
        }
    }

    /// Records one change of `record_id` in `table_name`.
    ///
    /// `before == None` records a creation, `after == None` a deletion.
    /// Only the differing, non-structural fields are stored; a modification
    /// that changes none of them records nothing and returns `None`.
    pub async fn record(
        &self,
        table_name: &str,
        record_id: Uuid,
        before: Option<&Value>,
        after: Option<&Value>,
        actor_id: Uuid,
        description: Option<&str>,
    ) -> LifecycleResult<Option<AuditRecordModel>> {
        match prepare(table_name, record_id, before, after, actor_id, description)? {
            Some(record) => self.save(record).await.map(Some),
            None => Ok(None),
        }
    }

    /// Builds the sealed record of a modification without storing it.
    ///
    /// Writers link the row to `record.id`, write the row and only then
    /// [`save`](Self::save) the record, so a lost write leaves no record.
    pub fn prepare_modified<T: Auditable>(
        &self,
        before: &T,
        after: &T,
        actor_id: Uuid,
        description: Option<&str>,
    ) -> LifecycleResult<Option<AuditRecordModel>> {
        let (old, new) = (before.audit_snapshot(), after.audit_snapshot());
        prepare(
            T::TABLE_NAME,
            after.get_id(),
            Some(&old),
            Some(&new),
            actor_id,
            description,
        )
    }

    pub fn prepare_created<T: Auditable>(
        &self,
        entity: &T,
        actor_id: Uuid,
        description: Option<&str>,
    ) -> LifecycleResult<Option<AuditRecordModel>> {
        let after = entity.audit_snapshot();
        prepare(T::TABLE_NAME, entity.get_id(), None, Some(&after), actor_id, description)
    }

    pub async fn save(&self, record: AuditRecordModel) -> LifecycleResult<AuditRecordModel> {
        let mut saved = self
            .audit_records
            .create_batch(vec![record], None)
            .await?;
        let saved = saved
            .pop()
            .ok_or_else(|| LifecycleError::Storage("Audit record was not saved".to_string()))?;
        debug!(
            audit_log_id = %saved.id,
            table_name = %saved.table_name,
            record_id = %saved.record_id,
            action = ?saved.action,
            "Audit record written"
        );
        Ok(saved)
    }

    pub async fn record_created<T: Auditable>(
        &self,
        entity: &T,
        actor_id: Uuid,
        description: Option<&str>,
    ) -> LifecycleResult<Option<AuditRecordModel>> {
        let after = entity.audit_snapshot();
        self.record(T::TABLE_NAME, entity.get_id(), None, Some(&after), actor_id, description)
            .await
    }

    pub async fn record_modified<T: Auditable>(
        &self,
        before: &T,
        after: &T,
        actor_id: Uuid,
        description: Option<&str>,
    ) -> LifecycleResult<Option<AuditRecordModel>> {
        let (old, new) = (before.audit_snapshot(), after.audit_snapshot());
        self.record(
            T::TABLE_NAME,
            after.get_id(),
            Some(&old),
            Some(&new),
            actor_id,
            description,
        )
        .await
    }

    /// Deletion record for producers that remove auditable rows.
    pub async fn record_deleted<T: Auditable>(
        &self,
        entity: &T,
        actor_id: Uuid,
        description: Option<&str>,
    ) -> LifecycleResult<Option<AuditRecordModel>> {
        let before = entity.audit_snapshot();
        self.record(T::TABLE_NAME, entity.get_id(), Some(&before), None, actor_id, description)
            .await
    }

    /// Filtered, paginated audit trail, newest first.
    ///
    /// Storage applies every filter but the search term and counts the
    /// matches; the search term is applied to the materialized page
    /// afterwards. `total_count` is therefore the count before searching.
    #[instrument(
        skip(self, query),
        fields(table_name = ?query.table_name, record_id = ?query.record_id)
    )]
    pub async fn query(&self, query: &GetAuditLogs) -> LifecycleResult<AuditLogPage> {
        let page_number = query.clamped_page_number();
        let page_size = query.clamped_page_size();
        let filter = AuditRecordFilter {
            table_name: query
                .table_name
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
            record_id: query.record_id,
            action: query.action,
            from: query.from_date,
            to: query.to_date,
            changed_by: query.changed_by,
        };

        let page = self
            .audit_records
            .query_audit_records(&filter, PageRequest::for_page(page_size, page_number))
            .await?;
        let total_count = page.total;

        let mut items = Vec::with_capacity(page.items.len());
        for record in page.items {
            items.push(self.to_view(record).await);
        }
        if let Some(term) = query.search() {
            let term = term.to_lowercase();
            items.retain(|item| matches_search(item, &term));
        }

        Ok(AuditLogPage {
            items,
            total_count,
            page_number,
            page_size,
            total_pages: total_count.div_ceil(page_size),
        })
    }

    async fn to_view(&self, record: AuditRecordModel) -> AuditLogView {
        let entity_name = self
            .resolver
            .entity_name(&record.table_name, record.record_id)
            .await;
        let changed_by_name = self.resolver.user_name(record.changed_by).await;
        AuditLogView {
            id: record.id,
            table_name: record.table_name.to_string(),
            record_id: record.record_id,
            entity_name,
            action: record.action,
            changed_by: record.changed_by,
            changed_by_name,
            changed_at: record.changed_at,
            description: record.description.as_ref().map(|d| d.to_string()),
            changes: display_changes(record.old_values.as_ref(), record.new_values.as_ref()),
        }
    }
}

fn prepare(
    table_name: &str,
    record_id: Uuid,
    before: Option<&Value>,
    after: Option<&Value>,
    actor_id: Uuid,
    description: Option<&str>,
) -> LifecycleResult<Option<AuditRecordModel>> {
    let action = match (before, after) {
        (None, Some(_)) => AuditAction::Created,
        (Some(_), None) => AuditAction::Deleted,
        (Some(_), Some(_)) => AuditAction::Modified,
        (None, None) => {
            return Err(LifecycleError::InvalidInput(
                "An audit record needs a before or an after state".to_string(),
            ))
        }
    };

    let empty = Value::Object(Default::default());
    let (old, new) = changed_fields(before.unwrap_or(&empty), after.unwrap_or(&empty));
    if action == AuditAction::Modified && old.is_empty() && new.is_empty() {
        debug!(table_name, %record_id, "No audited field changed, nothing recorded");
        return Ok(None);
    }

    AuditRecordModel {
        id: Uuid::new_v4(),
        table_name: bounded(table_name, "Audit table name")?,
        record_id,
        action,
        old_values: before.map(|_| Value::Object(old)),
        new_values: after.map(|_| Value::Object(new)),
        changed_by: actor_id,
        // storage keeps microseconds; the seal must survive a round trip
        changed_at: Utc::now().trunc_subsecs(6),
        description: description.map(truncate_description),
        hash: 0,
    }
    .sealed()
    .map(Some)
    .map_err(LifecycleError::Storage)
}

fn truncate_description(description: &str) -> HeaplessString<200> {
    let mut out = HeaplessString::new();
    for c in description.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// `term` is already lower-cased.
fn matches_search(item: &AuditLogView, term: &str) -> bool {
    let contains = |s: &str| s.to_lowercase().contains(term);
    item.description.as_deref().is_some_and(contains)
        || contains(&item.table_name)
        || contains(&item.entity_name)
        || contains(&item.changed_by_name)
        || item.changes.iter().any(|change| {
            contains(&change.field) || contains(&change.old_value) || contains(&change.new_value)
        })
}
