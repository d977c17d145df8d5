use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use panel_lifecycle_api::error::LifecycleError;
use panel_lifecycle_db::models::AuditEntityKind;
use panel_lifecycle_db::repository::DisplayNameLookup;
use sqlx::Database;
use tracing::warn;
use uuid::Uuid;

/// Shown when a display name cannot be resolved.
pub const UNKNOWN_DISPLAY_NAME: &str = "Unknown";

const CACHE_CAPACITY: u64 = 10_000;
const CACHE_TTL: Duration = Duration::from_secs(300);

/// Resolves entity and actor display names for audit views.
///
/// Resolution never fails: lookup errors and misses are logged and degrade
/// to [`UNKNOWN_DISPLAY_NAME`]. Only hits are cached.
pub struct DisplayNameResolver<DB: Database> {
    lookup: Arc<dyn DisplayNameLookup<DB>>,
    cache: Cache<(AuditEntityKind, Uuid), String>,
}

impl<DB: Database> Clone for DisplayNameResolver<DB> {
    fn clone(&self) -> Self {
        Self {
            lookup: self.lookup.clone(),
            cache: self.cache.clone(),
        }
    }
}

impl<DB: Database> DisplayNameResolver<DB> {
    pub fn new(lookup: Arc<dyn DisplayNameLookup<DB>>) -> Self {
        Self::with_cache(
            lookup,
            Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(CACHE_TTL)
                .build(),
        )
    }

    /// Shares an existing cache, e.g. one kept across units of work.
    pub fn with_cache(
        lookup: Arc<dyn DisplayNameLookup<DB>>,
        cache: Cache<(AuditEntityKind, Uuid), String>,
    ) -> Self {
        Self { lookup, cache }
    }

    pub async fn entity_name(&self, table_name: &str, record_id: Uuid) -> String {
        self.resolve(AuditEntityKind::from_table_name(table_name), record_id)
            .await
    }

    pub async fn user_name(&self, user_id: Uuid) -> String {
        self.resolve(AuditEntityKind::User, user_id).await
    }

    async fn resolve(&self, kind: AuditEntityKind, id: Uuid) -> String {
        if kind == AuditEntityKind::Unknown {
            return UNKNOWN_DISPLAY_NAME.to_string();
        }
        if let Some(name) = self.cache.get(&(kind, id)).await {
            return name;
        }

        match self.lookup.lookup_display_reference(kind, id).await {
            Ok(Some(reference)) => {
                let name = reference.display_name();
                self.cache.insert((kind, id), name.clone()).await;
                name
            }
            Ok(None) => {
                let failure =
                    LifecycleError::ResolutionFailure(format!("{kind:?} {id} not found"));
                warn!(error = %failure, "Display name unresolved");
                UNKNOWN_DISPLAY_NAME.to_string()
            }
            Err(e) => {
                let failure = LifecycleError::ResolutionFailure(format!(
                    "Failed to resolve {kind:?} {id}: {e}"
                ));
                warn!(error = %failure, "Display name unresolved");
                UNKNOWN_DISPLAY_NAME.to_string()
            }
        }
    }
}
