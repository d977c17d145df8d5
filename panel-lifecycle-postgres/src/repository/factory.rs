use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use panel_lifecycle_db::models::audit::AuditEntityKind;
use panel_lifecycle_service::audit_trail::DisplayNameResolver;
use panel_lifecycle_service::{AuditTrailRecorder, LifecycleRepositories};
use sqlx::Postgres;
use uuid::Uuid;

use super::audit::{AuditRecordRepositoryImpl, DisplayNameRepositoryImpl};
use super::panel::{
    BoxRepositoryImpl, PanelRepositoryImpl, PanelTypeRepositoryImpl, ScanLogRepositoryImpl,
};
use crate::unit_of_work::Session;

const DISPLAY_NAME_CAPACITY: u64 = 10_000;
const DISPLAY_NAME_TTL: Duration = Duration::from_secs(300);

/// Builds the repositories of one session.
///
/// Holds the state that outlives a session, currently the display name
/// cache of the audit trail. Use one instance per process.
pub struct LifecycleRepoFactory {
    display_name_cache: Cache<(AuditEntityKind, Uuid), String>,
}

impl LifecycleRepoFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            display_name_cache: Cache::builder()
                .max_capacity(DISPLAY_NAME_CAPACITY)
                .time_to_live(DISPLAY_NAME_TTL)
                .build(),
        })
    }

    pub fn build_panel_repo(&self, session: &Session) -> Arc<PanelRepositoryImpl> {
        Arc::new(PanelRepositoryImpl::new(session.executor().clone()))
    }

    pub fn build_box_repo(&self, session: &Session) -> Arc<BoxRepositoryImpl> {
        Arc::new(BoxRepositoryImpl::new(session.executor().clone()))
    }

    pub fn build_panel_type_repo(&self, session: &Session) -> Arc<PanelTypeRepositoryImpl> {
        Arc::new(PanelTypeRepositoryImpl::new(session.executor().clone()))
    }

    pub fn build_scan_log_repo(&self, session: &Session) -> Arc<ScanLogRepositoryImpl> {
        Arc::new(ScanLogRepositoryImpl::new(session.executor().clone()))
    }

    pub fn build_audit_record_repo(&self, session: &Session) -> Arc<AuditRecordRepositoryImpl> {
        Arc::new(AuditRecordRepositoryImpl::new(session.executor().clone()))
    }

    pub fn build_display_name_repo(&self, session: &Session) -> Arc<DisplayNameRepositoryImpl> {
        Arc::new(DisplayNameRepositoryImpl::new(session.executor().clone()))
    }

    /// All repositories, sharing the session's transaction.
    pub fn build_all_repos(&self, session: &Session) -> LifecycleRepositories<Postgres> {
        LifecycleRepositories {
            panels: self.build_panel_repo(session),
            boxes: self.build_box_repo(session),
            panel_types: self.build_panel_type_repo(session),
            scan_logs: self.build_scan_log_repo(session),
            audit_records: self.build_audit_record_repo(session),
            display_names: self.build_display_name_repo(session),
        }
    }

    /// Audit recorder over `repos`, resolving names through the shared cache.
    pub fn build_recorder(&self, repos: &LifecycleRepositories<Postgres>) -> AuditTrailRecorder<Postgres> {
        AuditTrailRecorder::new(
            repos.audit_records.clone(),
            DisplayNameResolver::with_cache(
                repos.display_names.clone(),
                self.display_name_cache.clone(),
            ),
        )
    }
}
