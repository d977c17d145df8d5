use async_trait::async_trait;
use uuid::Uuid;

use crate::cancel::CancellationToken;
use crate::domain::{
    ApprovePanelFirstApproval, ApprovePanelSecondApproval, AuditLogPage, GetAuditLogs, PanelView,
    ScanLogView, ScanOutcome, ScanPanelBarcode, UpdateBoxPanelStatus,
};
use crate::error::LifecycleResult;

/// Two-stage human sign-off and the administrative status override.
#[async_trait]
pub trait PanelApprovalService: Send + Sync {
    async fn approve_first(
        &self,
        command: ApprovePanelFirstApproval,
        actor_id: Uuid,
        cancel: &CancellationToken,
    ) -> LifecycleResult<PanelView>;

    async fn approve_second(
        &self,
        command: ApprovePanelSecondApproval,
        actor_id: Uuid,
        cancel: &CancellationToken,
    ) -> LifecycleResult<PanelView>;

    async fn update_status(
        &self,
        command: UpdateBoxPanelStatus,
        actor_id: Uuid,
        cancel: &CancellationToken,
    ) -> LifecycleResult<PanelView>;
}

/// Barcode-driven field events.
#[async_trait]
pub trait PanelScanService: Send + Sync {
    async fn scan(
        &self,
        command: ScanPanelBarcode,
        actor_id: Uuid,
        cancel: &CancellationToken,
    ) -> LifecycleResult<ScanOutcome>;

    /// Scan log of a panel, oldest first.
    async fn scan_history(
        &self,
        panel_id: Uuid,
        page_number: usize,
        page_size: usize,
    ) -> LifecycleResult<Vec<ScanLogView>>;
}

#[async_trait]
pub trait AuditLogService: Send + Sync {
    async fn get_audit_logs(&self, query: GetAuditLogs) -> LifecycleResult<AuditLogPage>;
}
