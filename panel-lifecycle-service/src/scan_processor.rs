use chrono::Utc;
use panel_lifecycle_api::cancel::CancellationToken;
use panel_lifecycle_api::domain::{
    ApprovalDecision, ApprovalStage, ApprovalStatus, LifecycleEvent, PanelStatus, ScanLogView,
    ScanOutcome, ScanPanelBarcode, ScanType,
};
use panel_lifecycle_api::error::{LifecycleError, LifecycleResult};
use panel_lifecycle_api::state_machine::PanelEvent;
use panel_lifecycle_db::models::{bounded, ScanLogModel};
use panel_lifecycle_db::repository::PageRequest;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use sqlx::Database;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::audit_trail::AuditTrailRecorder;
use crate::outcome::Outcome;
use crate::repositories::LifecycleRepositories;
use crate::transition::{LockedPanel, PanelWriter};

/// Note stamped on the first approval granted by a site arrival scan.
pub const AUTO_APPROVAL_NOTE: &str = "Auto-approved via barcode scan";

const MAX_SCAN_HISTORY_PAGE: usize = 100;

/// Turns barcode scans into scan log entries and panel transitions.
///
/// Business rule: scanning a panel on site arrival is itself the first
/// quality gate. A `SiteArrival` scan therefore grants the first approval
/// unless it has already been granted.
pub struct ScanEventProcessor<DB: Database> {
    repos: LifecycleRepositories<DB>,
    writer: PanelWriter<DB>,
}

impl<DB: Database> ScanEventProcessor<DB> {
    pub fn new(repos: LifecycleRepositories<DB>, recorder: AuditTrailRecorder<DB>) -> Self {
        Self {
            writer: PanelWriter::new(repos.clone(), recorder),
            repos,
        }
    }

    /// Processes one scan.
    ///
    /// Lookup and lock failures return `Err` and write nothing. Once the
    /// panel is resolved the scan log entry is always written; a rule
    /// rejection or cancellation after that point is reported in
    /// `ScanOutcome::transition_error` so the entry can be committed. A lost
    /// write or storage failure returns `Err` and the unit of work must be
    /// rolled back.
    #[instrument(
        skip(self, command, cancel),
        fields(barcode = %command.barcode, scan_type = %command.scan_type)
    )]
    pub async fn process_scan(
        &self,
        command: ScanPanelBarcode,
        actor_id: Uuid,
        cancel: &CancellationToken,
    ) -> LifecycleResult<Outcome<ScanOutcome>> {
        command.validate()?;
        let scan_type: ScanType = command.scan_type.parse()?;
        cancel.check("before scan")?;

        let panel = self
            .repos
            .panels
            .find_by_barcode(&command.barcode)
            .await?
            .ok_or_else(|| {
                LifecycleError::NotFound(format!(
                    "Panel with barcode '{}' not found",
                    command.barcode
                ))
            })?;
        let locked = self.writer.with_owner(panel).await?;
        if locked.owner.is_dispatched() {
            warn!(
                panel_id = %locked.panel.id,
                box_id = %locked.owner.id,
                "Scan rejected, box is dispatched"
            );
            return Err(LifecycleError::box_dispatched("scan"));
        }

        let scan_log = self.append_scan_log(&command, scan_type, &locked, actor_id).await?;

        let mut progress = Progress::new(locked);
        let result = match cancel.check("after scan log append") {
            Ok(()) => self.run(scan_type, &mut progress, actor_id).await,
            Err(cancelled) => Err(cancelled),
        };
        let transition_error = match result {
            Ok(()) => None,
            Err(e) if e.is_domain() || matches!(e, LifecycleError::Cancelled(_)) => {
                warn!(
                    panel_id = %progress.locked.panel.id,
                    error = %e,
                    "Scan logged, transition not applied"
                );
                Some(e)
            }
            Err(e) => {
                warn!(panel_id = %progress.locked.panel.id, error = %e, "Scan aborted");
                return Err(e);
            }
        };

        let panel = progress.locked.panel;
        info!(
            panel_id = %panel.id,
            %scan_type,
            status = %panel.status,
            auto_approved = progress.auto_approved,
            "Scan processed"
        );

        let now = Utc::now();
        let mut events = vec![LifecycleEvent::PanelScanned {
            panel_id: panel.id,
            barcode: scan_log.barcode.clone(),
            scan_type,
            status: panel.status,
            actor_id,
            occurred_at: now,
        }];
        if progress.auto_approved {
            events.push(LifecycleEvent::ApprovalDecided {
                panel_id: panel.id,
                stage: ApprovalStage::First,
                status: ApprovalStatus::Approved,
                actor_id,
                occurred_at: now,
            });
        }

        Ok(Outcome::new(
            ScanOutcome {
                scan_log,
                panel: panel.to_view(),
                applied: progress.applied,
                auto_approved: progress.auto_approved,
                transition_error,
            },
            events,
        ))
    }

    /// Scan log of a panel, oldest first.
    pub async fn scan_history(
        &self,
        panel_id: Uuid,
        page_number: usize,
        page_size: usize,
    ) -> LifecycleResult<Vec<ScanLogView>> {
        let exists = self.repos.panels.exist_by_ids(&[panel_id]).await?;
        if !exists.iter().any(|(id, found)| *id == panel_id && *found) {
            return Err(LifecycleError::NotFound(format!(
                "Panel with ID {panel_id} not found"
            )));
        }
        let page = PageRequest::for_page(page_size.clamp(1, MAX_SCAN_HISTORY_PAGE), page_number);
        let logs = self.repos.scan_logs.load_scan_logs(panel_id, page).await?;
        Ok(logs.items.iter().map(ScanLogModel::to_view).collect())
    }

    async fn append_scan_log(
        &self,
        command: &ScanPanelBarcode,
        scan_type: ScanType,
        locked: &LockedPanel,
        actor_id: Uuid,
    ) -> LifecycleResult<ScanLogView> {
        let entry = ScanLogModel {
            id: Uuid::new_v4(),
            panel_id: locked.panel.id,
            barcode: bounded(&command.barcode, "Barcode")?,
            scan_type,
            scan_location: command
                .scan_location
                .as_deref()
                .map(|l| bounded(l, "Scan location"))
                .transpose()?,
            latitude: command.latitude.and_then(coordinate),
            longitude: command.longitude.and_then(coordinate),
            scanned_by: actor_id,
            scanned_at: Utc::now(),
            notes: command
                .notes
                .as_deref()
                .map(|n| bounded(n, "Scan notes"))
                .transpose()?,
        };
        let mut saved = self.repos.scan_logs.create_batch(vec![entry], None).await?;
        saved
            .pop()
            .map(|log| log.to_view())
            .ok_or_else(|| LifecycleError::Storage("Scan log entry was not saved".to_string()))
    }

    async fn run(
        &self,
        scan_type: ScanType,
        progress: &mut Progress,
        actor_id: Uuid,
    ) -> LifecycleResult<()> {
        let description = format!("{scan_type} scan");
        match scan_type {
            ScanType::Dispatch => {
                self.step(progress, PanelEvent::Dispatch, actor_id, &description)
                    .await
            }
            ScanType::Installation => {
                self.step(progress, PanelEvent::Install, actor_id, &description)
                    .await
            }
            ScanType::Inspection => Ok(()),
            ScanType::SiteArrival => {
                self.step(progress, PanelEvent::Arrive, actor_id, &description)
                    .await?;
                if progress.locked.panel.first_approval_status == Some(ApprovalStatus::Approved) {
                    return Ok(());
                }
                progress.refresh_owner(&self.writer).await?;
                let approve = PanelEvent::ApproveFirst {
                    decision: ApprovalDecision::Approved,
                    notes: Some(AUTO_APPROVAL_NOTE.to_string()),
                };
                self.step(progress, approve, actor_id, AUTO_APPROVAL_NOTE)
                    .await?;
                progress.auto_approved = true;
                Ok(())
            }
        }
    }

    async fn step(
        &self,
        progress: &mut Progress,
        event: PanelEvent,
        actor_id: Uuid,
        description: &str,
    ) -> LifecycleResult<()> {
        let applied = self
            .writer
            .apply(&progress.locked, event, actor_id, description)
            .await?;
        progress.applied.extend(applied.transition.path);
        progress.locked.panel = applied.panel;
        Ok(())
    }
}

/// State carried across the steps of one scan.
struct Progress {
    locked: LockedPanel,
    applied: Vec<PanelStatus>,
    auto_approved: bool,
}

impl Progress {
    fn new(locked: LockedPanel) -> Self {
        Self {
            locked,
            applied: Vec::new(),
            auto_approved: false,
        }
    }

    async fn refresh_owner<DB: Database>(
        &mut self,
        writer: &PanelWriter<DB>,
    ) -> LifecycleResult<()> {
        let owner = writer.load_owner_of(&self.locked.panel).await?;
        self.locked.owner = owner;
        Ok(())
    }
}

fn coordinate(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value).map(|d| d.round_dp(6))
}
