use chrono::Utc;
use panel_lifecycle_api::error::{LifecycleError, LifecycleResult};
use panel_lifecycle_api::state_machine::{transition, GuardContext, PanelEvent, PanelTransition};
use panel_lifecycle_db::models::{BoxModel, PanelModel};
use sqlx::Database;
use tracing::{info, warn};
use uuid::Uuid;

use crate::audit_trail::AuditTrailRecorder;
use crate::repositories::LifecycleRepositories;

/// A panel locked for this unit of work, with its owning box.
pub(crate) struct LockedPanel {
    pub panel: PanelModel,
    pub owner: BoxModel,
}

impl LockedPanel {
    pub fn guard(&self) -> GuardContext {
        GuardContext {
            box_dispatched: self.owner.is_dispatched(),
        }
    }
}

pub(crate) struct Applied {
    pub panel: PanelModel,
    pub transition: PanelTransition,
    /// False when the transition changed no audited field and nothing was stored.
    pub written: bool,
}

/// Load, transition, audit and compare-and-write; the one write path for
/// panel state.
pub(crate) struct PanelWriter<DB: Database> {
    repos: LifecycleRepositories<DB>,
    recorder: AuditTrailRecorder<DB>,
}

impl<DB: Database> PanelWriter<DB> {
    pub fn new(repos: LifecycleRepositories<DB>, recorder: AuditTrailRecorder<DB>) -> Self {
        Self { repos, recorder }
    }

    /// Loads the panel `FOR UPDATE` and its box `FOR SHARE`.
    pub async fn lock(&self, panel_id: Uuid) -> LifecycleResult<LockedPanel> {
        let panel = self
            .repos
            .panels
            .load_for_update(panel_id)
            .await?
            .ok_or_else(|| {
                LifecycleError::NotFound(format!("Panel with ID {panel_id} not found"))
            })?;
        self.with_owner(panel).await
    }

    /// Attaches the owning box to an already locked panel.
    pub async fn with_owner(&self, panel: PanelModel) -> LifecycleResult<LockedPanel> {
        let owner = self.load_owner(panel.box_id).await?;
        Ok(LockedPanel { panel, owner })
    }

    /// Re-reads the box so a dispatch committed meanwhile is observed.
    pub async fn load_owner_of(&self, panel: &PanelModel) -> LifecycleResult<BoxModel> {
        self.load_owner(panel.box_id).await
    }

    async fn load_owner(&self, box_id: Uuid) -> LifecycleResult<BoxModel> {
        self.repos
            .boxes
            .load_for_share(box_id)
            .await?
            .ok_or_else(|| LifecycleError::NotFound(format!("Box with ID {box_id} not found")))
    }

    /// Runs `event` through the state machine and persists the result.
    ///
    /// Nothing is written when the state machine rejects the event. A
    /// transition that changes no audited field (an override to the current
    /// status) is accepted without a write. The audit record is stored after
    /// the versioned update, so a lost compare-and-write leaves no record.
    pub async fn apply(
        &self,
        locked: &LockedPanel,
        event: PanelEvent,
        actor_id: Uuid,
        description: &str,
    ) -> LifecycleResult<Applied> {
        let before = &locked.panel;
        let event_name = event.name();
        let t = transition(&before.snapshot(), event, &locked.guard()).inspect_err(|e| {
            warn!(panel_id = %before.id, event = event_name, error = %e, "Transition rejected");
        })?;

        let after = before.apply_transition(&t, actor_id, Utc::now())?;
        let Some(record) = self
            .recorder
            .prepare_modified(before, &after, actor_id, Some(description))?
        else {
            return Ok(Applied {
                panel: before.clone(),
                transition: t,
                written: false,
            });
        };

        let mut updated = self
            .repos
            .panels
            .update_batch(vec![after], Some(record.id))
            .await?;
        let panel = updated
            .pop()
            .ok_or_else(|| LifecycleError::Storage("Panel update returned no row".to_string()))?;
        let record = self.recorder.save(record).await?;

        info!(
            panel_id = %panel.id,
            event = event_name,
            from = %t.from,
            to = %t.to,
            audit_log_id = %record.id,
            "Panel transitioned"
        );
        Ok(Applied {
            panel,
            transition: t,
            written: true,
        })
    }
}
