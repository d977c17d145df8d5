use chrono::Utc;
use panel_lifecycle_api::cancel::CancellationToken;
use panel_lifecycle_api::domain::{
    ApprovalDecision, ApprovalStage, ApprovePanelFirstApproval, ApprovePanelSecondApproval,
    LifecycleEvent, PanelStatus, PanelView, UpdateBoxPanelStatus,
};
use panel_lifecycle_api::error::LifecycleResult;
use panel_lifecycle_api::state_machine::PanelEvent;
use sqlx::Database;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::audit_trail::AuditTrailRecorder;
use crate::outcome::Outcome;
use crate::repositories::LifecycleRepositories;
use crate::transition::PanelWriter;

/// Two-stage human sign-off of a panel plus the administrative override.
///
/// Runs inside the caller's unit of work; committing is the caller's job.
pub struct ApprovalGate<DB: Database> {
    writer: PanelWriter<DB>,
}

impl<DB: Database> ApprovalGate<DB> {
    pub fn new(repos: LifecycleRepositories<DB>, recorder: AuditTrailRecorder<DB>) -> Self {
        Self {
            writer: PanelWriter::new(repos, recorder),
        }
    }

    #[instrument(skip(self, command, cancel), fields(panel_id = %command.box_panel_id))]
    pub async fn approve_first(
        &self,
        command: ApprovePanelFirstApproval,
        actor_id: Uuid,
        cancel: &CancellationToken,
    ) -> LifecycleResult<Outcome<PanelView>> {
        command.validate()?;
        let decision: ApprovalDecision = command.approval_status.parse()?;
        self.decide(
            command.box_panel_id,
            ApprovalStage::First,
            decision,
            command.notes,
            actor_id,
            cancel,
        )
        .await
    }

    #[instrument(skip(self, command, cancel), fields(panel_id = %command.box_panel_id))]
    pub async fn approve_second(
        &self,
        command: ApprovePanelSecondApproval,
        actor_id: Uuid,
        cancel: &CancellationToken,
    ) -> LifecycleResult<Outcome<PanelView>> {
        command.validate()?;
        let decision: ApprovalDecision = command.approval_status.parse()?;
        self.decide(
            command.box_panel_id,
            ApprovalStage::Second,
            decision,
            command.notes,
            actor_id,
            cancel,
        )
        .await
    }

    /// Sets the status verbatim. Only the dispatched-box lock applies.
    ///
    /// Setting the current status again writes nothing and announces nothing.
    #[instrument(skip(self, command, cancel), fields(panel_id = %command.box_panel_id))]
    pub async fn update_status(
        &self,
        command: UpdateBoxPanelStatus,
        actor_id: Uuid,
        cancel: &CancellationToken,
    ) -> LifecycleResult<Outcome<PanelView>> {
        command.validate()?;
        let status: PanelStatus = command.panel_status.parse()?;
        cancel.check("before status update")?;

        let locked = self.writer.lock(command.box_panel_id).await?;
        let applied = self
            .writer
            .apply(
                &locked,
                PanelEvent::Override(status),
                actor_id,
                &format!("Panel status set to {status}"),
            )
            .await?;

        if !applied.written {
            return Ok(Outcome::quiet(applied.panel.to_view()));
        }
        let event = LifecycleEvent::StatusOverridden {
            panel_id: applied.panel.id,
            status: applied.panel.status,
            actor_id,
            occurred_at: Utc::now(),
        };
        Ok(Outcome::new(applied.panel.to_view(), vec![event]))
    }

    async fn decide(
        &self,
        panel_id: Uuid,
        stage: ApprovalStage,
        decision: ApprovalDecision,
        notes: Option<String>,
        actor_id: Uuid,
        cancel: &CancellationToken,
    ) -> LifecycleResult<Outcome<PanelView>> {
        cancel.check("before approval")?;

        let locked = self.writer.lock(panel_id).await?;
        let event = match stage {
            ApprovalStage::First => PanelEvent::ApproveFirst { decision, notes },
            ApprovalStage::Second => PanelEvent::ApproveSecond { decision, notes },
        };
        let applied = self
            .writer
            .apply(
                &locked,
                event,
                actor_id,
                &format!("{stage} approval {decision}"),
            )
            .await?;

        let event = LifecycleEvent::ApprovalDecided {
            panel_id,
            stage,
            status: decision.into(),
            actor_id,
            occurred_at: Utc::now(),
        };
        Ok(Outcome::new(applied.panel.to_view(), vec![event]))
    }
}
