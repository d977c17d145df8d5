use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::{ApprovalStage, ApprovalStatus, PanelStatus, ScanType};

/// Outbound notification emitted after a lifecycle change has been committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LifecycleEvent {
    #[serde(rename_all = "camelCase")]
    ApprovalDecided {
        panel_id: Uuid,
        stage: ApprovalStage,
        status: ApprovalStatus,
        actor_id: Uuid,
        occurred_at: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    PanelScanned {
        panel_id: Uuid,
        barcode: String,
        scan_type: ScanType,
        status: PanelStatus,
        actor_id: Uuid,
        occurred_at: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    StatusOverridden {
        panel_id: Uuid,
        status: PanelStatus,
        actor_id: Uuid,
        occurred_at: DateTime<Utc>,
    },
}

impl LifecycleEvent {
    pub fn panel_id(&self) -> Uuid {
        match self {
            LifecycleEvent::ApprovalDecided { panel_id, .. }
            | LifecycleEvent::PanelScanned { panel_id, .. }
            | LifecycleEvent::StatusOverridden { panel_id, .. } => *panel_id,
        }
    }
}
