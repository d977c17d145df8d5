use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use panel_lifecycle_api::domain::{
    ApprovalSlotView, ApprovalStage, ApprovalStatus, PanelLocationStatus, PanelStatus, PanelView,
};
use panel_lifecycle_api::error::{LifecycleError, LifecycleResult};
use panel_lifecycle_api::state_machine::{Milestone, PanelSnapshot, PanelTransition, SlotUpdate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::auditable::Auditable;
use crate::models::identifiable::Identifiable;

/// # Documentation
/// A manufactured panel belonging to exactly one box (table `box_panel`).
/// Panels are never hard-deleted; their lifecycle is status driven.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelModel {
    pub id: Uuid,

    /// Owning box
    pub box_id: Uuid,

    /// Template the panel was cloned from when the box was created
    pub panel_type_id: Option<Uuid>,

    pub name: HeaplessString<100>,

    /// Immutable once assigned
    pub barcode: Option<HeaplessString<50>>,

    pub status: PanelStatus,

    pub first_approval_status: Option<ApprovalStatus>,
    pub first_approval_by: Option<Uuid>,
    pub first_approval_at: Option<DateTime<Utc>>,
    pub first_approval_notes: Option<HeaplessString<500>>,

    pub second_approval_status: Option<ApprovalStatus>,
    pub second_approval_by: Option<Uuid>,
    pub second_approval_at: Option<DateTime<Utc>>,
    pub second_approval_notes: Option<HeaplessString<500>>,

    pub location_status: Option<PanelLocationStatus>,
    pub dispatched_at: Option<DateTime<Utc>>,
    pub arrived_at: Option<DateTime<Utc>>,
    pub installed_at: Option<DateTime<Utc>>,

    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_modified_by: Option<Uuid>,
    pub last_modified_at: Option<DateTime<Utc>>,

    /// Row version for compare-and-write
    /// - 0: for new entities not yet created
    /// - Incremented by every persisted update
    pub version: i32,

    /// Reference to the most recent audit record for this panel
    /// - None: for new entities not yet created
    /// - Some(uuid): updated on every create/update operation
    pub audit_log_id: Option<Uuid>,
}

impl Identifiable for PanelModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl Auditable for PanelModel {
    const TABLE_NAME: &'static str = "box_panel";

    fn get_audit_log_id(&self) -> Option<Uuid> {
        self.audit_log_id
    }

    fn audit_snapshot(&self) -> Value {
        let snapshot = PanelAuditSnapshot {
            id: self.id,
            box_id: self.box_id,
            name: self.name.as_str(),
            barcode: self.barcode.as_deref(),
            panel_status: self.status,
            first_approval_status: self.first_approval_status,
            first_approval_by: self.first_approval_by,
            first_approval_date: self.first_approval_at,
            first_approval_notes: self.first_approval_notes.as_deref(),
            second_approval_status: self.second_approval_status,
            second_approval_by: self.second_approval_by,
            second_approval_date: self.second_approval_at,
            second_approval_notes: self.second_approval_notes.as_deref(),
            location_status: self.location_status,
            dispatch_date: self.dispatched_at,
            arrival_date: self.arrived_at,
            install_date: self.installed_at,
            modified_by: self.last_modified_by,
            modified_date: self.last_modified_at,
            version: self.version,
        };
        serde_json::to_value(snapshot).unwrap_or(Value::Null)
    }
}

/// Field names as they appear in the audit trail.
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct PanelAuditSnapshot<'a> {
    id: Uuid,
    box_id: Uuid,
    name: &'a str,
    barcode: Option<&'a str>,
    panel_status: PanelStatus,
    first_approval_status: Option<ApprovalStatus>,
    first_approval_by: Option<Uuid>,
    first_approval_date: Option<DateTime<Utc>>,
    first_approval_notes: Option<&'a str>,
    second_approval_status: Option<ApprovalStatus>,
    second_approval_by: Option<Uuid>,
    second_approval_date: Option<DateTime<Utc>>,
    second_approval_notes: Option<&'a str>,
    location_status: Option<PanelLocationStatus>,
    dispatch_date: Option<DateTime<Utc>>,
    arrival_date: Option<DateTime<Utc>>,
    install_date: Option<DateTime<Utc>>,
    modified_by: Option<Uuid>,
    modified_date: Option<DateTime<Utc>>,
    version: i32,
}

impl PanelModel {
    /// A fresh panel in `NotStarted`, not yet persisted.
    pub fn new(
        box_id: Uuid,
        panel_type_id: Option<Uuid>,
        name: &str,
        created_by: Uuid,
        created_at: DateTime<Utc>,
    ) -> LifecycleResult<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            box_id,
            panel_type_id,
            name: bounded(name, "Panel name")?,
            barcode: None,
            status: PanelStatus::NotStarted,
            first_approval_status: None,
            first_approval_by: None,
            first_approval_at: None,
            first_approval_notes: None,
            second_approval_status: None,
            second_approval_by: None,
            second_approval_at: None,
            second_approval_notes: None,
            location_status: Some(PanelLocationStatus::AtFactory),
            dispatched_at: None,
            arrived_at: None,
            installed_at: None,
            created_by,
            created_at,
            last_modified_by: None,
            last_modified_at: None,
            version: 0,
            audit_log_id: None,
        })
    }

    pub fn snapshot(&self) -> PanelSnapshot {
        PanelSnapshot {
            status: self.status,
            first_approval: self.first_approval_status,
            second_approval: self.second_approval_status,
        }
    }

    /// Returns a copy of this panel with the transition's side effects applied
    /// and the actor stamped on every touched slot and on last-modified.
    pub fn apply_transition(
        &self,
        transition: &PanelTransition,
        actor_id: Uuid,
        at: DateTime<Utc>,
    ) -> LifecycleResult<PanelModel> {
        let mut next = self.clone();
        next.status = transition.to;

        for update in &transition.slot_updates {
            match update {
                SlotUpdate::Decide {
                    stage,
                    status,
                    notes,
                } => {
                    let notes = notes
                        .as_deref()
                        .map(|n| bounded::<500>(n, "Approval notes"))
                        .transpose()?;
                    match stage {
                        ApprovalStage::First => {
                            next.first_approval_status = Some(*status);
                            next.first_approval_by = Some(actor_id);
                            next.first_approval_at = Some(at);
                            next.first_approval_notes = notes;
                        }
                        ApprovalStage::Second => {
                            next.second_approval_status = Some(*status);
                            next.second_approval_by = Some(actor_id);
                            next.second_approval_at = Some(at);
                            next.second_approval_notes = notes;
                        }
                    }
                }
                SlotUpdate::Seed { stage } => match stage {
                    ApprovalStage::First => {
                        next.first_approval_status = Some(ApprovalStatus::Pending);
                        next.first_approval_by = None;
                        next.first_approval_at = None;
                        next.first_approval_notes = None;
                    }
                    ApprovalStage::Second => {
                        next.second_approval_status = Some(ApprovalStatus::Pending);
                        next.second_approval_by = None;
                        next.second_approval_at = None;
                        next.second_approval_notes = None;
                    }
                },
            }
        }

        if let Some(location) = transition.location_status {
            next.location_status = Some(location);
        }
        match transition.milestone {
            Some(Milestone::Dispatched) => next.dispatched_at = Some(at),
            Some(Milestone::Arrived) => next.arrived_at = Some(at),
            Some(Milestone::Installed) => next.installed_at = Some(at),
            None => {}
        }

        next.last_modified_by = Some(actor_id);
        next.last_modified_at = Some(at);
        Ok(next)
    }

    /// Assigns the barcode; fails when the panel already carries one.
    pub fn with_barcode(&self, barcode: &str) -> LifecycleResult<PanelModel> {
        if let Some(existing) = &self.barcode {
            return Err(LifecycleError::PreconditionFailed(format!(
                "Panel already has barcode {existing}; barcodes never change."
            )));
        }
        let mut next = self.clone();
        next.barcode = Some(bounded(barcode, "Barcode")?);
        Ok(next)
    }

    pub fn to_view(&self) -> PanelView {
        PanelView {
            id: self.id,
            box_id: self.box_id,
            name: self.name.to_string(),
            barcode: self.barcode.as_ref().map(|b| b.to_string()),
            status: self.status,
            first_approval: ApprovalSlotView {
                status: self.first_approval_status,
                actor_id: self.first_approval_by,
                decided_at: self.first_approval_at,
                notes: self.first_approval_notes.as_ref().map(|n| n.to_string()),
            },
            second_approval: ApprovalSlotView {
                status: self.second_approval_status,
                actor_id: self.second_approval_by,
                decided_at: self.second_approval_at,
                notes: self.second_approval_notes.as_ref().map(|n| n.to_string()),
            },
            location_status: self.location_status,
            dispatched_at: self.dispatched_at,
            arrived_at: self.arrived_at,
            installed_at: self.installed_at,
            last_modified_by: self.last_modified_by,
            last_modified_at: self.last_modified_at,
        }
    }
}

/// Copies `value` into a bounded string, rejecting input that does not fit.
pub fn bounded<const N: usize>(value: &str, what: &str) -> LifecycleResult<HeaplessString<N>> {
    HeaplessString::try_from(value)
        .map_err(|_| LifecycleError::InvalidInput(format!("{what} exceeds {N} bytes")))
}
