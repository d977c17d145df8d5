//! Authoritative transition function for panel lifecycle state.
//!
//! `transition` is pure: it inspects a snapshot of the panel, the proposed
//! event and the guard context, and returns the new status together with
//! every side effect the caller must apply. Callers apply the result to a
//! freshly loaded row and persist it with a single compare-and-write, so a
//! panel is never mutated through more than one path before it is stored.

use serde::{Deserialize, Serialize};

use crate::domain::{
    ApprovalDecision, ApprovalStage, ApprovalStatus, PanelLocationStatus, PanelStatus,
};
use crate::error::{LifecycleError, LifecycleResult};

/// The parts of a panel the transition rules look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelSnapshot {
    pub status: PanelStatus,
    pub first_approval: Option<ApprovalStatus>,
    pub second_approval: Option<ApprovalStatus>,
}

impl PanelSnapshot {
    pub fn new(status: PanelStatus) -> Self {
        Self {
            status,
            first_approval: None,
            second_approval: None,
        }
    }
}

/// Facts outside the panel row that gate every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GuardContext {
    pub box_dispatched: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelEvent {
    ApproveFirst {
        decision: ApprovalDecision,
        notes: Option<String>,
    },
    ApproveSecond {
        decision: ApprovalDecision,
        notes: Option<String>,
    },
    Dispatch,
    Arrive,
    Install,
    /// Administrative status override
    Override(PanelStatus),
}

impl PanelEvent {
    /// Verb used in user-facing rejection messages.
    pub fn verb(&self) -> &'static str {
        match self {
            PanelEvent::ApproveFirst { .. } | PanelEvent::ApproveSecond { .. } => "approve",
            PanelEvent::Dispatch | PanelEvent::Arrive | PanelEvent::Install => "scan",
            PanelEvent::Override(_) => "update",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PanelEvent::ApproveFirst { .. } => "ApproveFirst",
            PanelEvent::ApproveSecond { .. } => "ApproveSecond",
            PanelEvent::Dispatch => "Dispatch",
            PanelEvent::Arrive => "Arrive",
            PanelEvent::Install => "Install",
            PanelEvent::Override(_) => "Override",
        }
    }
}

/// Change to one approval slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotUpdate {
    /// A human decision; the caller stamps actor and timestamp.
    Decide {
        stage: ApprovalStage,
        status: ApprovalStatus,
        notes: Option<String>,
    },
    /// Reset the slot to Pending with no actor, timestamp or notes.
    Seed { stage: ApprovalStage },
}

/// Timestamp column a transition stamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Milestone {
    Dispatched,
    Arrived,
    Installed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelTransition {
    pub from: PanelStatus,
    pub to: PanelStatus,
    /// Every status entered, in order; the last element equals `to`
    pub path: Vec<PanelStatus>,
    pub slot_updates: Vec<SlotUpdate>,
    pub location_status: Option<PanelLocationStatus>,
    pub milestone: Option<Milestone>,
}

impl PanelTransition {
    fn entering(from: PanelStatus, path: Vec<PanelStatus>) -> Self {
        let to = *path.last().unwrap_or(&from);
        Self {
            from,
            to,
            path,
            slot_updates: Vec::new(),
            location_status: None,
            milestone: None,
        }
    }

    fn with_slot(mut self, update: SlotUpdate) -> Self {
        self.slot_updates.push(update);
        self
    }

    fn with_location(mut self, location: PanelLocationStatus) -> Self {
        self.location_status = Some(location);
        self
    }

    fn with_milestone(mut self, milestone: Milestone) -> Self {
        self.milestone = Some(milestone);
        self
    }

    /// The resulting approval slot states, for invariant checks.
    pub fn resulting_snapshot(&self, before: &PanelSnapshot) -> PanelSnapshot {
        let mut after = PanelSnapshot {
            status: self.to,
            ..*before
        };
        for update in &self.slot_updates {
            let (stage, status) = match update {
                SlotUpdate::Decide { stage, status, .. } => (*stage, *status),
                SlotUpdate::Seed { stage } => (*stage, ApprovalStatus::Pending),
            };
            match stage {
                ApprovalStage::First => after.first_approval = Some(status),
                ApprovalStage::Second => after.second_approval = Some(status),
            }
        }
        after
    }
}

/// Computes the transition for `event` applied to `current`.
///
/// Guards run before anything else and in a fixed order: the dispatched box
/// lock, terminal states, then the event's own preconditions.
pub fn transition(
    current: &PanelSnapshot,
    event: PanelEvent,
    guard: &GuardContext,
) -> LifecycleResult<PanelTransition> {
    if guard.box_dispatched {
        return Err(LifecycleError::box_dispatched(event.verb()));
    }

    let from = current.status;

    if from.is_terminal() && !matches!(event, PanelEvent::Override(_)) {
        return Err(LifecycleError::PreconditionFailed(format!(
            "Panel is {from} and accepts no further {} events.",
            event.name()
        )));
    }

    match event {
        PanelEvent::ApproveFirst { decision, notes } => {
            if current.first_approval == Some(ApprovalStatus::Approved) {
                return Err(LifecycleError::PreconditionFailed(
                    "First approval has already been granted.".to_string(),
                ));
            }
            let decided = SlotUpdate::Decide {
                stage: ApprovalStage::First,
                status: decision.into(),
                notes,
            };
            Ok(match decision {
                ApprovalDecision::Approved => PanelTransition::entering(
                    from,
                    vec![
                        PanelStatus::FirstApprovalApproved,
                        PanelStatus::SecondApprovalPending,
                    ],
                )
                .with_slot(decided)
                .with_slot(SlotUpdate::Seed {
                    stage: ApprovalStage::Second,
                }),
                ApprovalDecision::Rejected => {
                    PanelTransition::entering(from, vec![PanelStatus::FirstApprovalRejected])
                        .with_slot(decided)
                        .with_location(PanelLocationStatus::Rejected)
                }
            })
        }
        PanelEvent::ApproveSecond { decision, notes } => {
            if current.first_approval != Some(ApprovalStatus::Approved) {
                return Err(LifecycleError::PreconditionFailed(
                    "First approval must be approved before second approval.".to_string(),
                ));
            }
            if current.second_approval == Some(ApprovalStatus::Approved) {
                return Err(LifecycleError::PreconditionFailed(
                    "Second approval has already been granted.".to_string(),
                ));
            }
            let decided = SlotUpdate::Decide {
                stage: ApprovalStage::Second,
                status: decision.into(),
                notes,
            };
            Ok(match decision {
                ApprovalDecision::Approved => {
                    PanelTransition::entering(from, vec![PanelStatus::SecondApprovalApproved])
                        .with_slot(decided)
                }
                ApprovalDecision::Rejected => {
                    PanelTransition::entering(from, vec![PanelStatus::SecondApprovalRejected])
                        .with_slot(decided)
                        .with_location(PanelLocationStatus::Rejected)
                }
            })
        }
        PanelEvent::Dispatch => Ok(PanelTransition::entering(from, vec![PanelStatus::InTransit])
            .with_location(PanelLocationStatus::InTransit)
            .with_milestone(Milestone::Dispatched)),
        PanelEvent::Arrive => Ok(PanelTransition::entering(from, vec![PanelStatus::ArrivedFactory])
            .with_location(PanelLocationStatus::Arrived)
            .with_milestone(Milestone::Arrived)),
        PanelEvent::Install => {
            if current.second_approval != Some(ApprovalStatus::Approved) {
                return Err(LifecycleError::PreconditionFailed(
                    "Panel cannot be installed before second approval is granted.".to_string(),
                ));
            }
            Ok(PanelTransition::entering(from, vec![PanelStatus::Installed])
                .with_location(PanelLocationStatus::Installed)
                .with_milestone(Milestone::Installed))
        }
        PanelEvent::Override(status) => Ok(PanelTransition::entering(from, vec![status])),
    }
}
