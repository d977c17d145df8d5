use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LifecycleError;

/// Lifecycle status of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "panel_status", rename_all = "PascalCase"))]
pub enum PanelStatus {
    NotStarted,
    FirstApprovalApproved,
    FirstApprovalRejected,
    SecondApprovalPending,
    SecondApprovalApproved,
    SecondApprovalRejected,
    InTransit,
    ArrivedFactory,
    Installed,
}

impl PanelStatus {
    pub const ALL: [PanelStatus; 9] = [
        PanelStatus::NotStarted,
        PanelStatus::FirstApprovalApproved,
        PanelStatus::FirstApprovalRejected,
        PanelStatus::SecondApprovalPending,
        PanelStatus::SecondApprovalApproved,
        PanelStatus::SecondApprovalRejected,
        PanelStatus::InTransit,
        PanelStatus::ArrivedFactory,
        PanelStatus::Installed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PanelStatus::NotStarted => "NotStarted",
            PanelStatus::FirstApprovalApproved => "FirstApprovalApproved",
            PanelStatus::FirstApprovalRejected => "FirstApprovalRejected",
            PanelStatus::SecondApprovalPending => "SecondApprovalPending",
            PanelStatus::SecondApprovalApproved => "SecondApprovalApproved",
            PanelStatus::SecondApprovalRejected => "SecondApprovalRejected",
            PanelStatus::InTransit => "InTransit",
            PanelStatus::ArrivedFactory => "ArrivedFactory",
            PanelStatus::Installed => "Installed",
        }
    }

    /// Installed and both rejection states accept no further lifecycle events.
    /// Rework after a rejection happens out of band.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PanelStatus::Installed
                | PanelStatus::FirstApprovalRejected
                | PanelStatus::SecondApprovalRejected
        )
    }
}

impl fmt::Display for PanelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PanelStatus {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PanelStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| LifecycleError::InvalidInput(format!("Invalid panel status: {s}")))
    }
}

/// Where a panel physically is, as last reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "panel_location_status", rename_all = "PascalCase"))]
pub enum PanelLocationStatus {
    AtFactory,
    InTransit,
    Arrived,
    Installed,
    Rejected,
}

impl fmt::Display for PanelLocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelLocationStatus::AtFactory => write!(f, "AtFactory"),
            PanelLocationStatus::InTransit => write!(f, "InTransit"),
            PanelLocationStatus::Arrived => write!(f, "Arrived"),
            PanelLocationStatus::Installed => write!(f, "Installed"),
            PanelLocationStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "box_status", rename_all = "PascalCase"))]
pub enum BoxStatus {
    NotStarted,
    InProgress,
    Completed,
    Dispatched,
}

impl BoxStatus {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, BoxStatus::Dispatched)
    }
}

/// State of a single approval slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "approval_status", rename_all = "PascalCase"))]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalStatus::Pending => write!(f, "Pending"),
            ApprovalStatus::Approved => write!(f, "Approved"),
            ApprovalStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

/// A human sign-off decision. Only these two values can reach the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApprovalDecision {
    Approved,
    Rejected,
}

impl From<ApprovalDecision> for ApprovalStatus {
    fn from(decision: ApprovalDecision) -> Self {
        match decision {
            ApprovalDecision::Approved => ApprovalStatus::Approved,
            ApprovalDecision::Rejected => ApprovalStatus::Rejected,
        }
    }
}

impl fmt::Display for ApprovalDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", ApprovalStatus::from(*self))
    }
}

/// Parses the wire value; the match is exact and case-sensitive.
impl FromStr for ApprovalDecision {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Approved" => Ok(ApprovalDecision::Approved),
            "Rejected" => Ok(ApprovalDecision::Rejected),
            _ => Err(LifecycleError::InvalidInput(
                "Invalid approval status. Must be 'Approved' or 'Rejected'.".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApprovalStage {
    First,
    Second,
}

impl fmt::Display for ApprovalStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalStage::First => write!(f, "First"),
            ApprovalStage::Second => write!(f, "Second"),
        }
    }
}

/// Purpose attached to a field barcode read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "scan_type", rename_all = "PascalCase"))]
pub enum ScanType {
    Dispatch,
    SiteArrival,
    Installation,
    Inspection,
}

impl ScanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanType::Dispatch => "Dispatch",
            ScanType::SiteArrival => "SiteArrival",
            ScanType::Installation => "Installation",
            ScanType::Inspection => "Inspection",
        }
    }
}

impl fmt::Display for ScanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive.
impl FromStr for ScanType {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dispatch" => Ok(ScanType::Dispatch),
            "sitearrival" => Ok(ScanType::SiteArrival),
            "installation" => Ok(ScanType::Installation),
            "inspection" => Ok(ScanType::Inspection),
            _ => Err(LifecycleError::PreconditionFailed(format!(
                "Unsupported scan type: {s}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "audit_action", rename_all = "PascalCase"))]
pub enum AuditAction {
    Created,
    Modified,
    Deleted,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditAction::Created => write!(f, "Created"),
            AuditAction::Modified => write!(f, "Modified"),
            AuditAction::Deleted => write!(f, "Deleted"),
        }
    }
}
