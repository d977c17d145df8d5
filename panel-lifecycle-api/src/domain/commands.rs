use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::status::AuditAction;

pub const MAX_NOTES_LEN: usize = 500;
pub const DEFAULT_AUDIT_PAGE_SIZE: i64 = 25;
pub const MAX_AUDIT_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApprovePanelFirstApproval {
    pub box_panel_id: Uuid,
    /// "Approved" or "Rejected", matched exactly
    pub approval_status: String,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApprovePanelSecondApproval {
    pub box_panel_id: Uuid,
    /// "Approved" or "Rejected", matched exactly
    pub approval_status: String,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScanPanelBarcode {
    #[validate(length(min = 1, max = 50))]
    pub barcode: String,
    /// Dispatch, SiteArrival, Installation or Inspection, in any case
    pub scan_type: String,
    #[validate(length(max = 200))]
    pub scan_location: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Administrative override: sets the status directly, bypassing scan and
/// approval semantics. The dispatched guard still applies.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBoxPanelStatus {
    pub box_panel_id: Uuid,
    pub panel_status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GetAuditLogs {
    pub table_name: Option<String>,
    pub record_id: Option<Uuid>,
    pub action: Option<AuditAction>,
    pub search_term: Option<String>,
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
    pub changed_by: Option<Uuid>,
    #[serde(default = "default_page_number")]
    pub page_number: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page_number() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_AUDIT_PAGE_SIZE
}

impl Default for GetAuditLogs {
    fn default() -> Self {
        Self {
            table_name: None,
            record_id: None,
            action: None,
            search_term: None,
            from_date: None,
            to_date: None,
            changed_by: None,
            page_number: default_page_number(),
            page_size: default_page_size(),
        }
    }
}

impl GetAuditLogs {
    /// Page number clamped to at least 1.
    pub fn clamped_page_number(&self) -> usize {
        self.page_number.max(1) as usize
    }

    /// Page size clamped to [1, 100].
    pub fn clamped_page_size(&self) -> usize {
        self.page_size.clamp(1, MAX_AUDIT_PAGE_SIZE) as usize
    }

    /// The search term, trimmed, or None when blank.
    pub fn search(&self) -> Option<&str> {
        self.search_term
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}
