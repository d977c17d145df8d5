use serde::{Deserialize, Serialize};

/// Entity kinds the audit trail knows how to name.
///
/// Table names map onto a closed set; anything else is `Unknown` and is
/// displayed without an entity name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditEntityKind {
    Project,
    Box,
    Panel,
    User,
    Unknown,
}

impl AuditEntityKind {
    /// Case-insensitive; accepts both the table name and the entity name.
    pub fn from_table_name(table_name: &str) -> Self {
        match table_name.trim().to_ascii_lowercase().as_str() {
            "project" | "projects" => AuditEntityKind::Project,
            "box" | "boxes" => AuditEntityKind::Box,
            "box_panel" | "boxpanel" | "boxpanels" | "panel" => AuditEntityKind::Panel,
            "app_user" | "user" | "users" => AuditEntityKind::User,
            _ => AuditEntityKind::Unknown,
        }
    }
}
