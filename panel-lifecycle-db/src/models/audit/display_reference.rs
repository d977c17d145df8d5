use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Naming columns of the entities an audit record can point at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayReference {
    Project { name: String, code: String },
    Box { name: String, tag: String },
    Panel { name: String, barcode: Option<String> },
    User { id: Uuid, full_name: Option<String>, email: Option<String> },
}

impl DisplayReference {
    /// Display name used in audit views.
    ///
    /// Projects render as `"Name (Code)"`, boxes as `"Name (Tag)"`, panels
    /// as `"Name (Barcode)"`. Users render as their full name, else email.
    pub fn display_name(&self) -> String {
        match self {
            DisplayReference::Project { name, code } => format!("{name} ({code})"),
            DisplayReference::Box { name, tag } => format!("{name} ({tag})"),
            DisplayReference::Panel { name, barcode } => match barcode {
                Some(barcode) => format!("{name} ({barcode})"),
                None => name.clone(),
            },
            DisplayReference::User {
                id,
                full_name,
                email,
            } => full_name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .or(email.as_deref())
                .map(str::to_string)
                .unwrap_or_else(|| id.to_string()),
        }
    }
}
