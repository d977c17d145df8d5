use heapless::String as HeaplessString;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// # Documentation
/// Template a box's panels are cloned from. `quantity` panels named
/// `"{name} {n}"` are created per template when a box is populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelTypeModel {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: HeaplessString<100>,
    pub width_mm: Option<Decimal>,
    pub height_mm: Option<Decimal>,
    pub quantity: i32,
}

impl Identifiable for PanelTypeModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}
