pub mod box_model;
pub mod panel;
pub mod panel_type;
pub mod scan_log;

pub use box_model::*;
pub use panel::*;
pub use panel_type::*;
pub use scan_log::*;
