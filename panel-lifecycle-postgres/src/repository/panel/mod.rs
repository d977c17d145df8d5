pub mod box_repository;
pub mod panel_repository;
pub mod panel_type_repository;
pub mod scan_log_repository;

pub use box_repository::BoxRepositoryImpl;
pub use panel_repository::PanelRepositoryImpl;
pub use panel_type_repository::PanelTypeRepositoryImpl;
pub use scan_log_repository::ScanLogRepositoryImpl;
