pub mod audit_record;
pub mod create_batch;
pub mod display_name;
pub mod exist_by_ids;
pub mod find_by_barcode;
pub mod find_by_parent;
pub mod load_batch;
pub mod load_locked;
pub mod pagination;
pub mod scan_log;
pub mod update_batch;

// Re-exports
pub use audit_record::*;
pub use create_batch::*;
pub use display_name::*;
pub use exist_by_ids::*;
pub use find_by_barcode::*;
pub use find_by_parent::*;
pub use load_batch::*;
pub use load_locked::*;
pub use pagination::*;
pub use scan_log::*;
pub use update_batch::*;

/// Error type shared by every repository trait
pub type RepositoryError = Box<dyn std::error::Error + Send + Sync>;
