pub mod audit_record_repository;
pub mod display_name_repository;

pub use audit_record_repository::AuditRecordRepositoryImpl;
pub use display_name_repository::DisplayNameRepositoryImpl;
