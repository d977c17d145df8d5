mod repo_impl;
mod create_batch;
mod query_audit_records;

pub use repo_impl::AuditRecordRepositoryImpl;
