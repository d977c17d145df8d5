mod repo_impl;
mod create_batch;
mod load_scan_logs;

pub use repo_impl::ScanLogRepositoryImpl;
