mod repo_impl;
mod load_for_share;

pub use repo_impl::BoxRepositoryImpl;
