mod repo_impl;
mod lookup_display_reference;

pub use repo_impl::DisplayNameRepositoryImpl;
