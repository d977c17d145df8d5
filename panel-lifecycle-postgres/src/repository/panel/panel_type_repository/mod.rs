mod repo_impl;
mod find_by_project_id;

pub use repo_impl::PanelTypeRepositoryImpl;
