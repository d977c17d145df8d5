mod repo_impl;
mod create_batch;
mod exist_by_ids;
mod find_by_barcode;
mod find_by_box_id;
mod load_batch;
mod load_for_update;
mod update_batch;

pub use repo_impl::PanelRepositoryImpl;
