pub mod config;
pub mod handler;
pub mod repository;
pub mod telemetry;
pub mod unit_of_work;
pub mod utils;

pub use config::LifecycleConfig;
pub use handler::PanelLifecycleHandler;
pub use repository::factory::LifecycleRepoFactory;
pub use postgres_unit_of_work::Executor;
pub use unit_of_work::{Session, UnitOfWork};

#[cfg(test)]
pub mod test_helper;
