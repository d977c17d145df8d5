use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use ::config::{Config, Environment, File};
use panel_lifecycle_service::RetryPolicy;
use serde::Deserialize;

const CONFIG_FILE: &str = "panel-lifecycle";

/// Runtime settings of the lifecycle engine.
///
/// Sources, later ones winning: built-in defaults, `panel-lifecycle.toml`
/// when present, `.env`, then `PANEL_LIFECYCLE_*` environment variables.
/// `DATABASE_URL` is used when no database url was configured.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LifecycleConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub notification_queue_capacity: usize,
    pub notification_max_attempts: u32,
    pub notification_initial_backoff_ms: u64,
    pub notification_max_backoff_ms: u64,
}

impl LifecycleConfig {
    pub fn load() -> Result<Self> {
        // a missing .env file is fine
        let _ = dotenvy::dotenv();

        let mut builder = Config::builder()
            .set_default("database_url", "")?
            .set_default("max_connections", 10)?
            .set_default("acquire_timeout_secs", 30)?
            .set_default("notification_queue_capacity", 1024)?
            .set_default("notification_max_attempts", 5)?
            .set_default("notification_initial_backoff_ms", 200)?
            .set_default("notification_max_backoff_ms", 10_000)?;

        if Path::new(&format!("{CONFIG_FILE}.toml")).exists() {
            builder = builder.add_source(File::with_name(CONFIG_FILE));
        }

        builder = builder.add_source(Environment::with_prefix("PANEL_LIFECYCLE").try_parsing(true));

        let mut config: LifecycleConfig = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Invalid panel lifecycle configuration")?;

        if config.database_url.trim().is_empty() {
            config.database_url = std::env::var("DATABASE_URL").unwrap_or_default();
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            bail!("No database url configured; set PANEL_LIFECYCLE_DATABASE_URL or DATABASE_URL");
        }
        if self.max_connections == 0 {
            bail!("max_connections must be at least 1");
        }
        if self.notification_queue_capacity == 0 {
            bail!("notification_queue_capacity must be at least 1");
        }
        Ok(())
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.notification_max_attempts.max(1),
            initial_backoff: Duration::from_millis(self.notification_initial_backoff_ms),
            max_backoff: Duration::from_millis(self.notification_max_backoff_ms),
            jitter: true,
        }
    }
}
