use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures surfaced by the panel lifecycle operations.
///
/// Every variant carries a message that is ready for direct display.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message")]
pub enum LifecycleError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Locked(String),

    #[error("{0}")]
    PreconditionFailed(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    ResolutionFailure(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl LifecycleError {
    /// The dispatched-box rejection for the given verb ("approve", "scan", ...).
    pub fn box_dispatched(action: &str) -> Self {
        LifecycleError::Locked(format!(
            "Cannot {action} panel. Box is dispatched and read-only."
        ))
    }

    /// Domain failures are rule rejections raised before anything is written.
    ///
    /// Lost writes (`Conflict`), storage failures and cancellation are not:
    /// the unit of work they happened in must not be committed.
    pub fn is_domain(&self) -> bool {
        !matches!(
            self,
            LifecycleError::Conflict(_) | LifecycleError::Storage(_) | LifecycleError::Cancelled(_)
        )
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for LifecycleError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        // Repositories report optimistic-lock losses as a boxed LifecycleError.
        let err = match err.downcast::<LifecycleError>() {
            Ok(lifecycle) => return *lifecycle,
            Err(other) => other,
        };
        #[cfg(feature = "sqlx")]
        let err = match err.downcast::<sqlx::Error>() {
            Ok(sqlx_err) => return LifecycleError::from(*sqlx_err),
            Err(other) => other,
        };
        LifecycleError::Storage(err.to_string())
    }
}

impl From<validator::ValidationErrors> for LifecycleError {
    fn from(err: validator::ValidationErrors) -> Self {
        LifecycleError::InvalidInput(err.to_string())
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for LifecycleError {
    /// Serialization failures, deadlocks and unique violations mean another
    /// writer got there first.
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db)
                if matches!(db.code().as_deref(), Some("40001" | "40P01")) =>
            {
                LifecycleError::Conflict(format!(
                    "Concurrent update, retry the operation: {}",
                    db.message()
                ))
            }
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                LifecycleError::Conflict(db.message().to_string())
            }
            _ => LifecycleError::Storage(err.to_string()),
        }
    }
}

pub type LifecycleResult<T> = Result<T, LifecycleError>;
