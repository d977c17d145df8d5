//! Sessions over `postgres_unit_of_work::Executor`.
//!
//! Every repository built for a session clones the same executor, so they
//! all write through one transaction. The executor's slot is emptied when the
//! session commits or rolls back; repositories used after that fail with
//! "Transaction has been consumed".

use std::error::Error;
use std::sync::Arc;

use postgres_unit_of_work::Executor;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

/// Opens sessions on a pool.
#[derive(Clone)]
pub struct UnitOfWork {
    pool: Arc<PgPool>,
}

impl UnitOfWork {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn begin(&self) -> Result<Session, sqlx::Error> {
        let tx = self.pool.begin().await?;
        Ok(Session {
            executor: Executor::new(tx),
        })
    }
}

/// A running transaction. Dropping it without commit rolls back.
pub struct Session {
    executor: Executor,
}

impl Session {
    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub async fn commit(self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.take().await?.commit().await?;
        debug!("Unit of work committed");
        Ok(())
    }

    pub async fn rollback(self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.take().await?.rollback().await?;
        debug!("Unit of work rolled back");
        Ok(())
    }

    async fn take(&self) -> Result<Transaction<'static, Postgres>, Box<dyn Error + Send + Sync>> {
        let tx = self.executor.tx.lock().await.take();
        tx.ok_or_else(|| "Transaction has been consumed".into())
    }
}
