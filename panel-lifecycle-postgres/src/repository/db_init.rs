//! Schema setup and teardown from the crate's SQL files.
//!
//! `migrations/` is applied in ascending file name order, `cleanup/` in
//! descending order. Deployments that track migrations use
//! `sqlx::migrate!` on the same directory instead.

use sqlx::PgPool;
use std::fs;
use std::path::Path;
use tracing::info;

pub async fn init_database(pool: &PgPool) -> Result<(), sqlx::Error> {
    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
    execute_sql_files_in_order(pool, &migrations_dir, true).await
}

pub async fn cleanup_database(pool: &PgPool) -> Result<(), sqlx::Error> {
    let cleanup_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("cleanup");
    execute_sql_files_in_order(pool, &cleanup_dir, false).await
}

async fn execute_sql_files_in_order(
    pool: &PgPool,
    dir: &Path,
    ascending: bool,
) -> Result<(), sqlx::Error> {
    let mut entries: Vec<_> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().and_then(|s| s.to_str()) == Some("sql"))
        .collect();

    entries.sort_by(|a, b| {
        let ordering = a.file_name().cmp(&b.file_name());
        if ascending {
            ordering
        } else {
            ordering.reverse()
        }
    });

    for entry in entries {
        let path = entry.path();
        let sql = fs::read_to_string(&path)?;
        sqlx::raw_sql(&sql).execute(pool).await?;
        info!(file = %path.display(), "Executed schema file");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    #[serial]
    async fn test_init_and_cleanup() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let database_url = std::env::var("DATABASE_URL")?;
        let pool = PgPool::connect(&database_url).await?;

        cleanup_database(&pool).await?;
        init_database(&pool).await?;

        let tables: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM information_schema.tables
               WHERE table_name IN ('box_panel', 'panel_scan_log', 'audit_log')"#,
        )
        .fetch_one(&pool)
        .await?;
        assert_eq!(tables, 3);

        cleanup_database(&pool).await?;
        Ok(())
    }
}
