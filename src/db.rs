//! Storage provider setup: the SQLite pool and the embedded schema migrations.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Opens the pool, creating the database file when it does not exist yet.
///
/// Foreign keys are enforced on every connection.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

/// A private in-memory database. Every test gets its own.
///
/// Limited to a single connection that is never recycled, because each SQLite
/// connection to `:memory:` would otherwise see a different, empty database.
pub async fn connect_in_memory() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

/// Creates the `users` and `tasks` tables. A failure here aborts startup.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    match MIGRATOR.run(pool).await {
        Ok(()) => {
            log::info!("Database tables created successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Error creating database tables: {}", e);
            Err(e)
        }
    }
}

/// `SELECT 1` against the pool.
pub async fn health_check(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let _: (i64,) = sqlx::query_as("SELECT 1").fetch_one(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_rt::test]
    async fn test_schema_creates_tables() {
        let pool = connect_in_memory().await.unwrap();
        init_schema(&pool).await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('users', 'tasks') ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(
            tables.into_iter().map(|(name,)| name).collect::<Vec<_>>(),
            vec!["tasks", "users"]
        );

        // Running twice is a no-op.
        init_schema(&pool).await.unwrap();
        health_check(&pool).await.unwrap();
    }

    #[actix_rt::test]
    async fn test_foreign_keys_are_enforced() {
        let pool = connect_in_memory().await.unwrap();
        init_schema(&pool).await.unwrap();

        let orphan = sqlx::query(
            "INSERT INTO tasks (title, user_id, created_at, updated_at) VALUES ('x', 999, '', '')",
        )
        .execute(&pool)
        .await;
        assert!(orphan.is_err());
    }
}
