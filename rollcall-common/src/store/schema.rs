//! Table definitions
//!
//! Storage order is the autoincrement `id`. `age` is declared without a type
//! so SQLite keeps integers and free text exactly as written.

use sqlx::SqlitePool;

use crate::Result;

pub async fn create_individuals_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS individuals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            partition_name TEXT NOT NULL,
            last_name TEXT,
            first_name TEXT,
            group_name TEXT,
            age,
            gender TEXT,
            present INTEGER NOT NULL DEFAULT 0,
            evacuated INTEGER NOT NULL DEFAULT 0,
            note TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_individuals_partition ON individuals(partition_name)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_event_log_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS event_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp TEXT NOT NULL,
            full_name TEXT,
            group_name TEXT,
            status_text TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
