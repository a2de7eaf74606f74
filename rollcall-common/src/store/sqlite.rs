//! Local SQLite store
//!
//! Saving a partition deletes its rows and re-inserts the given records one
//! by one. The sequence is not atomic: a crash mid-save loses the partition,
//! and two processes saving the same partition interleave with the last
//! writer winning.

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use super::decode::decode_optional_flag;
use super::schema::{create_event_log_table, create_individuals_table};
use super::RosterStore;
use crate::events::EventLogEntry;
use crate::partition::Partition;
use crate::person::{Age, PersonRecord};
use crate::time::log_timestamp;
use crate::Result;

const BUSY_TIMEOUT_MS: u64 = 5000;

type IndividualRow = (
    Option<String>, // last_name
    Option<String>, // first_name
    Option<String>, // group_name
    String,         // typeof(age)
    Option<String>, // age as text
    Option<String>, // gender
    Option<String>, // present as text
    Option<String>, // evacuated as text
    Option<String>, // note
);

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database file at `db_path`
    ///
    /// Tables are not created here; call [`RosterStore::init`].
    pub async fn open(db_path: &Path) -> Result<Self> {
        let newly_created = !db_path.exists();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        if newly_created {
            info!("Initialized new database: {}", db_path.display());
        } else {
            info!("Opened existing database: {}", db_path.display());
        }

        Ok(Self { pool })
    }

    /// Private in-memory database (single connection so it is shared)
    pub async fn open_in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl RosterStore for SqliteStore {
    async fn init(&self) -> Result<()> {
        create_individuals_table(&self.pool).await?;
        create_event_log_table(&self.pool).await?;
        Ok(())
    }

    async fn save_partition(&self, partition: Partition, records: &[PersonRecord]) -> Result<()> {
        let mut conn = self.pool.acquire().await?;

        sqlx::query("DELETE FROM individuals WHERE partition_name = ?")
            .bind(partition.as_str())
            .execute(&mut *conn)
            .await?;

        for p in records {
            let query = sqlx::query(
                r#"
                INSERT INTO individuals
                    (partition_name, last_name, first_name, group_name, age, gender, present, evacuated, note)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(partition.as_str())
            .bind(&p.name)
            .bind(&p.first_name)
            .bind(&p.group);

            let query = match &p.age {
                Age::Years(years) => query.bind(*years),
                Age::Text(text) => query.bind(text.as_str()),
            };

            query
                .bind(&p.gender)
                .bind(p.present as i64)
                .bind(p.evacuated as i64)
                .bind(&p.note)
                .execute(&mut *conn)
                .await?;
        }

        debug!(partition = %partition, count = records.len(), "Saved partition");
        Ok(())
    }

    async fn load_partition(&self, partition: Partition) -> Result<Vec<PersonRecord>> {
        let rows: Vec<IndividualRow> = sqlx::query_as(
            r#"
            SELECT last_name, first_name, group_name,
                   typeof(age), CAST(age AS TEXT), gender,
                   CAST(present AS TEXT), CAST(evacuated AS TEXT), note
            FROM individuals
            WHERE partition_name = ?
            ORDER BY id ASC
            "#,
        )
        .bind(partition.as_str())
        .fetch_all(&self.pool)
        .await?;

        let records: Vec<PersonRecord> = rows.into_iter().map(record_from_row).collect();
        debug!(partition = %partition, count = records.len(), "Loaded partition");
        Ok(records)
    }

    async fn append_log(&self, full_name: &str, group: &str, status_text: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO event_log (timestamp, full_name, group_name, status_text) VALUES (?, ?, ?, ?)",
        )
        .bind(log_timestamp())
        .bind(full_name)
        .bind(group)
        .bind(status_text)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn load_log(&self) -> Result<Vec<EventLogEntry>> {
        let rows: Vec<(String, Option<String>, Option<String>, Option<String>)> = sqlx::query_as(
            "SELECT timestamp, full_name, group_name, status_text FROM event_log ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(timestamp, full_name, group, status_text)| EventLogEntry {
                timestamp,
                full_name: full_name.unwrap_or_default(),
                group: group.unwrap_or_default(),
                status_text: status_text.unwrap_or_default(),
            })
            .collect())
    }

    async fn clear_all(&self) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("DELETE FROM individuals").execute(&mut *conn).await?;
        sqlx::query("DELETE FROM event_log").execute(&mut *conn).await?;
        info!("Cleared all roster and log data");
        Ok(())
    }
}

fn decode_age(kind: &str, text: Option<String>) -> Age {
    match (kind, text) {
        ("integer", Some(t)) => t.parse().map(Age::Years).unwrap_or(Age::Text(t)),
        ("real", Some(t)) => Age::from_field(&t),
        (_, Some(t)) => Age::Text(t),
        (_, None) => Age::Text(String::new()),
    }
}

fn record_from_row(row: IndividualRow) -> PersonRecord {
    let (name, first_name, group, age_kind, age_text, gender, present, evacuated, note) = row;
    let mut record = PersonRecord::new(
        name.unwrap_or_default(),
        first_name.unwrap_or_default(),
        group.unwrap_or_default(),
        decode_age(&age_kind, age_text),
        gender.unwrap_or_default(),
    );
    record.present = decode_optional_flag(present.as_deref());
    record.evacuated = record.present && decode_optional_flag(evacuated.as_deref());
    record.note = note.unwrap_or_default();
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().await.unwrap();
        store.init().await.unwrap();
        store
    }

    #[test]
    fn test_decode_age_by_storage_type() {
        assert_eq!(decode_age("integer", Some("42".into())), Age::Years(42));
        assert_eq!(decode_age("real", Some("42.0".into())), Age::Years(42));
        assert_eq!(decode_age("text", Some("42".into())), Age::Text("42".into()));
        assert_eq!(decode_age("null", None), Age::Text(String::new()));
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let store = memory_store().await;
        store.init().await.unwrap();
        store.init().await.unwrap();
        assert!(store.load_partition(Partition::Guest).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_partitions_are_independent() {
        let store = memory_store().await;
        let guest = PersonRecord::new("G", "g", "x", Age::Years(1), "f");
        let team = PersonRecord::new("T", "t", "x", Age::Years(2), "m");

        store.save_partition(Partition::Guest, &[guest]).await.unwrap();
        store.save_partition(Partition::Team, &[team]).await.unwrap();
        store.save_partition(Partition::Guest, &[]).await.unwrap();

        assert!(store.load_partition(Partition::Guest).await.unwrap().is_empty());
        assert_eq!(store.load_partition(Partition::Team).await.unwrap()[0].name, "T");
    }

    #[tokio::test]
    async fn test_log_keeps_insertion_order() {
        let store = memory_store().await;
        store.append_log("Anna Smith", "Blue", "Guests arrived").await.unwrap();
        store.append_log("Ben Jones", "Red", "Team arrived").await.unwrap();
        store.append_log("Anna Smith", "Blue", "Guests left").await.unwrap();

        let log = store.load_log().await.unwrap();
        let texts: Vec<_> = log.iter().map(|e| e.status_text.as_str()).collect();
        assert_eq!(texts, vec!["Guests arrived", "Team arrived", "Guests left"]);
        assert_eq!(log[1].full_name, "Ben Jones");
        assert_eq!(log[1].group, "Red");
    }
}
