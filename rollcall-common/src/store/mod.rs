//! Durable roster storage
//!
//! [`RosterStore`] is the contract shared by the local SQLite store and the
//! networked facade. Every call completes (or fails) before returning; an
//! `Err` always means "store unavailable" and is never folded into an empty
//! result, so callers can keep their in-memory roster on failure.

pub mod decode;
pub mod remote;
pub mod schema;
pub mod sqlite;

pub use remote::RemoteStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::StoreMode;
use crate::events::EventLogEntry;
use crate::partition::Partition;
use crate::person::PersonRecord;
use crate::Result;

#[async_trait]
pub trait RosterStore: Send + Sync {
    /// Prepare the store; idempotent
    async fn init(&self) -> Result<()>;

    /// Replace everything stored under `partition` with `records`, in order
    async fn save_partition(&self, partition: Partition, records: &[PersonRecord]) -> Result<()>;

    /// Records of `partition` in storage order, with fresh ids
    async fn load_partition(&self, partition: Partition) -> Result<Vec<PersonRecord>>;

    /// Append one timestamped entry to the event log
    async fn append_log(&self, full_name: &str, group: &str, status_text: &str) -> Result<()>;

    /// The whole event log, oldest first
    async fn load_log(&self) -> Result<Vec<EventLogEntry>>;

    /// Delete every record and log entry
    async fn clear_all(&self) -> Result<()>;
}

/// Open and initialise the store selected by `mode`
///
/// `db_path` is only used for local mode, `timeout` only for remote mode.
pub async fn open_store(
    mode: &StoreMode,
    db_path: &Path,
    timeout: Duration,
) -> Result<Arc<dyn RosterStore>> {
    let store: Arc<dyn RosterStore> = match mode {
        StoreMode::Local => {
            info!("Using local store: {}", db_path.display());
            Arc::new(SqliteStore::open(db_path).await?)
        }
        StoreMode::Remote(url) => {
            info!("Using remote store: {}", url);
            Arc::new(RemoteStore::new(url.clone(), timeout)?)
        }
    };
    store.init().await?;
    Ok(store)
}
