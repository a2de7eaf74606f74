//! Session: the in-memory roster bound to a store
//!
//! Every mutation is pushed to the store right away (owning partition saved,
//! then a log entry appended for status transitions). `refresh` pulls both
//! partitions and the log and swaps them in only if all three loads
//! succeeded, so a store outage never wipes the in-memory view.
//!
//! Within one process the session sits behind a mutex shared with the
//! refresh task, which serialises edits and refreshes. Between processes the
//! last partition save wins.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::events::{EventLogEntry, StatusChange};
use crate::import::{read_rows, ImportReport};
use crate::partition::Partition;
use crate::person::PersonId;
use crate::roster::{Counts, Listing, LoadSummary, RosterManager, Row};
use crate::store::RosterStore;
use crate::Result;

/// Whether an import clears the partition first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    #[default]
    Replace,
    Append,
}

/// Result of importing a file
#[derive(Debug, Clone, Default)]
pub struct FileImport {
    pub summary: LoadSummary,
    /// Set when the file could not be read; the roster is then unchanged
    pub problem: Option<String>,
}

pub struct RosterSession {
    roster: RosterManager,
    log: Vec<EventLogEntry>,
    store: Arc<dyn RosterStore>,
}

impl RosterSession {
    /// Session with an empty view; call [`refresh`](Self::refresh) to populate
    pub fn new(store: Arc<dyn RosterStore>) -> Self {
        Self {
            roster: RosterManager::new(),
            log: Vec::new(),
            store,
        }
    }

    /// Session populated from the store
    pub async fn open(store: Arc<dyn RosterStore>) -> Result<Self> {
        let mut session = Self::new(store);
        session.refresh().await?;
        Ok(session)
    }

    pub fn roster(&self) -> &RosterManager {
        &self.roster
    }

    pub fn log(&self) -> &[EventLogEntry] {
        &self.log
    }

    pub fn counts(&self) -> Counts {
        self.roster.counts()
    }

    pub fn listing(&self, partition: Option<Partition>, query: &str) -> Listing {
        self.roster.listing(partition, query)
    }

    /// Reload both partitions and the log from the store
    pub async fn refresh(&mut self) -> Result<()> {
        let guests = self.store.load_partition(Partition::Guest).await?;
        let team = self.store.load_partition(Partition::Team).await?;
        let log = self.store.load_log().await?;

        self.roster.replace_partition(Partition::Guest, guests);
        self.roster.replace_partition(Partition::Team, team);
        self.log = log;
        debug!(records = self.roster.len(), log = self.log.len(), "Refreshed from store");
        Ok(())
    }

    async fn save(&self, partition: Partition) -> Result<()> {
        self.store
            .save_partition(partition, self.roster.records(partition))
            .await
    }

    async fn record_change(&mut self, id: PersonId, change: StatusChange) -> Result<()> {
        let Some(partition) = self.roster.partition_of(id) else {
            return Ok(());
        };
        self.save(partition).await?;

        let Some(person) = self.roster.get(id) else {
            return Ok(());
        };
        let full_name = person.full_name();
        let group = person.group.clone();
        let status_text = change.status_text(partition);

        self.store.append_log(&full_name, &group, &status_text).await?;
        info!("{} ({}) {}", full_name, group, status_text);

        // The store stamps the entry; take its copy so both sides agree
        match self.store.load_log().await {
            Ok(log) => self.log = log,
            Err(e) => {
                warn!("Could not reload event log, stamping locally: {}", e);
                self.log.push(EventLogEntry {
                    timestamp: crate::time::log_timestamp(),
                    full_name,
                    group,
                    status_text,
                });
            }
        }
        Ok(())
    }

    /// Toggle presence and persist; `None` for an unknown id
    pub async fn toggle_presence(&mut self, id: PersonId) -> Result<Option<StatusChange>> {
        let Some(change) = self.roster.toggle_presence(id) else {
            return Ok(None);
        };
        self.record_change(id, change).await?;
        Ok(Some(change))
    }

    /// Toggle evacuation and persist; `None` for an unknown or absent person
    pub async fn toggle_evacuated(&mut self, id: PersonId) -> Result<Option<StatusChange>> {
        let Some(change) = self.roster.toggle_evacuated(id) else {
            return Ok(None);
        };
        self.record_change(id, change).await?;
        Ok(Some(change))
    }

    pub async fn update_note(&mut self, id: PersonId, text: impl Into<String>) -> Result<bool> {
        if !self.roster.update_note(id, text) {
            return Ok(false);
        }
        if let Some(partition) = self.roster.partition_of(id) {
            self.save(partition).await?;
        }
        Ok(true)
    }

    pub async fn add_entry(&mut self, partition: Partition) -> Result<PersonId> {
        let id = self.roster.add_entry(partition);
        self.save(partition).await?;
        Ok(id)
    }

    pub async fn import(
        &mut self,
        partition: Partition,
        rows: Vec<Row>,
        mode: ImportMode,
    ) -> Result<LoadSummary> {
        let summary = match mode {
            ImportMode::Replace => self.roster.load(partition, rows),
            ImportMode::Append => self.roster.append(partition, rows),
        };
        self.save(partition).await?;
        info!(
            partition = %partition,
            loaded = summary.loaded,
            skipped = summary.skipped,
            "Imported roster rows"
        );
        Ok(summary)
    }

    /// Read `path` and import its rows
    ///
    /// An unreadable file leaves the roster and the store untouched and is
    /// reported through [`FileImport::problem`].
    pub async fn import_file(
        &mut self,
        partition: Partition,
        path: &Path,
        mode: ImportMode,
    ) -> Result<FileImport> {
        let ImportReport {
            rows,
            skipped,
            problem,
        } = read_rows(path);

        if let Some(problem) = problem {
            return Ok(FileImport {
                summary: LoadSummary::default(),
                problem: Some(problem),
            });
        }

        let mut summary = self.import(partition, rows, mode).await?;
        summary.skipped += skipped;
        Ok(FileImport {
            summary,
            problem: None,
        })
    }

    /// Wipe the store and the in-memory view
    pub async fn clear_all(&mut self) -> Result<()> {
        self.store.clear_all().await?;
        self.roster.clear();
        self.log.clear();
        Ok(())
    }
}

/// Refresh `session` every `interval` until `cancel` fires
///
/// Failed refreshes are logged and retried on the next tick; the previous
/// view stays in place meanwhile.
pub fn spawn_refresh(
    session: Arc<Mutex<RosterSession>>,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut failing = false;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Refresh task stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let result = session.lock().await.refresh().await;
                    match result {
                        Ok(()) if failing => {
                            info!("Store reachable again");
                            failing = false;
                        }
                        Ok(()) => {}
                        Err(e) => {
                            if !failing {
                                warn!("Refresh failed, keeping current view: {}", e);
                            }
                            failing = true;
                        }
                    }
                }
            }
        }
    })
}
