//! Integration tests for RosterSession
//!
//! Tests cover:
//! - File import (replace and append) persisted to the store
//! - Evacuation dependency on presence through the session
//! - Refresh keeping the in-memory view when the store is unavailable
//! - Full reset

use async_trait::async_trait;
use rollcall_common::session::ImportMode;
use rollcall_common::{
    Error, EventLogEntry, Partition, PersonRecord, RosterSession, RosterStore, SqliteStore,
    StatusChange,
};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tempfile::{NamedTempFile, TempDir};

async fn setup_store(dir: &TempDir) -> Arc<SqliteStore> {
    let store = SqliteStore::open(&dir.path().join("rollcall.db")).await.unwrap();
    store.init().await.unwrap();
    Arc::new(store)
}

fn csv_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Store wrapper that can be switched to fail every call
struct FlakyStore {
    inner: Arc<SqliteStore>,
    down: AtomicBool,
}

impl FlakyStore {
    fn check(&self) -> rollcall_common::Result<()> {
        if self.down.load(Ordering::SeqCst) {
            Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "store offline",
            )))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RosterStore for FlakyStore {
    async fn init(&self) -> rollcall_common::Result<()> {
        self.check()?;
        self.inner.init().await
    }

    async fn save_partition(
        &self,
        partition: Partition,
        records: &[PersonRecord],
    ) -> rollcall_common::Result<()> {
        self.check()?;
        self.inner.save_partition(partition, records).await
    }

    async fn load_partition(&self, partition: Partition) -> rollcall_common::Result<Vec<PersonRecord>> {
        self.check()?;
        self.inner.load_partition(partition).await
    }

    async fn append_log(&self, full_name: &str, group: &str, status_text: &str) -> rollcall_common::Result<()> {
        self.check()?;
        self.inner.append_log(full_name, group, status_text).await
    }

    async fn load_log(&self) -> rollcall_common::Result<Vec<EventLogEntry>> {
        self.check()?;
        self.inner.load_log().await
    }

    async fn clear_all(&self) -> rollcall_common::Result<()> {
        self.check()?;
        self.inner.clear_all().await
    }
}

#[tokio::test]
async fn test_import_file_replaces_and_persists() {
    let dir = TempDir::new().unwrap();
    let store = setup_store(&dir).await;
    let mut session = RosterSession::open(store.clone()).await.unwrap();

    let file = csv_file(
        "Name,Vorname,Reisegruppe,Alter,Geschlecht\n\
         Smith,Anna,Blue,34,f\n\
         Jones,Ben\n\
         Brown,Carl,Red,51,m\n",
    );
    let result = session
        .import_file(Partition::Guest, file.path(), ImportMode::Replace)
        .await
        .unwrap();

    assert!(result.problem.is_none());
    assert_eq!(result.summary.loaded, 2);
    assert_eq!(result.summary.skipped, 1);

    let stored = store.load_partition(Partition::Guest).await.unwrap();
    let names: Vec<_> = stored.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Smith", "Brown"]);
}

#[tokio::test]
async fn test_import_file_append_keeps_existing() {
    let dir = TempDir::new().unwrap();
    let store = setup_store(&dir).await;
    let mut session = RosterSession::open(store.clone()).await.unwrap();
    session.add_entry(Partition::Team).await.unwrap();

    let file = csv_file("h1,h2,h3,h4,h5\nJones,Ben,Crew,40,m,yes,no,first aider\n");
    session
        .import_file(Partition::Team, file.path(), ImportMode::Append)
        .await
        .unwrap();

    let team = session.roster().records(Partition::Team);
    assert_eq!(team.len(), 2);
    assert_eq!(team[0].name, "New");
    assert!(team[1].present);
    assert_eq!(team[1].note, "first aider");
    assert_eq!(store.load_partition(Partition::Team).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_unreadable_file_leaves_roster_alone() {
    let dir = TempDir::new().unwrap();
    let store = setup_store(&dir).await;
    let mut session = RosterSession::open(store.clone()).await.unwrap();
    session.add_entry(Partition::Guest).await.unwrap();

    let missing = dir.path().join("missing.csv");
    let result = session
        .import_file(Partition::Guest, &missing, ImportMode::Replace)
        .await
        .unwrap();

    assert!(result.problem.is_some());
    assert_eq!(session.roster().records(Partition::Guest).len(), 1);
}

#[tokio::test]
async fn test_presence_off_clears_evacuation_in_store() {
    let dir = TempDir::new().unwrap();
    let store = setup_store(&dir).await;
    let mut session = RosterSession::open(store.clone()).await.unwrap();
    let id = session.add_entry(Partition::Guest).await.unwrap();

    assert_eq!(session.toggle_evacuated(id).await.unwrap(), None);
    session.toggle_presence(id).await.unwrap();
    assert_eq!(
        session.toggle_evacuated(id).await.unwrap(),
        Some(StatusChange::Evacuated)
    );
    session.toggle_presence(id).await.unwrap();

    let stored = &store.load_partition(Partition::Guest).await.unwrap()[0];
    assert!(!stored.present);
    assert!(!stored.evacuated);

    let log: Vec<_> = store
        .load_log()
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.status_text)
        .collect();
    assert_eq!(log, vec!["Guests arrived", "Guests evacuated", "Guests left"]);
}

#[tokio::test]
async fn test_note_is_persisted() {
    let dir = TempDir::new().unwrap();
    let store = setup_store(&dir).await;
    let mut session = RosterSession::open(store.clone()).await.unwrap();
    let id = session.add_entry(Partition::Team).await.unwrap();

    assert!(session.update_note(id, "left keys at desk").await.unwrap());

    let stored = store.load_partition(Partition::Team).await.unwrap();
    assert_eq!(stored[0].note, "left keys at desk");
}

#[tokio::test]
async fn test_refresh_failure_keeps_view() {
    let dir = TempDir::new().unwrap();
    let inner = setup_store(&dir).await;
    let flaky = Arc::new(FlakyStore {
        inner,
        down: AtomicBool::new(false),
    });
    let mut session = RosterSession::open(flaky.clone()).await.unwrap();
    session.add_entry(Partition::Guest).await.unwrap();

    flaky.down.store(true, Ordering::SeqCst);
    assert!(session.refresh().await.is_err());
    assert_eq!(session.roster().len(), 1, "View must survive a store outage");

    flaky.down.store(false, Ordering::SeqCst);
    session.refresh().await.unwrap();
    assert_eq!(session.roster().len(), 1);
}

#[tokio::test]
async fn test_counts_sum_partitions() {
    let dir = TempDir::new().unwrap();
    let store = setup_store(&dir).await;
    let mut session = RosterSession::open(store).await.unwrap();

    let guest = session.add_entry(Partition::Guest).await.unwrap();
    let team = session.add_entry(Partition::Team).await.unwrap();
    session.toggle_presence(guest).await.unwrap();
    session.toggle_presence(team).await.unwrap();
    session.toggle_evacuated(team).await.unwrap();

    let counts = session.counts();
    assert_eq!(counts.total, 2);
    assert_eq!(counts.present, 2);
    assert_eq!(counts.evacuated, 1);
}

#[tokio::test]
async fn test_clear_all_resets_view_and_store() {
    let dir = TempDir::new().unwrap();
    let store = setup_store(&dir).await;
    let mut session = RosterSession::open(store.clone()).await.unwrap();
    let id = session.add_entry(Partition::Guest).await.unwrap();
    session.toggle_presence(id).await.unwrap();

    session.clear_all().await.unwrap();

    assert!(session.roster().is_empty());
    assert!(session.log().is_empty());
    assert!(store.load_partition(Partition::Guest).await.unwrap().is_empty());
    assert!(store.load_log().await.unwrap().is_empty());
}
