//! Networked store against a live server on an ephemeral port

use rollcall_common::{
    Age, Error, Partition, PersonRecord, RemoteError, RemoteStore, RosterSession, RosterStore,
    SqliteStore,
};
use rollcall_server::{build_router, AppState};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

async fn spawn_server() -> (String, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = SqliteStore::open(&dir.path().join("rollcall.db")).await.unwrap();
    store.init().await.unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = build_router(AppState::new(store));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), dir)
}

async fn remote(url: &str) -> RemoteStore {
    let store = RemoteStore::new(url, Duration::from_secs(5)).unwrap();
    store.init().await.unwrap();
    store
}

#[tokio::test]
async fn test_partition_round_trip() {
    let (url, _dir) = spawn_server().await;
    let store = remote(&url).await;

    let mut anna = PersonRecord::new("Smith", "Anna", "Blue", Age::Years(34), "f");
    anna.present = true;
    anna.note = "wheelchair".into();
    let ben = PersonRecord::new("Jones", "Ben", "Red", Age::Text("adult".into()), "m");

    store
        .save_partition(Partition::Guest, &[anna.clone(), ben.clone()])
        .await
        .unwrap();

    let loaded = store.load_partition(Partition::Guest).await.unwrap();
    assert_eq!(loaded.len(), 2);
    assert!(loaded[0].same_fields(&anna));
    assert!(loaded[1].same_fields(&ben));
    assert!(store.load_partition(Partition::Team).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_log_and_clear() {
    let (url, _dir) = spawn_server().await;
    let store = remote(&url).await;

    store.append_log("Anna Smith", "Blue", "Guests arrived").await.unwrap();
    let log = store.load_log().await.unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].display_line(), format!("[{}] Anna Smith (Blue) Guests arrived", log[0].timestamp));

    store.clear_all().await.unwrap();
    assert!(store.load_log().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_two_sessions_see_each_other() {
    let (url, _dir) = spawn_server().await;
    let desk_a: Arc<dyn RosterStore> = Arc::new(remote(&url).await);
    let desk_b: Arc<dyn RosterStore> = Arc::new(remote(&url).await);

    let person = PersonRecord::new("Smith", "Anna", "Blue", Age::Years(34), "f");
    desk_a.save_partition(Partition::Team, &[person]).await.unwrap();

    let mut a = RosterSession::open(desk_a).await.unwrap();
    let mut b = RosterSession::open(desk_b).await.unwrap();

    let id = a.listing(Some(Partition::Team), "").id_at(0).unwrap();
    a.toggle_presence(id).await.unwrap();

    b.refresh().await.unwrap();
    assert_eq!(b.counts().present, 1);
    assert_eq!(b.log().len(), 1);
    assert_eq!(b.log()[0].status_text, "Team arrived");
}

#[tokio::test]
async fn test_server_errors_surface_to_client() {
    let (url, _dir) = spawn_server().await;
    let store = RemoteStore::new(format!("{}/nowhere", url), Duration::from_secs(5)).unwrap();

    match store.load_partition(Partition::Guest).await {
        Err(Error::Remote(RemoteError::Status { status, .. })) => assert_eq!(status, 404),
        other => panic!("Expected status error, got {:?}", other.map(|r| r.len())),
    }
    assert!(store.load_log().await.is_err());
}
