use patchwatch::Candidate;
use patchwatch::db::{InsertOutcome, PatchStore};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::time::SystemTime;
use tokio::fs;

fn temp_database_url(tag: &str) -> (String, PathBuf) {
    let tmp_dir = std::env::temp_dir();
    let mut hasher = DefaultHasher::new();
    SystemTime::now().hash(&mut hasher);
    tag.hash(&mut hasher);
    let db_path = tmp_dir.join(format!("patchwatch_{}_{:x}.sqlite", tag, hasher.finish()));
    let database_url = format!("sqlite:{}", db_path.to_str().unwrap());
    (database_url, db_path)
}

async fn cleanup(db_path: PathBuf) {
    let wal_path = PathBuf::from(format!("{}-wal", db_path.to_string_lossy()));
    let shm_path = PathBuf::from(format!("{}-shm", db_path.to_string_lossy()));
    let _ = fs::remove_file(&wal_path).await;
    let _ = fs::remove_file(&shm_path).await;
    fs::remove_file(&db_path).await.unwrap();
}

fn candidate(name: &str, title: &str) -> Candidate {
    Candidate {
        name: name.to_string(),
        title: title.to_string(),
        description: String::new(),
    }
}

#[tokio::test]
async fn insert_is_deduplicated_by_name() {
    let (database_url, db_path) = temp_database_url("dedupe");
    let store = PatchStore::connect(&database_url).await.unwrap();
    store.init_schema().await.unwrap();

    let outcome = store
        .insert_if_absent(&candidate("9.0.1234", "fix foo"))
        .await
        .unwrap();
    assert_eq!(outcome, InsertOutcome::Inserted);

    // Second attempt with the same natural key is a silent no-op.
    let outcome = store
        .insert_if_absent(&candidate("9.0.1234", "fix foo"))
        .await
        .unwrap();
    assert_eq!(outcome, InsertOutcome::AlreadyExists);

    // Same key with a different title is still the same record.
    let outcome = store
        .insert_if_absent(&candidate("9.0.1234", "reworded"))
        .await
        .unwrap();
    assert_eq!(outcome, InsertOutcome::AlreadyExists);

    let rows = store.list_recent(10).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "9.0.1234");
    assert_eq!(rows[0].title, "fix foo");
    assert_eq!(rows[0].description, "");

    cleanup(db_path).await;
}

#[tokio::test]
async fn list_recent_is_bounded_and_newest_first() {
    let (database_url, db_path) = temp_database_url("listing");
    let store = PatchStore::connect(&database_url).await.unwrap();
    store.init_schema().await.unwrap();

    for i in 1..=15 {
        let name = format!("9.0.{i:04}");
        store
            .insert_if_absent(&candidate(&name, &format!("fix number {i}")))
            .await
            .unwrap();
    }

    let rows = store.list_recent(10).await.unwrap();
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0].name, "9.0.0015");
    assert_eq!(rows[9].name, "9.0.0006");

    let rows = store.list_recent(3).await.unwrap();
    assert_eq!(rows.len(), 3);

    let rows = store.list_recent(100).await.unwrap();
    assert_eq!(rows.len(), 15);

    cleanup(db_path).await;
}

#[tokio::test]
async fn schema_init_is_idempotent() {
    let (database_url, db_path) = temp_database_url("schema");
    let store = PatchStore::connect(&database_url).await.unwrap();

    store.init_schema().await.unwrap();
    store
        .insert_if_absent(&candidate("8.2.0001", "fix"))
        .await
        .unwrap();

    // Reapplying the DDL must not fail or drop data.
    store.init_schema().await.unwrap();
    let rows = store.list_recent(10).await.unwrap();
    assert_eq!(rows.len(), 1);

    cleanup(db_path).await;
}

#[tokio::test]
async fn created_at_is_assigned_by_the_store() {
    let (database_url, db_path) = temp_database_url("created");
    let store = PatchStore::connect(&database_url).await.unwrap();
    store.init_schema().await.unwrap();

    let before = chrono::Utc::now();
    store
        .insert_if_absent(&candidate("9.1.0001", "fix"))
        .await
        .unwrap();
    let after = chrono::Utc::now();

    let rows = store.list_recent(1).await.unwrap();
    assert!(rows[0].created_at >= before);
    assert!(rows[0].created_at <= after);

    cleanup(db_path).await;
}
