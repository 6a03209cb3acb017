use async_trait::async_trait;
use fieldnotes_core::{
    KeyValueStore, Location, MemoryKvStore, Note, NoteStore, SqliteKvStore, StoreError,
    StoreResult, NOTES_KEY,
};
use std::sync::Arc;

/// Store whose every call fails.
struct BrokenKvStore;

#[async_trait]
impl KeyValueStore for BrokenKvStore {
    async fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        Err(StoreError::Backend("disk unavailable".to_string()))
    }

    async fn set(&self, _key: &str, _value: String) -> StoreResult<()> {
        Err(StoreError::Backend("disk full".to_string()))
    }

    async fn remove(&self, _key: &str) -> StoreResult<()> {
        Err(StoreError::Backend("disk unavailable".to_string()))
    }
}

fn sample_notes() -> Vec<Note> {
    vec![
        Note {
            id: "1715000000001".to_string(),
            title: "Heron at the pond".to_string(),
            description: "standing still for ten minutes".to_string(),
            image: Some("file:///data/photos/heron.jpg".to_string()),
            location: Some(
                Location::new(52.2297, 21.0122)
                    .with_address_parts(Some("Nowy Swiat"), Some("Warszawa")),
            ),
            date: "2024-05-06T12:53:20.001Z".to_string(),
        },
        Note {
            id: "1715000000000".to_string(),
            title: "Empty description".to_string(),
            description: String::new(),
            image: None,
            location: None,
            date: "2024-05-06T12:53:20.000Z".to_string(),
        },
    ]
}

#[tokio::test]
async fn missing_record_reads_as_empty() {
    let store = NoteStore::new(Arc::new(MemoryKvStore::new()));
    assert!(store.read_all().await.is_empty());
}

#[tokio::test]
async fn write_then_read_is_lossless() {
    let store = NoteStore::new(Arc::new(SqliteKvStore::open_in_memory().unwrap()));
    let notes = sample_notes();

    store.write_all(&notes).await.unwrap();
    let loaded = store.read_all().await;
    assert_eq!(loaded, notes);

    store.write_all(&loaded).await.unwrap();
    assert_eq!(store.read_all().await, notes);
}

#[tokio::test]
async fn corrupt_record_reads_as_empty() {
    let kv = Arc::new(MemoryKvStore::new());
    kv.set(NOTES_KEY, "{not json".to_string()).await.unwrap();

    let store = NoteStore::new(kv);
    assert!(store.read_all().await.is_empty());
}

#[tokio::test]
async fn wrong_shape_record_reads_as_empty() {
    let kv = Arc::new(MemoryKvStore::new());
    kv.set(NOTES_KEY, r#"{"id":"1"}"#.to_string()).await.unwrap();

    let store = NoteStore::new(kv);
    assert!(store.read_all().await.is_empty());
}

#[tokio::test]
async fn backend_read_failure_reads_as_empty() {
    let store = NoteStore::new(Arc::new(BrokenKvStore));
    assert!(store.read_all().await.is_empty());
}

#[tokio::test]
async fn load_surfaces_backend_failure_but_not_corruption() {
    let err = NoteStore::new(Arc::new(BrokenKvStore)).load().await.unwrap_err();
    assert!(matches!(err, StoreError::Backend(_)));

    let kv = Arc::new(MemoryKvStore::new());
    kv.set(NOTES_KEY, "{not json".to_string()).await.unwrap();
    assert!(NoteStore::new(kv).load().await.unwrap().is_empty());
}

#[tokio::test]
async fn backend_write_failure_is_reported() {
    let store = NoteStore::new(Arc::new(BrokenKvStore));
    let err = store.write_all(&sample_notes()).await.unwrap_err();
    assert!(matches!(err, StoreError::Backend(_)));
}

#[tokio::test]
async fn clear_removes_the_record() {
    let kv = Arc::new(MemoryKvStore::new());
    let store = NoteStore::new(kv.clone());
    store.write_all(&sample_notes()).await.unwrap();

    store.clear().await.unwrap();
    assert_eq!(kv.get(NOTES_KEY).await.unwrap(), None);
    assert!(store.read_all().await.is_empty());
}

#[tokio::test]
async fn record_survives_reopening_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");
    let notes = sample_notes();

    {
        let store = NoteStore::new(Arc::new(SqliteKvStore::open(&path).unwrap()));
        store.write_all(&notes).await.unwrap();
    }

    let store = NoteStore::new(Arc::new(SqliteKvStore::open(&path).unwrap()));
    assert_eq!(store.read_all().await, notes);
}

#[tokio::test]
async fn stored_record_uses_expected_json_field_names() {
    let kv = Arc::new(MemoryKvStore::new());
    let store = NoteStore::new(kv.clone());
    store.write_all(&sample_notes()[1..]).await.unwrap();

    let raw = kv.get(NOTES_KEY).await.unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let first = &value[0];
    assert_eq!(first["id"], "1715000000000");
    assert_eq!(first["description"], "");
    assert!(first["image"].is_null());
    assert!(first["location"].is_null());
    assert_eq!(first["date"], "2024-05-06T12:53:20.000Z");
}
