//! Database integration tests with a file-backed DuckDB store
//!
//! Covers config-driven opening, seeding, reopening a persisted dataset,
//! and pagination behaviour under concurrent inserts.

use pagewise::config::AppConfig;
use pagewise::seed::{seed, SeedOptions};
use pagewise::{
    CursorRequest, DuckDbStore, Error, KeysetRequest, NewRow, OffsetRequest, PaginationEngine,
    Row,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn ids(rows: &[Row]) -> Vec<i64> {
    rows.iter().map(|r| r.id).collect()
}

fn config_for(dir: &TempDir, table: &str) -> AppConfig {
    let yaml = format!(
        "database:\n  path: {}\n  table: {table}\nserver:\n  port: 9000\n",
        dir.path().join("pagination.duckdb").display()
    );
    let config = AppConfig::from_yaml(&yaml).unwrap();
    config.validate().unwrap();
    config
}

#[test]
fn test_seeded_file_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, "people");

    {
        let store = DuckDbStore::from_config(&config.database).unwrap();
        seed(&store, &SeedOptions::new(150).with_rng_seed(21)).unwrap();
    }

    let store = Arc::new(DuckDbStore::from_config(&config.database).unwrap());
    assert_eq!(store.table(), "people");
    assert_eq!(store.count().unwrap(), 150);

    let engine = PaginationEngine::new(store);
    let page = engine
        .offset(&OffsetRequest::new(140, 100).unwrap())
        .unwrap();
    assert_eq!(ids(&page.data), (141..=150).collect::<Vec<_>>());
}

#[test]
fn test_tables_are_independent() {
    let dir = TempDir::new().unwrap();
    let a = DuckDbStore::from_config(&config_for(&dir, "set_a").database).unwrap();
    seed(&a, &SeedOptions::new(5).with_rng_seed(1)).unwrap();
    drop(a);

    let b = DuckDbStore::from_config(&config_for(&dir, "set_b").database).unwrap();
    assert_eq!(b.count().unwrap(), 0);
}

#[test]
fn test_yaml_rejects_bad_table() {
    let yaml = "database:\n  table: \"users; drop\"\n";
    let config = AppConfig::from_yaml(yaml).unwrap();

    assert!(matches!(
        config.validate(),
        Err(Error::InvalidConfigValue { .. })
    ));
}

#[test]
fn test_drift_with_concurrent_writer() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, "drift");
    let store = Arc::new(DuckDbStore::from_config(&config.database).unwrap());
    for id in (1..=10).map(|n| n * 10) {
        store
            .insert_row(&NewRow::new("x", 20, "Mumbai", id * 1_000).with_id(id))
            .unwrap();
    }
    let engine = PaginationEngine::new(store.clone());

    // Page one of each strategy, then a writer lands a row ahead of the reader.
    let first_offset = engine.offset(&OffsetRequest::new(0, 3).unwrap()).unwrap();
    let first_keyset = engine.keyset(&KeysetRequest::new(3, None).unwrap()).unwrap();
    let first_cursor = engine.cursor(&CursorRequest::new(3, None).unwrap()).unwrap();

    let writer = {
        let store = store.clone();
        std::thread::spawn(move || {
            store
                .insert_row(&NewRow::new("new", 21, "Tokyo", 1).with_id(1))
                .unwrap();
            store
                .insert_row(&NewRow::new("newest", 22, "Tokyo", 500_000).with_id(2))
                .unwrap();
        })
    };
    writer.join().unwrap();

    let second_offset = engine.offset(&first_offset_next(&first_offset)).unwrap();
    let second_keyset = engine
        .keyset(&KeysetRequest::new(3, first_keyset.meta.next_last_id).unwrap())
        .unwrap();
    let second_cursor = engine
        .cursor(
            &CursorRequest::from_parts(Some(3), first_cursor.meta.page_info.end_cursor.as_deref())
                .unwrap(),
        )
        .unwrap();

    // Offset repeats the last row of page one.
    assert_eq!(ids(&first_offset.data), vec![10, 20, 30]);
    assert_eq!(ids(&second_offset.data), vec![20, 30, 40]);

    // Keyset and cursor continue exactly where they left off.
    assert_eq!(ids(&second_keyset.data), vec![40, 50, 60]);
    assert_eq!(ids(&first_cursor.data), vec![100, 90, 80]);
    assert_eq!(ids(&second_cursor.data), vec![70, 60, 50]);
}

fn first_offset_next(page: &pagewise::OffsetPage) -> OffsetRequest {
    OffsetRequest::new(page.meta.offset as i64, page.meta.limit as i64)
        .unwrap()
        .next()
}

#[tokio::test]
async fn test_concurrent_calls_share_one_store() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, "shared");
    let store = Arc::new(DuckDbStore::from_config(&config.database).unwrap());
    seed(&store, &SeedOptions::new(400).with_rng_seed(8)).unwrap();
    let engine = Arc::new(PaginationEngine::new(store));

    let mut handles = Vec::new();
    for i in 0..8_i64 {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            engine
                .call(Duration::from_secs(10), move |e| {
                    e.keyset(&KeysetRequest::new(50, Some(i * 50))?)
                })
                .await
        }));
    }

    let mut all = Vec::new();
    for handle in handles {
        let page = handle.await.unwrap().unwrap();
        assert_eq!(page.len(), 50);
        all.extend(ids(&page.data));
    }
    all.sort_unstable();
    assert_eq!(all, (1..=400).collect::<Vec<_>>());
}
