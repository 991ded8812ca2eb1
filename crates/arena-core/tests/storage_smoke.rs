use arena_core::eval::{summarize, EventTable};
use arena_core::model::{NewEvent, Rating};
use arena_core::storage::{EventSource, Store};
use tempfile::tempdir;

fn event(prompt: &str, backend: &str, rating: Option<i64>) -> NewEvent {
    NewEvent {
        prompt: prompt.into(),
        backend_id: backend.into(),
        output: format!("answer from {backend}"),
        latency_ms: Some(250.0),
        tokens: Some(12),
        cost: Some(0.001),
        rating: rating.map(|r| Rating::new(r).unwrap()),
    }
}

#[test]
fn test_storage_smoke_lifecycle() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let db_path = dir.path().join("arena.db");

    let store = Store::open(&db_path)?;
    store.init_schema()?;
    // schema init is idempotent
    store.init_schema()?;

    let first = store.insert_event(&event("Explain RL simply.", "gpt-4", Some(4)))?;
    let second = store.insert_event(&event("Explain RL simply.", "mock", None))?;
    assert!(second.id > first.id);
    assert!(second.created_at >= first.created_at);
    assert_eq!(store.count_events()?, 2);

    // survives reopen
    drop(store);
    let store = Store::open(&db_path)?;
    let rows = store.fetch_recent(100)?;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].backend_id, "mock");
    assert_eq!(rows[1].rating, serde_json::json!(4));
    Ok(())
}

#[test]
fn test_loader_tolerates_malformed_cells_written_by_other_tools() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let db_path = dir.path().join("arena.db");
    let store = Store::open(&db_path)?;
    store.init_schema()?;

    let conn = rusqlite::Connection::open(&db_path)?;
    conn.execute(
        "INSERT INTO events(prompt, backend_id, output, latency_ms, tokens, cost, rating, created_at)
         VALUES ('p', 'legacy', '', 'slow', 'many', '', 'great', '2026-01-01T00:00:00.000000Z')",
        [],
    )?;
    conn.execute(
        "INSERT INTO events(prompt, backend_id, output, latency_ms, tokens, cost, rating, created_at)
         VALUES ('p', 'legacy', '', '120', 30, NULL, '5', '2026-01-02T00:00:00.000000Z')",
        [],
    )?;

    let table = EventTable::load(&store, 10)?;
    assert_eq!(table.len(), 2);

    // newest first
    let newest = &table.rows()[0];
    assert_eq!(newest.latency_ms, Some(120.0));
    assert_eq!(newest.tokens, Some(30));
    assert_eq!(newest.cost, None);
    assert_eq!(newest.rating.map(Rating::get), Some(5));

    let oldest = &table.rows()[1];
    assert_eq!(oldest.latency_ms, None);
    assert_eq!(oldest.tokens, None);
    assert_eq!(oldest.cost, None);
    assert_eq!(oldest.rating, None);

    let s = summarize(&table);
    assert_eq!(s[0].run_count, 2);
    assert_eq!(s[0].avg_latency_ms, Some(120.0));
    assert_eq!(s[0].avg_rating, Some(5.0));
    Ok(())
}

#[test]
fn test_empty_store_loads_empty_table() -> anyhow::Result<()> {
    let store = Store::memory()?;
    store.init_schema()?;
    let table = EventTable::load(&store, 500)?;
    assert!(table.is_empty());
    assert!(summarize(&table).is_empty());
    Ok(())
}

#[test]
fn test_recency_follows_created_at_not_insertion_id() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let db_path = dir.path().join("arena.db");
    let store = Store::open(&db_path)?;
    store.init_schema()?;

    // id 1 is the newer event, id 2 was backfilled with an older timestamp
    let conn = rusqlite::Connection::open(&db_path)?;
    conn.execute(
        "INSERT INTO events(id, prompt, backend_id, output, created_at)
         VALUES (1, 'new', 'mock', '', '2026-05-01T00:00:00.000000Z')",
        [],
    )?;
    conn.execute(
        "INSERT INTO events(id, prompt, backend_id, output, created_at)
         VALUES (2, 'old', 'mock', '', '2026-01-01T00:00:00.000000Z')",
        [],
    )?;

    let table = EventTable::load(&store, 1)?;
    assert_eq!(table.len(), 1);
    assert_eq!(table.rows()[0].id, 1);
    assert_eq!(table.rows()[0].prompt, "new");

    let prompts: Vec<_> = EventTable::load(&store, 10)?
        .rows()
        .iter()
        .map(|e| e.prompt.clone())
        .collect();
    assert_eq!(prompts, vec!["new", "old"]);
    Ok(())
}

#[test]
fn test_equal_timestamps_fall_back_to_highest_id_first() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let db_path = dir.path().join("arena.db");
    let store = Store::open(&db_path)?;
    store.init_schema()?;

    let conn = rusqlite::Connection::open(&db_path)?;
    for (id, prompt) in [(1, "first"), (2, "second")] {
        conn.execute(
            "INSERT INTO events(id, prompt, backend_id, output, created_at)
             VALUES (?1, ?2, 'mock', '', '2026-03-01T12:00:00.000000Z')",
            rusqlite::params![id, prompt],
        )?;
    }

    let table = EventTable::load(&store, 1)?;
    assert_eq!(table.rows()[0].id, 2);
    assert_eq!(table.rows()[0].prompt, "second");

    let ids: Vec<i64> = EventTable::load(&store, 10)?.rows().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![2, 1]);
    Ok(())
}
