use super::EventSource;
use crate::errors::StoreError;
use crate::model::{now_rfc3339, GenerationEvent, NewEvent, Rating, RawEventRow};
use anyhow::Context;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

const SELECT_COLUMNS: &str =
    "id, prompt, backend_id, output, latency_ms, tokens, cost, rating, created_at";

/// Append-only event log on a single SQLite connection.
#[derive(Clone)]
pub struct Store {
    pub(crate) conn: Arc<Mutex<Connection>>,
}

impl Store {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open sqlite db {}", path.display()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory sqlite db")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn init_schema(&self) -> anyhow::Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(crate::storage::schema::DDL)?;
        Ok(())
    }

    pub fn insert_event(&self, ev: &NewEvent) -> anyhow::Result<GenerationEvent> {
        let tokens = ev
            .tokens
            .map(i64::try_from)
            .transpose()
            .with_context(|| format!("token count {:?} does not fit the events table", ev.tokens))?;
        let created_at = now_rfc3339();
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO events(prompt, backend_id, output, latency_ms, tokens, cost, rating, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                ev.prompt,
                ev.backend_id,
                ev.output,
                ev.latency_ms,
                tokens,
                ev.cost,
                ev.rating.map(|r| r.get()),
                created_at,
            ],
        )?;
        let id = conn.last_insert_rowid();
        tracing::debug!(event_id = id, backend = %ev.backend_id, "event inserted");

        Ok(GenerationEvent {
            id,
            prompt: ev.prompt.clone(),
            backend_id: ev.backend_id.clone(),
            output: ev.output.clone(),
            latency_ms: ev.latency_ms,
            tokens: ev.tokens,
            cost: ev.cost,
            rating: ev.rating,
            created_at,
        })
    }

    pub fn get_event(&self, id: i64) -> anyhow::Result<Option<RawEventRow>> {
        let conn = self.lock()?;
        let sql = format!("SELECT {SELECT_COLUMNS} FROM events WHERE id = ?1");
        let row = conn
            .query_row(&sql, params![id], raw_row_from_sql)
            .optional()?;
        Ok(row)
    }

    /// Attaches a rating to an event that has none yet.
    pub fn set_rating(&self, id: i64, rating: Rating) -> anyhow::Result<()> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE events SET rating = ?1 WHERE id = ?2 AND rating IS NULL",
            params![rating.get(), id],
        )?;
        if changed == 1 {
            return Ok(());
        }

        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM events WHERE id = ?1)",
            params![id],
            |r| r.get(0),
        )?;
        if exists {
            Err(StoreError::RatingAlreadySet(id).into())
        } else {
            Err(StoreError::EventNotFound(id).into())
        }
    }

    pub fn count_events(&self) -> anyhow::Result<u64> {
        let conn = self.lock()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM events", [], |r| r.get(0))?;
        Ok(n as u64)
    }

    fn lock(&self) -> anyhow::Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("store connection lock poisoned"))
    }
}

impl EventSource for Store {
    fn fetch_recent(&self, limit: usize) -> anyhow::Result<Vec<RawEventRow>> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM events ORDER BY created_at DESC, id DESC LIMIT ?1"
        );
        let mut stmt = conn.prepare(&sql)?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map(params![limit], raw_row_from_sql)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }
}

fn raw_row_from_sql(row: &Row<'_>) -> rusqlite::Result<RawEventRow> {
    Ok(RawEventRow {
        id: row.get(0)?,
        prompt: row.get(1)?,
        backend_id: row.get(2)?,
        output: row.get(3)?,
        latency_ms: cell_to_json(row.get(4)?),
        tokens: cell_to_json(row.get(5)?),
        cost: cell_to_json(row.get(6)?),
        rating: cell_to_json(row.get(7)?),
        created_at: row.get(8)?,
    })
}

fn cell_to_json(v: SqlValue) -> serde_json::Value {
    match v {
        SqlValue::Null | SqlValue::Blob(_) => serde_json::Value::Null,
        SqlValue::Integer(i) => serde_json::Value::from(i),
        SqlValue::Real(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        SqlValue::Text(s) => serde_json::Value::String(s),
    }
}
