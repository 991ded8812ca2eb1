pub const DDL: &str = r#"
CREATE TABLE IF NOT EXISTS events (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  prompt TEXT NOT NULL,
  backend_id TEXT NOT NULL,
  output TEXT NOT NULL,
  latency_ms REAL,
  tokens INTEGER,
  cost REAL,
  rating INTEGER,
  created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_events_created_at ON events(created_at);
"#;
