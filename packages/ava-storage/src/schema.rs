pub const SCHEMA_SQL: &str = "\
CREATE TABLE IF NOT EXISTS session_history (
	cache_key  TEXT PRIMARY KEY,
	payload    JSONB NOT NULL,
	expires_at TIMESTAMPTZ NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_session_history_expires_at
	ON session_history (expires_at);
";
