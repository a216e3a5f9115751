use serde_json::Value;
use sqlx::{PgPool, Row};
use time::OffsetDateTime;

use crate::Result;

/// Reads the stored turn sequence; rows past their deadline read as absent.
pub async fn read(pool: &PgPool, cache_key: &str, now: OffsetDateTime) -> Result<Option<Value>> {
	let row = sqlx::query(
		"\
SELECT payload
FROM session_history
WHERE cache_key = $1
	AND expires_at > $2",
	)
	.bind(cache_key)
	.bind(now)
	.fetch_optional(pool)
	.await?;

	Ok(row.map(|row| row.get("payload")))
}

/// Upserts the whole sequence under a refreshed deadline.
pub async fn write(
	pool: &PgPool,
	cache_key: &str,
	payload: &Value,
	expires_at: OffsetDateTime,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO session_history (cache_key, payload, expires_at)
VALUES ($1, $2, $3)
ON CONFLICT (cache_key)
DO UPDATE SET payload = EXCLUDED.payload, expires_at = EXCLUDED.expires_at",
	)
	.bind(cache_key)
	.bind(payload)
	.bind(expires_at)
	.execute(pool)
	.await?;

	Ok(())
}
