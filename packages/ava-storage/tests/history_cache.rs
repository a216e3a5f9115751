use std::time::{SystemTime, UNIX_EPOCH};

use time::{Duration, OffsetDateTime};

use ava_config::Postgres;
use ava_storage::{db::Db, history};

fn env_dsn() -> Option<String> {
	std::env::var("AVA_PG_DSN").ok().filter(|dsn| !dsn.trim().is_empty())
}

fn unique_cache_key(tag: &str) -> String {
	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();

	format!("session:{tag}_{nanos}_{}:history", std::process::id())
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set AVA_PG_DSN to run."]
async fn history_rows_round_trip_and_expire() {
	let Some(dsn) = env_dsn() else {
		eprintln!("Skipping history_rows_round_trip_and_expire; set AVA_PG_DSN to run this test.");

		return;
	};
	let cfg = Postgres { dsn, pool_max_conns: 1 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	let cache_key = unique_cache_key("round_trip");
	let now = OffsetDateTime::now_utc();
	let payload = serde_json::json!([{ "question": "Bonjour", "response": "Bonjour !" }]);

	history::write(&db.pool, &cache_key, &payload, now + Duration::hours(12))
		.await
		.expect("Failed to write history.");

	let read = history::read(&db.pool, &cache_key, now).await.expect("Failed to read history.");

	assert_eq!(read, Some(payload));

	// The same key rewrites wholesale on conflict.
	let extended = serde_json::json!([
		{ "question": "Bonjour", "response": "Bonjour !" },
		{ "question": "Et après ?", "response": "Voilà." },
	]);

	history::write(&db.pool, &cache_key, &extended, now + Duration::hours(12))
		.await
		.expect("Failed to rewrite history.");

	let read = history::read(&db.pool, &cache_key, now).await.expect("Failed to read history.");

	assert_eq!(read, Some(extended));

	let expired = history::read(&db.pool, &cache_key, now + Duration::hours(13))
		.await
		.expect("Failed to read history.");

	assert_eq!(expired, None);
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set AVA_PG_DSN to run."]
async fn schema_bootstrap_is_idempotent() {
	let Some(dsn) = env_dsn() else {
		eprintln!("Skipping schema_bootstrap_is_idempotent; set AVA_PG_DSN to run this test.");

		return;
	};
	let cfg = Postgres { dsn, pool_max_conns: 1 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");
	db.ensure_schema().await.expect("Failed to ensure schema twice.");

	let count: i64 = sqlx::query_scalar(
		"SELECT count(*) FROM information_schema.tables WHERE table_name = 'session_history'",
	)
	.fetch_one(&db.pool)
	.await
	.expect("Failed to query schema tables.");

	assert_eq!(count, 1);
}
