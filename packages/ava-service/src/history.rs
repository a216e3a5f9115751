use time::{Duration, OffsetDateTime};

use ava_domain::history::{self, Turn};

use crate::{AvaService, Error, Result};

impl AvaService {
	/// Absent and expired entries both read as an empty conversation; a miss is not
	/// an error.
	pub async fn load_history(&self, session_id: &str, now: OffsetDateTime) -> Result<Vec<Turn>> {
		let cache_key = history::cache_key(session_id);
		let Some(payload) = self
			.stores
			.history
			.read(&cache_key, now)
			.await
			.map_err(|err| Error::History { message: err.to_string() })?
		else {
			return Ok(Vec::new());
		};

		history::decode_turns(payload).map_err(|err| Error::History { message: err.to_string() })
	}

	/// Rewrites the whole sequence with a refreshed deadline. Plain read-modify-write:
	/// concurrent writers for one session race and the last full write wins.
	pub async fn append_history(
		&self,
		session_id: &str,
		turn: Turn,
		now: OffsetDateTime,
	) -> Result<()> {
		let mut turns = self.load_history(session_id, now).await?;

		turns.push(turn);

		let payload = history::encode_turns(&turns)
			.map_err(|err| Error::History { message: err.to_string() })?;
		let cache_key = history::cache_key(session_id);
		let expires_at = now + Duration::seconds(self.cfg.history.ttl_seconds);

		self.stores
			.history
			.write(&cache_key, payload, expires_at)
			.await
			.map_err(|err| Error::History { message: err.to_string() })
	}
}
