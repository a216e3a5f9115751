use serde::{Deserialize, Serialize};

/// One question/answer pair of a conversation, oldest first in a session's sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
	pub question: String,
	pub response: String,
}

pub fn cache_key(session_id: &str) -> String {
	format!("session:{session_id}:history")
}

/// The whole sequence is stored as one JSON value and rewritten wholesale on write.
pub fn encode_turns(turns: &[Turn]) -> serde_json::Result<serde_json::Value> {
	serde_json::to_value(turns)
}

pub fn decode_turns(value: serde_json::Value) -> serde_json::Result<Vec<Turn>> {
	serde_json::from_value(value)
}
