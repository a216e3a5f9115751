use serde::{Deserialize, Serialize};

/// One retrieved passage with the attribution metadata carried in the index payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
	pub text: String,
	pub title: Option<String>,
	pub source: Option<String>,
	#[serde(default)]
	pub tags: Vec<String>,
	pub score: f32,
}
