use std::collections::HashMap;

use qdrant_client::qdrant::{Query, QueryPointsBuilder, ScoredPoint, Value, value::Kind};

use ava_domain::corpus::Passage;

use crate::Result;

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
}
impl QdrantStore {
	pub fn new(cfg: &ava_config::Qdrant) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self { client })
	}

	pub async fn collection_exists(&self, collection: &str) -> Result<bool> {
		Ok(self.client.collection_exists(collection).await?)
	}

	/// Nearest-neighbour search in one corpus collection, payload included for
	/// attribution.
	pub async fn search(
		&self,
		collection: &str,
		vector: &[f32],
		limit: u64,
	) -> Result<Vec<Passage>> {
		let request = QueryPointsBuilder::new(collection.to_string())
			.query(Query::new_nearest(vector.to_vec()))
			.with_payload(true)
			.limit(limit);
		let response = self.client.query(request).await?;

		Ok(response.result.iter().map(point_to_passage).collect())
	}
}

fn point_to_passage(point: &ScoredPoint) -> Passage {
	Passage {
		text: payload_string(&point.payload, "text").unwrap_or_default(),
		title: payload_string(&point.payload, "title"),
		source: payload_string(&point.payload, "source"),
		tags: payload_string_list(&point.payload, "tags"),
		score: point.score,
	}
}

fn payload_string(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
	let value = payload.get(key)?;

	match &value.kind {
		Some(Kind::StringValue(text)) => Some(text.to_string()),
		_ => None,
	}
}

fn payload_string_list(payload: &HashMap<String, Value>, key: &str) -> Vec<String> {
	let Some(value) = payload.get(key) else {
		return Vec::new();
	};

	match &value.kind {
		Some(Kind::ListValue(list)) => list
			.values
			.iter()
			.filter_map(|item| match &item.kind {
				Some(Kind::StringValue(text)) => Some(text.to_string()),
				_ => None,
			})
			.collect(),
		_ => Vec::new(),
	}
}
