use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde_json::Value;

/// Embeds one query string; corpus documents are embedded by the ingestion pipeline,
/// never here.
pub async fn embed_query(
	cfg: &ava_config::EmbeddingProviderConfig,
	text: &str,
) -> Result<Vec<f32>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"input": [text],
		"dimensions": cfg.dimensions,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_query_embedding(json, cfg.dimensions)
}

fn parse_query_embedding(json: Value, dimensions: u32) -> Result<Vec<f32>> {
	let embedding = json
		.get("data")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|item| item.get("embedding"))
		.and_then(|v| v.as_array())
		.ok_or_else(|| eyre::eyre!("Embedding response is missing an embedding array."))?;
	let mut vec = Vec::with_capacity(embedding.len());

	for value in embedding {
		let number =
			value.as_f64().ok_or_else(|| eyre::eyre!("Embedding value must be numeric."))?;

		vec.push(number as f32);
	}

	if vec.len() != dimensions as usize {
		return Err(eyre::eyre!("Embedding vector dimension mismatch."));
	}

	Ok(vec)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_first_embedding() {
		let json = serde_json::json!({
			"data": [
				{ "index": 0, "embedding": [0.5, 1.5, -0.25] }
			]
		});
		let parsed = parse_query_embedding(json, 3).expect("parse failed");

		assert_eq!(parsed, vec![0.5, 1.5, -0.25]);
	}

	#[test]
	fn rejects_dimension_mismatch() {
		let json = serde_json::json!({
			"data": [
				{ "index": 0, "embedding": [0.5, 1.5] }
			]
		});

		assert!(parse_query_embedding(json, 3).is_err());
	}

	#[test]
	fn rejects_missing_data() {
		assert!(parse_query_embedding(serde_json::json!({}), 3).is_err());
	}
}
