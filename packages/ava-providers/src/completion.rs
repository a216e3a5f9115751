use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde_json::Value;

const MAX_ATTEMPTS: usize = 3;

/// Chat-completion call. Transport errors and 5xx responses retry up to
/// [`MAX_ATTEMPTS`]; the caller owns no retry beyond this.
pub async fn complete(
	cfg: &ava_config::CompletionProviderConfig,
	messages: &[Value],
) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"max_tokens": cfg.max_tokens,
		"messages": messages,
	});
	let mut last_error = None;

	for attempt in 1..=MAX_ATTEMPTS {
		let sent = client
			.post(&url)
			.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
			.json(&body)
			.send()
			.await;
		let res = match sent {
			Ok(res) => res,
			Err(err) => {
				last_error = Some(err.into());

				continue;
			},
		};

		if res.status().is_server_error() && attempt < MAX_ATTEMPTS {
			last_error = Some(eyre::eyre!("Completion provider returned {}.", res.status()));

			continue;
		}

		let json: Value = res.error_for_status()?.json().await?;

		return parse_completion_text(json);
	}

	Err(last_error.unwrap_or_else(|| eyre::eyre!("Completion provider unreachable.")))
}

fn parse_completion_text(json: Value) -> Result<String> {
	let content = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.ok_or_else(|| eyre::eyre!("Completion response is missing message content."))?;

	Ok(content.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_choice_message_content() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "content": "Bonjour, je suis consultant." } }
			]
		});
		let parsed = parse_completion_text(json).expect("parse failed");

		assert_eq!(parsed, "Bonjour, je suis consultant.");
	}

	#[test]
	fn rejects_response_without_choices() {
		assert!(parse_completion_text(serde_json::json!({ "choices": [] })).is_err());
	}
}
