mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	CompletionProviderConfig, Config, EmbeddingProviderConfig, History, Identity, Persona,
	Postgres, Providers, Qdrant, Service, Storage,
};

use std::{fs, path::Path};

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}

	let key = BASE64.decode(&cfg.identity.key).map_err(|_| Error::Validation {
		message: "identity.key must be valid base64.".to_string(),
	})?;

	if key.len() != 32 {
		return Err(Error::Validation {
			message: "identity.key must decode to exactly 32 bytes.".to_string(),
		});
	}

	let iv = BASE64.decode(&cfg.identity.iv).map_err(|_| Error::Validation {
		message: "identity.iv must be valid base64.".to_string(),
	})?;

	if iv.len() != 16 {
		return Err(Error::Validation {
			message: "identity.iv must decode to exactly 16 bytes.".to_string(),
		});
	}

	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.storage.qdrant.url.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.qdrant.url must be non-empty.".to_string(),
		});
	}

	for (label, root) in [
		("storage.qdrant.user_root", &cfg.storage.qdrant.user_root),
		("storage.qdrant.domain_root", &cfg.storage.qdrant.domain_root),
	] {
		if root.is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
		if !root.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
			return Err(Error::Validation {
				message: format!("{label} may only contain ASCII letters, digits, '_' and '-'."),
			});
		}
	}

	if cfg.storage.qdrant.user_root == cfg.storage.qdrant.domain_root {
		return Err(Error::Validation {
			message: "storage.qdrant.user_root and storage.qdrant.domain_root must differ."
				.to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match storage.qdrant.vector_dim."
				.to_string(),
		});
	}
	if cfg.providers.completion.max_tokens == 0 {
		return Err(Error::Validation {
			message: "providers.completion.max_tokens must be greater than zero.".to_string(),
		});
	}

	for (label, key) in [
		("embedding", &cfg.providers.embedding.api_key),
		("completion", &cfg.providers.completion.api_key),
	] {
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}

	if cfg.history.ttl_seconds <= 0 {
		return Err(Error::Validation {
			message: "history.ttl_seconds must be greater than zero.".to_string(),
		});
	}
	if !matches!(cfg.persona.mode.as_str(), "roleplay" | "cited") {
		return Err(Error::Validation {
			message: "persona.mode must be one of roleplay or cited.".to_string(),
		});
	}
	if cfg.persona.top_k == 0 {
		return Err(Error::Validation {
			message: "persona.top_k must be greater than zero.".to_string(),
		});
	}
	if cfg.persona.files_root.as_os_str().is_empty() {
		return Err(Error::Validation {
			message: "persona.files_root must be non-empty.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.persona.mode = cfg.persona.mode.trim().to_ascii_lowercase();
	cfg.storage.qdrant.user_root = cfg.storage.qdrant.user_root.trim().to_string();
	cfg.storage.qdrant.domain_root = cfg.storage.qdrant.domain_root.trim().to_string();
}
