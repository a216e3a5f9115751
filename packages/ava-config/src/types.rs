use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub identity: Identity,
	pub storage: Storage,
	pub providers: Providers,
	pub history: History,
	pub persona: Persona,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Identity {
	/// Base64-encoded 32-byte cipher key, provisioned once per deployment.
	pub key: String,
	/// Base64-encoded 16-byte initialization vector, provisioned once per deployment.
	pub iv: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	pub qdrant: Qdrant,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Qdrant {
	pub url: String,
	/// Name root for per-user corpus collections.
	#[serde(default = "default_user_root")]
	pub user_root: String,
	/// Name root for shared per-domain corpus collections.
	#[serde(default = "default_domain_root")]
	pub domain_root: String,
	pub vector_dim: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub completion: CompletionProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub max_tokens: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct History {
	/// Session history lifetime; every write refreshes the deadline.
	#[serde(default = "default_history_ttl_seconds")]
	pub ttl_seconds: i64,
}

#[derive(Debug, Deserialize)]
pub struct Persona {
	/// Root of the per-persona file tree (biographies live under mails/<email>/prompt.txt).
	pub files_root: PathBuf,
	/// Prompt variant: "roleplay" answers in the persona's voice, "cited" cites sources.
	#[serde(default = "default_persona_mode")]
	pub mode: String,
	#[serde(default = "default_top_k")]
	pub top_k: u32,
}

fn default_user_root() -> String {
	"vectors".to_string()
}

fn default_domain_root() -> String {
	"web".to_string()
}

fn default_history_ttl_seconds() -> i64 {
	43_200
}

fn default_persona_mode() -> String {
	"roleplay".to_string()
}

fn default_top_k() -> u32 {
	4
}
