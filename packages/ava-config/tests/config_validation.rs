use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use ava_config::Config;

const SAMPLE_CONFIG_TOML: &str = include_str!("../../../ava.example.toml");

fn base_config() -> Config {
	toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("ava_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

#[test]
fn ava_example_toml_is_valid() {
	let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

	path.push("../../ava.example.toml");

	ava_config::load(&path).expect("Expected ava.example.toml to be a valid config.");
}

#[test]
fn identity_key_must_decode_to_32_bytes() {
	let mut cfg = base_config();

	cfg.identity.key = "c2hvcnQ=".to_string();

	let err = ava_config::validate(&cfg).expect_err("Expected identity key validation error.");

	assert!(
		err.to_string().contains("identity.key must decode to exactly 32 bytes."),
		"Unexpected error: {err}"
	);
}

#[test]
fn identity_iv_must_be_valid_base64() {
	let mut cfg = base_config();

	cfg.identity.iv = "not base64!".to_string();

	let err = ava_config::validate(&cfg).expect_err("Expected identity IV validation error.");

	assert!(
		err.to_string().contains("identity.iv must be valid base64."),
		"Unexpected error: {err}"
	);
}

#[test]
fn embedding_dimensions_must_match_vector_dim() {
	let mut cfg = base_config();

	cfg.providers.embedding.dimensions = cfg.storage.qdrant.vector_dim + 1;

	let err = ava_config::validate(&cfg).expect_err("Expected dimensions validation error.");

	assert!(
		err.to_string()
			.contains("providers.embedding.dimensions must match storage.qdrant.vector_dim."),
		"Unexpected error: {err}"
	);
}

#[test]
fn history_ttl_must_be_positive() {
	let mut cfg = base_config();

	cfg.history.ttl_seconds = 0;

	let err = ava_config::validate(&cfg).expect_err("Expected history TTL validation error.");

	assert!(
		err.to_string().contains("history.ttl_seconds must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn persona_mode_must_be_known() {
	let payload = SAMPLE_CONFIG_TOML.replace("\"roleplay\"", "\"chatty\"");
	let path = write_temp_config(payload);
	let result = ava_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let err = result.expect_err("Expected persona mode validation error.");

	assert!(
		err.to_string().contains("persona.mode must be one of roleplay or cited."),
		"Unexpected error: {err}"
	);
}

#[test]
fn persona_mode_is_case_insensitive_after_load() {
	let payload = SAMPLE_CONFIG_TOML.replace("\"roleplay\"", "\" Cited \"");
	let path = write_temp_config(payload);
	let result = ava_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let cfg = result.expect("Expected normalized persona mode to pass validation.");

	assert_eq!(cfg.persona.mode, "cited");
}

#[test]
fn corpus_roots_must_differ() {
	let mut cfg = base_config();

	cfg.storage.qdrant.domain_root = cfg.storage.qdrant.user_root.clone();

	let err = ava_config::validate(&cfg).expect_err("Expected corpus root validation error.");

	assert!(
		err.to_string()
			.contains("storage.qdrant.user_root and storage.qdrant.domain_root must differ."),
		"Unexpected error: {err}"
	);
}

#[test]
fn corpus_roots_reject_exotic_characters() {
	let mut cfg = base_config();

	cfg.storage.qdrant.user_root = "vectors/user".to_string();

	let err = ava_config::validate(&cfg).expect_err("Expected corpus root charset error.");

	assert!(
		err.to_string().contains(
			"storage.qdrant.user_root may only contain ASCII letters, digits, '_' and '-'."
		),
		"Unexpected error: {err}"
	);
}

#[test]
fn provider_api_keys_must_be_non_empty() {
	let mut cfg = base_config();

	cfg.providers.completion.api_key = "   ".to_string();

	let err = ava_config::validate(&cfg).expect_err("Expected api_key validation error.");

	assert!(
		err.to_string().contains("Provider completion api_key must be non-empty."),
		"Unexpected error: {err}"
	);
}
