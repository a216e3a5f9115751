pub mod answer;
pub mod assemble;
pub mod history;
pub mod resolve;

mod error;

pub use error::{Error, Result};
pub use resolve::MergedCorpus;
// For the transport layer, which detokenizes caller-supplied tokens itself.
pub use ava_domain::identity;

use std::{future::Future, pin::Pin, sync::Arc};

use time::OffsetDateTime;

use ava_config::{CompletionProviderConfig, Config, EmbeddingProviderConfig};
use ava_domain::{corpus::Passage, identity::Tokenizer, prompt::ChatMessage};
use ava_providers::{completion, embedding};
use ava_storage::{db::Db, qdrant::QdrantStore};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The one user-visible failure shape; no internal detail ever crosses it.
pub const FALLBACK_ANSWER: &str = "Désolé, ça n'a pas marché.";

/// Caller-supplied request scope; the session id is opaque to this service.
#[derive(Debug, Clone)]
pub struct SessionContext {
	pub session_id: String,
}

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed_query<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>>;
}

pub trait CompletionProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a CompletionProviderConfig,
		messages: &'a [ChatMessage],
	) -> BoxFuture<'a, color_eyre::Result<String>>;
}

pub trait CorpusStore
where
	Self: Send + Sync,
{
	fn collection_exists<'a>(
		&'a self,
		collection: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<bool>>;

	fn search<'a>(
		&'a self,
		collection: &'a str,
		vector: &'a [f32],
		limit: u64,
	) -> BoxFuture<'a, color_eyre::Result<Vec<Passage>>>;
}

pub trait HistoryStore
where
	Self: Send + Sync,
{
	fn read<'a>(
		&'a self,
		cache_key: &'a str,
		now: OffsetDateTime,
	) -> BoxFuture<'a, color_eyre::Result<Option<serde_json::Value>>>;

	fn write<'a>(
		&'a self,
		cache_key: &'a str,
		payload: serde_json::Value,
		expires_at: OffsetDateTime,
	) -> BoxFuture<'a, color_eyre::Result<()>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub completion: Arc<dyn CompletionProvider>,
}

#[derive(Clone)]
pub struct Stores {
	pub corpus: Arc<dyn CorpusStore>,
	pub history: Arc<dyn HistoryStore>,
}

pub struct AvaService {
	pub cfg: Config,
	pub tokenizer: Tokenizer,
	pub stores: Stores,
	pub providers: Providers,
}

struct DefaultProviders;

struct QdrantCorpus {
	store: QdrantStore,
}

struct PgHistory {
	db: Db,
}

impl EmbeddingProvider for DefaultProviders {
	fn embed_query<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>> {
		Box::pin(embedding::embed_query(cfg, text))
	}
}

impl CompletionProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a CompletionProviderConfig,
		messages: &'a [ChatMessage],
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(async move {
			let payload = messages
				.iter()
				.map(serde_json::to_value)
				.collect::<Result<Vec<_>, _>>()?;

			completion::complete(cfg, &payload).await
		})
	}
}

impl CorpusStore for QdrantCorpus {
	fn collection_exists<'a>(
		&'a self,
		collection: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<bool>> {
		Box::pin(async move {
			self.store.collection_exists(collection).await.map_err(color_eyre::Report::new)
		})
	}

	fn search<'a>(
		&'a self,
		collection: &'a str,
		vector: &'a [f32],
		limit: u64,
	) -> BoxFuture<'a, color_eyre::Result<Vec<Passage>>> {
		Box::pin(async move {
			self.store.search(collection, vector, limit).await.map_err(color_eyre::Report::new)
		})
	}
}

impl HistoryStore for PgHistory {
	fn read<'a>(
		&'a self,
		cache_key: &'a str,
		now: OffsetDateTime,
	) -> BoxFuture<'a, color_eyre::Result<Option<serde_json::Value>>> {
		Box::pin(async move {
			ava_storage::history::read(&self.db.pool, cache_key, now)
				.await
				.map_err(color_eyre::Report::new)
		})
	}

	fn write<'a>(
		&'a self,
		cache_key: &'a str,
		payload: serde_json::Value,
		expires_at: OffsetDateTime,
	) -> BoxFuture<'a, color_eyre::Result<()>> {
		Box::pin(async move {
			ava_storage::history::write(&self.db.pool, cache_key, &payload, expires_at)
				.await
				.map_err(color_eyre::Report::new)
		})
	}
}

impl Providers {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		completion: Arc<dyn CompletionProvider>,
	) -> Self {
		Self { embedding, completion }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { embedding: provider.clone(), completion: provider }
	}
}

impl Stores {
	pub fn new(corpus: Arc<dyn CorpusStore>, history: Arc<dyn HistoryStore>) -> Self {
		Self { corpus, history }
	}
}

impl AvaService {
	/// Wires the shared Postgres and Qdrant handles behind the store seams.
	pub fn new(cfg: Config, db: Db, qdrant: QdrantStore) -> Result<Self> {
		let tokenizer = Tokenizer::from_config(&cfg.identity)?;
		let stores =
			Stores::new(Arc::new(QdrantCorpus { store: qdrant }), Arc::new(PgHistory { db }));

		Ok(Self { cfg, tokenizer, stores, providers: Providers::default() })
	}

	pub fn with_parts(
		cfg: Config,
		tokenizer: Tokenizer,
		stores: Stores,
		providers: Providers,
	) -> Self {
		Self { cfg, tokenizer, stores, providers }
	}
}
