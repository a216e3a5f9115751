use std::cmp::Ordering;

use tracing::{debug, info};

use ava_domain::corpus::Passage;

use crate::{AvaService, Error, Result};

/// Request-scoped retrieval surface spanning the user corpus and, when one exists,
/// the shared corpus of the email's domain. Built fresh per request, never cached.
#[derive(Debug, Clone)]
pub struct MergedCorpus {
	pub email: String,
	pub user_collection: String,
	pub domain_collection: Option<String>,
}

impl AvaService {
	/// Recovers the email behind `user_token` and opens its retrieval surface.
	///
	/// A missing user corpus is fatal for the request; a missing domain corpus is not.
	pub async fn resolve(&self, user_token: &str) -> Result<MergedCorpus> {
		let email = self.tokenizer.detokenize(user_token)?;
		let user_collection = collection_name(&self.cfg.storage.qdrant.user_root, &email);

		if !self.corpus_exists(&user_collection).await? {
			return Err(Error::CorpusNotFound { collection: user_collection });
		}

		let domain_collection = match email.split_once('@').map(|(_, domain)| domain) {
			Some(domain) if !domain.is_empty() => {
				let candidate =
					collection_name(&self.cfg.storage.qdrant.domain_root, &domain.to_lowercase());

				if self.corpus_exists(&candidate).await? {
					info!(collection = %candidate, "Merging domain corpus into user corpus.");

					Some(candidate)
				} else {
					debug!(collection = %candidate, "No domain corpus for this identity.");

					None
				}
			},
			_ => None,
		};

		Ok(MergedCorpus { email, user_collection, domain_collection })
	}

	/// Top-k passages for `query` across every member collection, best score first.
	pub async fn retrieve(
		&self,
		corpus: &MergedCorpus,
		query: &str,
		top_k: u32,
	) -> Result<Vec<Passage>> {
		let vector = self
			.providers
			.embedding
			.embed_query(&self.cfg.providers.embedding, query)
			.await
			.map_err(|err| Error::Retrieval { message: err.to_string() })?;
		let mut passages = self.search_collection(&corpus.user_collection, &vector, top_k).await?;

		if let Some(domain_collection) = corpus.domain_collection.as_deref() {
			passages.extend(self.search_collection(domain_collection, &vector, top_k).await?);
		}

		Ok(merge_passages(passages, top_k as usize))
	}

	async fn corpus_exists(&self, collection: &str) -> Result<bool> {
		self.stores
			.corpus
			.collection_exists(collection)
			.await
			.map_err(|err| Error::Retrieval { message: err.to_string() })
	}

	async fn search_collection(
		&self,
		collection: &str,
		vector: &[f32],
		top_k: u32,
	) -> Result<Vec<Passage>> {
		self.stores
			.corpus
			.search(collection, vector, top_k as u64)
			.await
			.map_err(|err| Error::Retrieval { message: err.to_string() })
	}
}

/// Deterministic collection name for a corpus key under a name root.
pub fn collection_name(root: &str, key: &str) -> String {
	let sanitized: String = key
		.chars()
		.map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
		.collect();

	format!("{root}_{sanitized}")
}

fn merge_passages(mut passages: Vec<Passage>, top_k: usize) -> Vec<Passage> {
	passages.sort_by(|left, right| cmp_f32_desc(left.score, right.score));
	passages.truncate(top_k);

	passages
}

fn cmp_f32_desc(a: f32, b: f32) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
	}
}
