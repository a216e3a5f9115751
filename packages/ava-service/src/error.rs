pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Identity(#[from] ava_domain::identity::Error),
	#[error("No corpus collection {collection} exists for this identity.")]
	CorpusNotFound { collection: String },
	#[error("Persona data unavailable: {message}")]
	PersonaData { message: String },
	#[error("Retrieval failed: {message}")]
	Retrieval { message: String },
	#[error("Completion failed: {message}")]
	Completion { message: String },
	#[error("History cache failure: {message}")]
	History { message: String },
}
