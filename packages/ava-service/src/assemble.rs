use ava_domain::{
	corpus::Passage,
	history::Turn,
	prompt::{self, ChatMessage, PromptMode},
};

use crate::{AvaService, Error, Result};

impl AvaService {
	/// Builds the ordered prompt from persona data, retrieved context, accumulated
	/// history, and the new question.
	pub async fn assemble(
		&self,
		persona: &str,
		history: &[Turn],
		question: &str,
		passages: &[Passage],
	) -> Result<Vec<ChatMessage>> {
		let mode = PromptMode::parse(&self.cfg.persona.mode).unwrap_or(PromptMode::Roleplay);
		let biography = match mode {
			PromptMode::Roleplay => Some(self.read_biography(persona).await?),
			PromptMode::Cited => None,
		};
		let context = prompt::format_context(passages);

		Ok(prompt::assemble(mode, persona, biography.as_deref(), &context, history, question))
	}

	async fn read_biography(&self, persona: &str) -> Result<String> {
		let path = self.cfg.persona.files_root.join("mails").join(persona).join("prompt.txt");

		tokio::fs::read_to_string(&path).await.map_err(|err| Error::PersonaData {
			message: format!("Failed to read biography at {}: {err}.", path.display()),
		})
	}
}
