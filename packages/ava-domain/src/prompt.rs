use serde::Serialize;

use crate::{corpus::Passage, history::Turn};

/// Prompt variant: speak in the persona's voice, or answer with source citations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptMode {
	Roleplay,
	Cited,
}

impl PromptMode {
	pub fn parse(value: &str) -> Option<Self> {
		match value {
			"roleplay" => Some(Self::Roleplay),
			"cited" => Some(Self::Cited),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	System,
	User,
	Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
	pub role: Role,
	pub content: String,
}

impl ChatMessage {
	pub fn system(content: impl Into<String>) -> Self {
		Self { role: Role::System, content: content.into() }
	}

	pub fn user(content: impl Into<String>) -> Self {
		Self { role: Role::User, content: content.into() }
	}

	pub fn assistant(content: impl Into<String>) -> Self {
		Self { role: Role::Assistant, content: content.into() }
	}
}

const ROLEPLAY_TEMPLATE: &str = "Tu es l'avatar de la personne indiquée. \
Tu as accès aux documents décrivant cette personne et les offres commerciales qu'elle porte. \
Tu fais des réponses en son nom, donc tu réponds \"je suis né ...\" comme si tu étais cette personne. \
Ne réponds qu'avec les informations de ton contexte. \
Si tu ne connais pas la réponse, indique-le clairement. \
Il faut être poli mais dans une conversation : on dit bonjour au début, et on ne dit au revoir que si l'utilisateur le dit en premier. \
Quand on te dit bonjour sans question, tu peux proposer : que voulez-vous savoir sur moi ou sur mes offres ?\n\
----------------\n\
{context}\n\
----------------";

const CITED_TEMPLATE: &str = "Utilise les informations suivantes pour répondre à la question ci-dessous. \
Si tu ne connais pas la réponse, indique-le clairement. \
Dans ta réponse, inclus les sources et les éléments pour aider l'utilisateur à les retrouver, comme le numéro de page et le nom du document. \
Structure ta réponse de manière claire et logique.\n\
----------------\n\
{context}\n\
----------------";

/// Retrieved passages collapse into one context block for the system message.
pub fn format_context(passages: &[Passage]) -> String {
	passages.iter().map(|passage| passage.text.as_str()).collect::<Vec<_>>().join("\n\n")
}

/// Builds the ordered prompt: one system message, then the history replayed as
/// alternating user/assistant messages oldest first, then the new question last.
pub fn assemble(
	mode: PromptMode,
	persona: &str,
	biography: Option<&str>,
	context: &str,
	history: &[Turn],
	question: &str,
) -> Vec<ChatMessage> {
	let mut system = match mode {
		PromptMode::Roleplay => ROLEPLAY_TEMPLATE.replace("{context}", context),
		PromptMode::Cited => CITED_TEMPLATE.replace("{context}", context),
	};

	if mode == PromptMode::Roleplay {
		system.push_str(&format!("\nTu es l'avatar de : {persona}."));

		if let Some(cv) = biography {
			system.push_str(&format!(
				"\nVoici son CV : {cv}\n\nUtilise en priorité ces informations pour répondre aux questions sur {persona}."
			));
		}
	}

	let mut messages = Vec::with_capacity(history.len() * 2 + 2);

	messages.push(ChatMessage::system(system));

	for turn in history {
		messages.push(ChatMessage::user(turn.question.clone()));
		messages.push(ChatMessage::assistant(turn.response.clone()));
	}

	messages.push(ChatMessage::user(question));

	messages
}
