use time::OffsetDateTime;
use tracing::{error, warn};

use ava_domain::history::Turn;

use crate::{AvaService, Error, FALLBACK_ANSWER, Result, SessionContext};

impl AvaService {
	/// Never fails from the caller's perspective: every internal error folds into the
	/// fixed apology string.
	pub async fn answer_question(
		&self,
		ctx: &SessionContext,
		user_token: &str,
		question: &str,
	) -> String {
		match self.try_answer(ctx, user_token, question).await {
			Ok(answer) => answer,
			Err(err) => {
				match &err {
					Error::Identity(_) =>
						warn!(error = %err, "Rejected an unresolvable identity token."),
					Error::CorpusNotFound { collection } =>
						warn!(%collection, "No corpus for this identity."),
					Error::PersonaData { .. } => error!(error = %err, "Persona data missing."),
					Error::Retrieval { .. } => error!(error = %err, "Context retrieval failed."),
					Error::Completion { .. } => error!(error = %err, "Completion call failed."),
					Error::History { .. } => error!(error = %err, "History cache failed."),
				}

				FALLBACK_ANSWER.to_string()
			},
		}
	}

	async fn try_answer(
		&self,
		ctx: &SessionContext,
		user_token: &str,
		question: &str,
	) -> Result<String> {
		let corpus = self.resolve(user_token).await?;
		let history = self.load_history(&ctx.session_id, OffsetDateTime::now_utc()).await?;
		let passages = self.retrieve(&corpus, question, self.cfg.persona.top_k).await?;
		let messages = self.assemble(&corpus.email, &history, question, &passages).await?;
		let answer = self
			.providers
			.completion
			.complete(&self.cfg.providers.completion, &messages)
			.await
			.map_err(|err| Error::Completion { message: err.to_string() })?;

		self.append_history(
			&ctx.session_id,
			Turn { question: question.to_string(), response: answer.clone() },
			OffsetDateTime::now_utc(),
		)
		.await?;

		Ok(answer)
	}
}
