use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ava_domain::identity::{self, Tokenizer};
use ava_service::{AvaService, SessionContext};
use ava_storage::{db::Db, qdrant::QdrantStore};

#[derive(Debug, Parser)]
#[command(version, rename_all = "kebab")]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Ask one question through the full answer pipeline.
	Ask {
		/// Identity token of the persona to question.
		#[arg(long)]
		token: String,
		/// Opaque session id carrying the conversation history.
		#[arg(long)]
		session: String,
		question: String,
	},
	/// Generate fresh base64 key material for the identity tokenizer.
	Keygen,
	/// Obfuscate an email into a URL-safe identity token.
	Tokenize { email: String },
	/// Recover the email behind an identity token.
	Detokenize { token: String },
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	// Key provisioning must work before a valid config exists.
	if let Command::Keygen = args.command {
		let (key, iv) = identity::generate_material();

		println!("key = \"{key}\"");
		println!("iv  = \"{iv}\"");

		return Ok(());
	}

	let config = ava_config::load(&args.config)?;

	init_tracing(&config)?;

	match args.command {
		Command::Ask { token, session, question } => {
			let db = Db::connect(&config.storage.postgres).await?;

			db.ensure_schema().await?;

			let qdrant = QdrantStore::new(&config.storage.qdrant)?;
			let service = AvaService::new(config, db, qdrant)?;
			let ctx = SessionContext { session_id: session };
			let answer = service.answer_question(&ctx, &token, &question).await;

			println!("{answer}");
		},
		Command::Tokenize { email } => {
			let tokenizer = Tokenizer::from_config(&config.identity)?;

			println!("{}", tokenizer.tokenize(&email)?);
		},
		Command::Detokenize { token } => {
			let tokenizer = Tokenizer::from_config(&config.identity)?;

			println!("{}", tokenizer.detokenize(&token)?);
		},
		Command::Keygen => (),
	}

	Ok(())
}

fn init_tracing(config: &ava_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	Ok(())
}
