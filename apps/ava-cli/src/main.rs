use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = ava_cli::Args::parse();

	ava_cli::run(args).await
}
