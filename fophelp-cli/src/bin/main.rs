use clap::Parser;
use fophelp_cli::{Command, Runner};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// API base URL
    #[arg(short, long, env = "FOPHELP_BASE_URL")]
    base_url: Option<String>,
    /// File holding the session cookies
    #[arg(short, long, global = true, default_value = ".env")]
    env_file: PathBuf,
    /// Debug print
    #[arg(short, long)]
    debug: bool,
    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let default_level = if args.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
    Runner::new(args.base_url, args.env_file, args.debug).await?.run(args.command).await
}
