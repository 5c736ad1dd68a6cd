//! Rekon CLI binary entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rekon::cli::{apps, Cli, Commands};
use rekon::config::RekonConfig;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        None => apps::run_menu().await,
        Some(Commands::Tour) => apps::run_tour(),
        Some(Commands::Chat(args)) => apps::run_chat(args, &RekonConfig::from_env()).await,
        Some(Commands::Agent(args)) => apps::run_agent(args, &RekonConfig::from_env()).await,
        Some(Commands::Sql(args)) => apps::run_sql(args, &RekonConfig::from_env()).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
