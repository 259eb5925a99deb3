mod cli;
mod run;

use clap::Parser;
use cli::{Cli, Command};
use shared::config::Config;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    // Load environment variables from .env file (if exists)
    match dotenvy::dotenv() {
        Ok(_) => info!("Loaded environment variables from .env file"),
        Err(_) => info!("No .env file found, using system environment variables"),
    }

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let store = run::open_store(&config.backend).await?;
    let cache = run::build_cache(store, config.serializer);

    match cli.command {
        Command::Shell => {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                let words = line.split_whitespace();
                if line.trim().is_empty() {
                    continue;
                }

                let parsed = match Cli::try_parse_from(std::iter::once("cache-cli").chain(words)) {
                    Ok(parsed) => parsed,
                    Err(e) => {
                        eprintln!("{}", e);
                        continue;
                    }
                };

                let json = cli.json || parsed.json;
                match run::execute(&cache, parsed.command, json, config.default_ttl).await {
                    Ok(output) => println!("{}", output),
                    Err(e) => warn!("{}", e),
                }
            }
        }
        command => {
            let output = run::execute(&cache, command, cli.json, config.default_ttl).await?;
            println!("{}", output);
        }
    }

    Ok(())
}
