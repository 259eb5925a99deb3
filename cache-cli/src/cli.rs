use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "cache-cli", about = "Run cache operations against the configured store")]
pub struct Cli {
    /// Treat values (and defaults) as JSON documents instead of plain strings
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read a key, printing the default when it is absent
    Get {
        key: String,
        #[arg(long)]
        default: Option<String>,
    },
    /// Write a key; TTL accepts seconds or 30s/5m/2h/1d
    Set {
        key: String,
        value: String,
        #[arg(long)]
        ttl: Option<String>,
    },
    Delete {
        key: String,
    },
    Has {
        key: String,
    },
    /// Flush the whole logical database
    Clear,
    GetMany {
        #[arg(required = true)]
        keys: Vec<String>,
        #[arg(long)]
        default: Option<String>,
    },
    /// Write KEY=VALUE pairs as one atomic batch
    SetMany {
        #[arg(required = true, value_parser = parse_pair)]
        pairs: Vec<(String, String)>,
        #[arg(long)]
        ttl: Option<String>,
    },
    DeleteMany {
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Read commands from stdin, one per line
    Shell,
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))
}
