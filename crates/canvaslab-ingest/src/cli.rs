//! Command-line interface

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "canvaslab-ingest",
    version,
    about = "Access-log and telemetry ingestion service"
)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP ingestion service
    Serve(ServeArgs),
    /// Print list lengths and counters from a durable store as JSON
    Stats {
        /// Database file (overrides the config file)
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct ServeArgs {
    /// Address to listen on, e.g. 0.0.0.0:3000
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Keep everything in memory instead of a database file
    #[arg(long, conflicts_with = "db")]
    pub memory: bool,
    /// Database file for the durable store
    #[arg(long)]
    pub db: Option<PathBuf>,
    /// Allow cross-origin requests from any origin
    #[arg(long)]
    pub cors: bool,
    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
    /// Human-readable console logs instead of JSONL
    #[arg(long)]
    pub pretty: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from([
            "canvaslab-ingest",
            "serve",
            "--bind",
            "0.0.0.0:8080",
            "--memory",
            "--cors",
        ])
        .unwrap();

        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.bind.unwrap().port(), 8080);
                assert!(args.memory);
                assert!(args.cors);
                assert!(args.db.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_memory_conflicts_with_db() {
        let result =
            Cli::try_parse_from(["canvaslab-ingest", "serve", "--memory", "--db", "x.redb"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_config_flag() {
        let cli =
            Cli::try_parse_from(["canvaslab-ingest", "stats", "--config", "ingest.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("ingest.toml")));
        assert!(matches!(cli.command, Command::Stats { db: None }));
    }
}
