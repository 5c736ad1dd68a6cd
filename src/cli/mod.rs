//! CLI entry point and launcher menu.

pub mod apps;

use clap::{Parser, Subcommand};

/// Rekon assistant suite
#[derive(Parser, Debug)]
#[command(name = "rekon", version, about = "Rekon terminal AI assistant suite")]
pub struct Cli {
    /// With no subcommand, an interactive launcher menu is shown.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// The four applications.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Offline tour of the session primitives and sample database (no API key)
    Tour,
    /// Plain Gemini chat
    Chat(ChatArgs),
    /// ReAct agent with file-analysis tools over a data directory
    Agent(AgentArgs),
    /// SQL assistant over the sample sales database
    Sql(SqlArgs),
}

/// Arguments shared by the chat-backed applications.
#[derive(Parser, Debug, Clone)]
pub struct ChatArgs {
    /// Gemini model to use
    #[arg(short, long, default_value = crate::provider::gemini::DEFAULT_MODEL)]
    pub model: String,

    /// Temperature (0.0 - 2.0)
    #[arg(short, long)]
    pub temperature: Option<f64>,
}

/// Arguments for the file-analysis agent.
#[derive(Parser, Debug)]
pub struct AgentArgs {
    #[command(flatten)]
    pub chat: ChatArgs,

    /// Directory of data files the agent may analyze
    #[arg(long, default_value = "data")]
    pub data_dir: std::path::PathBuf,
}

/// Arguments for the SQL assistant.
#[derive(Parser, Debug)]
pub struct SqlArgs {
    #[command(flatten)]
    pub chat: ChatArgs,

    /// Path of the sample database file (created and seeded if absent)
    #[arg(long, default_value = crate::db::DEFAULT_DB_PATH)]
    pub db_path: std::path::PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_no_subcommand_opens_menu() {
        let cli = Cli::try_parse_from(["rekon"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn parse_sql_with_defaults() {
        let cli = Cli::try_parse_from(["rekon", "sql"]).unwrap();
        match cli.command {
            Some(Commands::Sql(args)) => {
                assert_eq!(args.chat.model, "gemini-2.5-flash");
                assert!(args.chat.temperature.is_none());
                assert_eq!(args.db_path, std::path::PathBuf::from("sales_data.db"));
            }
            other => panic!("expected Sql, got {other:?}"),
        }
    }

    #[test]
    fn parse_agent_with_overrides() {
        let cli = Cli::try_parse_from([
            "rekon",
            "agent",
            "-m",
            "gemini-2.5-pro",
            "-t",
            "0.1",
            "--data-dir",
            "/tmp/uploads",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Agent(args)) => {
                assert_eq!(args.chat.model, "gemini-2.5-pro");
                assert!((args.chat.temperature.unwrap() - 0.1).abs() < f64::EPSILON);
                assert_eq!(args.data_dir, std::path::PathBuf::from("/tmp/uploads"));
            }
            other => panic!("expected Agent, got {other:?}"),
        }
    }

    #[test]
    fn parse_tour_takes_no_args() {
        let cli = Cli::try_parse_from(["rekon", "tour"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Tour)));
    }

    #[test]
    fn parse_unknown_subcommand_is_error() {
        assert!(Cli::try_parse_from(["rekon", "dashboard"]).is_err());
    }
}
