//! The four applications and the launcher menu.

use std::io::{BufRead, Write};
use std::sync::Arc;

use tracing::info;

use super::{AgentArgs, ChatArgs, SqlArgs};
use crate::config::RekonConfig;
use crate::db::SalesDb;
use crate::error::{RekonError, Result};
use crate::provider::GeminiProvider;
use crate::session::Session;
use crate::tools::{ToolName, ToolRegistry};
use crate::types::{GenerationSettings, ToolCall};

const SQL_SYSTEM_PROMPT: &str = "\
You are a helpful assistant that can answer questions about sales data using SQL.

When a user asks a question about sales data, follow these steps:
1. FIRST, use the describe_schema tool to understand the database structure and see sample data
2. THEN, write a SQL query based on the user's question and the database schema
3. Execute the SQL query using the run_query tool
4. Explain the results in a clear and concise way

When writing SQL queries:
- Use proper SQL syntax for SQLite
- Use appropriate JOINs when querying across multiple tables
- Use aggregation functions (COUNT, SUM, AVG, etc.) when appropriate

If a query fails, explain what went wrong, fix the query and try again.
You must generate the SQL query yourself; do not ask the user for SQL.";

const AGENT_SYSTEM_PROMPT: &str = "\
You are a helpful data analysis assistant. Always use the available tools to
analyze the files in the data directory and answer based on the actual data.
Start with list_files to see what is available, use file_overview to inspect
a specific file, and use analyze_file for detailed reports on CSV files
(basic, statistical, missing_data, or data_quality).";

/// Show the launcher menu and run the selected application.
///
/// One config outlives all launches, so a key prompted for the first
/// application is reused by the next.
pub async fn run_menu() -> Result<()> {
    let config = RekonConfig::from_env();
    loop {
        println!();
        println!("{}", "=".repeat(60));
        println!("Rekon application launcher");
        println!("{}", "=".repeat(60));
        println!("1. Tour of the session primitives (offline, no API key)");
        println!("2. Gemini chat");
        println!("3. ReAct agent with file-analysis tools");
        println!("4. SQL assistant over the sample sales database");
        println!("5. Exit");
        println!("{}", "=".repeat(60));

        let Some(choice) = read_line("Enter your choice (1-5): ")? else {
            return Ok(());
        };
        match choice.trim() {
            "1" => run_tour()?,
            "2" => run_chat(ChatArgs::default_args(), &config).await?,
            "3" => run_agent(AgentArgs::default_args(), &config).await?,
            "4" => run_sql(SqlArgs::default_args(), &config).await?,
            "5" => return Ok(()),
            other => println!("Invalid choice '{other}'. Please enter 1-5."),
        }
    }
}

impl ChatArgs {
    fn default_args() -> Self {
        Self {
            model: crate::provider::gemini::DEFAULT_MODEL.to_string(),
            temperature: None,
        }
    }
}

impl AgentArgs {
    fn default_args() -> Self {
        Self {
            chat: ChatArgs::default_args(),
            data_dir: "data".into(),
        }
    }
}

impl SqlArgs {
    fn default_args() -> Self {
        Self {
            chat: ChatArgs::default_args(),
            db_path: crate::db::DEFAULT_DB_PATH.into(),
        }
    }
}

/// Offline walkthrough: no API key, no network.
pub fn run_tour() -> Result<()> {
    println!("\n== Rekon tour ==\n");
    println!("A session owns an append-only transcript. Messages are only ever");
    println!("appended; /reset clears the whole conversation.\n");

    let mut transcript = crate::session::Transcript::new();
    transcript.append(crate::types::ModelMessage::user("What tables are there?"));
    transcript.append(crate::types::ModelMessage::assistant(
        "customers, products, sales, sale_items",
    ));
    println!("Transcript after one turn: {} messages", transcript.len());
    transcript.reset();
    println!("Transcript after reset:    {} messages\n", transcript.len());

    println!("The SQL assistant's tools run against a seeded sample database.");
    println!("Here is what describe_schema returns (in-memory copy):\n");

    let db = Arc::new(SalesDb::open_in_memory()?);
    let registry = ToolRegistry::sales(db);
    let schema = registry.dispatch(&ToolCall {
        id: "tour".into(),
        name: ToolName::DescribeSchema.to_string(),
        arguments: serde_json::json!({}),
    })?;
    println!("{}\n", serde_json::to_string_pretty(&schema)?);

    println!("Write statements are always rejected:");
    let err = registry
        .dispatch(&ToolCall {
            id: "tour".into(),
            name: ToolName::RunQuery.to_string(),
            arguments: serde_json::json!({"sql_query": "DELETE FROM customers"}),
        })
        .unwrap_err();
    println!("  {err}\n");

    println!("Run `rekon sql` with an API key to chat with the real assistant.");
    Ok(())
}

/// Plain chat, no tools.
pub async fn run_chat(args: ChatArgs, config: &RekonConfig) -> Result<()> {
    let session = build_session(&args, config, ToolRegistry::empty(), None)?;
    repl(session, "Gemini chat. Type your message").await
}

/// ReAct agent with file-analysis tools.
pub async fn run_agent(args: AgentArgs, config: &RekonConfig) -> Result<()> {
    if !args.data_dir.is_dir() {
        std::fs::create_dir_all(&args.data_dir)?;
        info!(dir = %args.data_dir.display(), "created data directory");
    }
    let registry = ToolRegistry::files(args.data_dir.clone());
    let session = build_session(&args.chat, config, registry, Some(AGENT_SYSTEM_PROMPT))?;
    repl(
        session,
        "File agent. Put CSV/TXT files in the data directory and ask about them",
    )
    .await
}

/// SQL assistant over the sample sales database.
pub async fn run_sql(args: SqlArgs, config: &RekonConfig) -> Result<()> {
    let db = Arc::new(SalesDb::open(&args.db_path)?);
    let registry = ToolRegistry::sales(db);
    let session = build_session(&args.chat, config, registry, Some(SQL_SYSTEM_PROMPT))?;
    repl(session, "SQL assistant. Ask a question about the sales data").await
}

fn build_session(
    args: &ChatArgs,
    config: &RekonConfig,
    registry: ToolRegistry,
    system_prompt: Option<&str>,
) -> Result<Session> {
    let api_key = resolve_api_key(config)?;

    let mut provider = GeminiProvider::new(&args.model, api_key);
    if let Some(base_url) = config.get_base_url("gemini") {
        provider = provider.with_base_url(base_url);
    }

    let settings = GenerationSettings::builder()
        .maybe_temperature(args.temperature)
        .build();

    let mut session =
        Session::new(Box::new(provider), Arc::new(registry)).with_settings(settings);
    if let Some(prompt) = system_prompt {
        session = session.with_system_prompt(prompt);
    }
    Ok(session)
}

/// Key from the config (environment or earlier prompt), otherwise
/// prompted and cached in the config for later launches. Never written
/// to disk.
fn resolve_api_key(config: &RekonConfig) -> Result<String> {
    if let Some(key) = config.get_api_key("gemini") {
        return Ok(key);
    }
    let Some(key) = read_line("Google AI API key: ")? else {
        return Err(RekonError::Configuration("no API key provided".into()));
    };
    let key = key.trim().to_string();
    if key.is_empty() {
        return Err(RekonError::Configuration("no API key provided".into()));
    }
    config.set_api_key("gemini", key.clone());
    Ok(key)
}

/// Read-eval loop shared by the chat-backed applications.
///
/// Each turn runs to completion before the next input is accepted. A
/// failed turn prints the error and leaves the conversation as it was.
async fn repl(mut session: Session, greeting: &str) -> Result<()> {
    println!("\n{greeting}. Commands: /reset, /quit\n");

    loop {
        let Some(line) = read_line("You: ")? else {
            return Ok(());
        };
        let line = line.trim();
        match line {
            "" => continue,
            "/quit" | "/exit" => return Ok(()),
            "/reset" => {
                session.reset();
                println!("Conversation cleared.\n");
                continue;
            }
            _ => {}
        }

        match session.send(line).await {
            Ok(turn) => {
                for step in &turn.steps {
                    for call in &step.tool_calls {
                        println!("  [tool] {} {}", call.name, call.arguments);
                    }
                }
                println!("Assistant: {}\n", turn.text);
            }
            // Turn-level failure: transcript already rolled back, keep going.
            Err(e) => println!("Error: {e}\n"),
        }
    }
}

/// Prompt and read one line from stdin. `None` on EOF.
fn read_line(prompt: &str) -> Result<Option<String>> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    let read = std::io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}
