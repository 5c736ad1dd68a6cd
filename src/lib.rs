//! Rekon, a terminal AI assistant suite.
//!
//! Four small demo applications sharing one conversational core: a plain
//! Gemini chat, a ReAct agent with file-analysis tools, a SQL assistant
//! over a seeded sample sales database, and an offline tour of the
//! primitives. The core is a session object binding an append-only
//! transcript, a chat provider, and a closed tool registry, driven by a
//! bounded tool-calling loop.
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use rekon::provider::GeminiProvider;
//! use rekon::session::Session;
//! use rekon::tools::ToolRegistry;
//!
//! # async fn example() -> rekon::error::Result<()> {
//! let provider = GeminiProvider::new("gemini-2.5-flash", "api-key");
//! let mut session = Session::new(Box::new(provider), Arc::new(ToolRegistry::empty()));
//! let turn = session.send("Hello!").await?;
//! println!("{}", turn.text);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod prelude;
pub mod provider;
pub mod session;
pub mod tools;
pub mod types;
