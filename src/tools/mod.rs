//! Tool registry for function calling.
//!
//! The set of tools the model may invoke is a closed enum, dispatched with
//! an exhaustive match. A tool name the model invents that is not in the
//! set surfaces `UnknownTool` and goes back to the model as an error
//! result rather than being looked up dynamically.

pub mod files;

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use strum::{Display, EnumString};
use tracing::debug;

use crate::db::SalesDb;
use crate::error::{RekonError, Result};
use crate::provider::ToolDefinition;
use crate::types::ToolCall;

/// The closed set of tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ToolName {
    /// Database schema plus sample rows, for query construction.
    DescribeSchema,
    /// Execute a read-only SQL query against the sample sales database.
    RunQuery,
    /// List the files available in the session data directory.
    ListFiles,
    /// Line/word statistics and a content preview for one data file.
    FileOverview,
    /// Per-column analysis reports for one CSV data file.
    AnalyzeFile,
}

impl ToolName {
    /// Parse a tool name requested by the model.
    pub fn parse(name: &str) -> Result<Self> {
        Self::from_str(name).map_err(|_| RekonError::UnknownTool(name.to_string()))
    }

    /// Definition advertised to the provider.
    pub fn definition(&self) -> ToolDefinition {
        match self {
            Self::DescribeSchema => ToolDefinition {
                name: self.to_string(),
                description: "Get the schema of all tables in the sales database and sample \
                              data (first 3 rows) from each table. Use this before writing \
                              SQL queries to understand the database structure."
                    .into(),
                parameters: empty_object_schema(),
            },
            Self::RunQuery => ToolDefinition {
                name: self.to_string(),
                description: "Execute a read-only SQL query against the sales database. \
                              Must be a single SELECT statement in SQLite syntax, e.g. \
                              \"SELECT p.name, SUM(si.quantity) AS total_sold FROM sale_items si \
                              JOIN products p ON si.product_id = p.product_id GROUP BY \
                              p.product_id ORDER BY total_sold DESC\"."
                    .into(),
                parameters: string_param_schema("sql_query", "The SQL query to execute."),
            },
            Self::ListFiles => ToolDefinition {
                name: self.to_string(),
                description: "List all files in the data directory with size and kind. \
                              Use this first to see what files are available for analysis."
                    .into(),
                parameters: empty_object_schema(),
            },
            Self::FileOverview => ToolDefinition {
                name: self.to_string(),
                description: "Get an overview of a specific data file: line, word, and \
                              character counts, a content preview, and for CSV files the \
                              column names and row count."
                    .into(),
                parameters: string_param_schema("filename", "Exact name of the data file."),
            },
            Self::AnalyzeFile => ToolDefinition {
                name: self.to_string(),
                description: "Perform a detailed per-column analysis of a CSV data file. \
                              Analysis types: \"basic\" (row/column counts and inferred \
                              column types), \"statistical\" (count, min, max, mean for \
                              numeric columns), \"missing_data\" (empty cells per column), \
                              \"data_quality\" (unique values per column)."
                    .into(),
                parameters: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "filename": {
                            "type": "string",
                            "description": "Exact name of the CSV file to analyze.",
                        },
                        "analysis_type": {
                            "type": "string",
                            "description": "One of basic, statistical, missing_data, \
                                            data_quality. Defaults to basic.",
                        },
                    },
                    "required": ["filename"],
                }),
            },
        }
    }
}

fn empty_object_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {},
        "required": [],
    })
}

fn string_param_schema(name: &str, description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            name: {"type": "string", "description": description},
        },
        "required": [name],
    })
}

/// Static tool set for one application, shared read-only across sessions.
pub struct ToolRegistry {
    enabled: Vec<ToolName>,
    db: Option<Arc<SalesDb>>,
    data_dir: Option<PathBuf>,
}

impl ToolRegistry {
    /// A registry with no tools (plain chat).
    pub fn empty() -> Self {
        Self {
            enabled: Vec::new(),
            db: None,
            data_dir: None,
        }
    }

    /// SQL assistant tools over the sample database.
    pub fn sales(db: Arc<SalesDb>) -> Self {
        Self {
            enabled: vec![ToolName::DescribeSchema, ToolName::RunQuery],
            db: Some(db),
            data_dir: None,
        }
    }

    /// File analysis tools over a local data directory.
    pub fn files(data_dir: PathBuf) -> Self {
        Self {
            enabled: vec![
                ToolName::ListFiles,
                ToolName::FileOverview,
                ToolName::AnalyzeFile,
            ],
            db: None,
            data_dir: Some(data_dir),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }

    /// Definitions to send with each provider request.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.enabled.iter().map(ToolName::definition).collect()
    }

    /// Execute one tool call requested by the model.
    ///
    /// Tool-level failures (`ForbiddenOperation`, `UnknownTool`, database
    /// and argument errors) are returned as `Err`; the agent loop converts
    /// them into error tool results and keeps going.
    pub fn dispatch(&self, call: &ToolCall) -> Result<serde_json::Value> {
        let tool = ToolName::parse(&call.name)?;
        if !self.enabled.contains(&tool) {
            return Err(RekonError::UnknownTool(call.name.clone()));
        }

        debug!(tool = %tool, "dispatching tool call");

        match tool {
            ToolName::DescribeSchema => self.db()?.database_info(),
            ToolName::RunQuery => {
                let sql = required_str(&call.arguments, "sql_query")?;
                let results = self.db()?.run_read_query(sql)?;
                Ok(serde_json::json!({
                    "query": sql,
                    "results": results,
                }))
            }
            ToolName::ListFiles => files::list_files(self.data_dir()?),
            ToolName::FileOverview => {
                let filename = required_str(&call.arguments, "filename")?;
                files::file_overview(self.data_dir()?, filename)
            }
            ToolName::AnalyzeFile => {
                let filename = required_str(&call.arguments, "filename")?;
                let analysis = call
                    .arguments
                    .get("analysis_type")
                    .and_then(|v| v.as_str())
                    .unwrap_or("basic");
                files::analyze_file(self.data_dir()?, filename, analysis)
            }
        }
    }

    fn db(&self) -> Result<&SalesDb> {
        self.db
            .as_deref()
            .ok_or_else(|| RekonError::Configuration("no sales database configured".into()))
    }

    fn data_dir(&self) -> Result<&std::path::Path> {
        self.data_dir
            .as_deref()
            .ok_or_else(|| RekonError::Configuration("no data directory configured".into()))
    }
}

fn required_str<'a>(args: &'a serde_json::Value, key: &str) -> Result<&'a str> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| RekonError::InvalidArgument(format!("Missing string argument: {key}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: serde_json::Value) -> ToolCall {
        ToolCall {
            id: "c1".into(),
            name: name.into(),
            arguments: args,
        }
    }

    #[test]
    fn tool_names_round_trip() {
        for tool in [
            ToolName::DescribeSchema,
            ToolName::RunQuery,
            ToolName::ListFiles,
            ToolName::FileOverview,
            ToolName::AnalyzeFile,
        ] {
            assert_eq!(ToolName::parse(&tool.to_string()).unwrap(), tool);
        }
    }

    #[test]
    fn unknown_name_is_explicit_error() {
        let err = ToolName::parse("drop_all_tables").unwrap_err();
        assert!(matches!(err, RekonError::UnknownTool(name) if name == "drop_all_tables"));
    }

    #[test]
    fn dispatch_rejects_tool_outside_registry() {
        let registry = ToolRegistry::sales(Arc::new(SalesDb::open_in_memory().unwrap()));
        let err = registry
            .dispatch(&call("list_files", serde_json::json!({})))
            .unwrap_err();
        assert!(matches!(err, RekonError::UnknownTool(_)));
    }

    #[test]
    fn run_query_requires_sql_argument() {
        let registry = ToolRegistry::sales(Arc::new(SalesDb::open_in_memory().unwrap()));
        let err = registry
            .dispatch(&call("run_query", serde_json::json!({})))
            .unwrap_err();
        assert!(matches!(err, RekonError::InvalidArgument(_)));
    }

    #[test]
    fn sales_registry_advertises_both_tools() {
        let registry = ToolRegistry::sales(Arc::new(SalesDb::open_in_memory().unwrap()));
        let names: Vec<String> = registry
            .definitions()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["describe_schema", "run_query"]);
    }

    #[test]
    fn files_registry_advertises_analysis_tools() {
        let registry = ToolRegistry::files(std::env::temp_dir());
        let names: Vec<String> = registry
            .definitions()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["list_files", "file_overview", "analyze_file"]);
    }

    #[test]
    fn analyze_file_defaults_to_basic_analysis() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sales.csv"), "region,amount\nnorth,100\n").unwrap();

        let registry = ToolRegistry::files(dir.path().to_path_buf());
        let report = registry
            .dispatch(&call("analyze_file", serde_json::json!({"filename": "sales.csv"})))
            .unwrap();
        assert_eq!(report["analysis"], "basic");
        assert_eq!(report["rows"], 1);
    }
}
