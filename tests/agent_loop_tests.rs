//! Agent loop and session behavior with a scripted provider.

mod common;

use std::sync::Arc;

use common::MockProvider;
use pretty_assertions::assert_eq;
use rekon::db::SalesDb;
use rekon::error::RekonError;
use rekon::session::Session;
use rekon::tools::ToolRegistry;
use rekon::types::Role;

fn sales_session(provider: Arc<MockProvider>) -> Session {
    let db = Arc::new(SalesDb::open_in_memory().unwrap());
    Session::new(Box::new(provider), Arc::new(ToolRegistry::sales(db)))
        .with_system_prompt("You answer questions about sales data.")
}

fn plain_session(provider: Arc<MockProvider>) -> Session {
    Session::new(Box::new(provider), Arc::new(ToolRegistry::empty()))
}

#[tokio::test]
async fn no_tool_turn_makes_exactly_one_call() {
    let provider = Arc::new(MockProvider::new("test-model"));
    provider.queue_response("Hello there!");

    let mut session = plain_session(Arc::clone(&provider));
    let turn = session.send("Hi").await.unwrap();

    assert_eq!(turn.text, "Hello there!");
    assert_eq!(turn.steps.len(), 1);
    assert!(turn.steps[0].tool_calls.is_empty());
    assert_eq!(provider.call_count(), 1);
    // user + assistant
    assert_eq!(session.transcript().len(), 2);
}

#[tokio::test]
async fn transcript_grows_two_per_plain_turn_and_reset_clears() {
    let provider = Arc::new(MockProvider::new("test-model"));
    provider.queue_response("first");
    provider.queue_response("second");

    let mut session = plain_session(Arc::clone(&provider));
    session.send("one").await.unwrap();
    session.send("two").await.unwrap();
    assert_eq!(session.transcript().len(), 4);

    session.reset();
    assert_eq!(session.transcript().len(), 0);
}

#[tokio::test]
async fn list_tables_scenario_invokes_describe_schema() {
    let provider = Arc::new(MockProvider::new("test-model"));
    provider.queue_tool_call("call_1", "describe_schema", serde_json::json!({}));
    provider.queue_response(
        "The database has four tables: customers, products, sales, and sale_items.",
    );

    let mut session = sales_session(Arc::clone(&provider));
    let turn = session.send("list all tables").await.unwrap();

    assert_eq!(turn.steps.len(), 2);
    let result = &turn.steps[0].tool_results[0];
    assert!(!result.is_error);
    assert_eq!(result.tool_name, "describe_schema");
    let schema = &result.result["schema"];
    for table in ["customers", "products", "sales", "sale_items"] {
        assert!(schema.get(table).is_some(), "missing table {table}");
    }
    assert!(turn.text.contains("customers"));

    // user + assistant(tool call) + tool result + final assistant
    assert_eq!(session.transcript().len(), 4);
    let roles: Vec<Role> = session
        .transcript()
        .messages()
        .iter()
        .map(|m| m.role)
        .collect();
    assert_eq!(
        roles,
        vec![Role::User, Role::Assistant, Role::Tool, Role::Assistant]
    );
}

#[tokio::test]
async fn tool_definitions_are_sent_with_requests() {
    let provider = Arc::new(MockProvider::new("test-model"));
    provider.queue_response("ok");

    let mut session = sales_session(Arc::clone(&provider));
    session.send("hello").await.unwrap();

    let request = provider.last_request().unwrap();
    let tools = request.tools.unwrap();
    let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["describe_schema", "run_query"]);
    // System prompt travels as the first message.
    assert_eq!(request.messages[0].role, Role::System);
}

#[tokio::test]
async fn forbidden_write_becomes_error_result_and_loop_continues() {
    let provider = Arc::new(MockProvider::new("test-model"));
    provider.queue_tool_call(
        "call_1",
        "run_query",
        serde_json::json!({"sql_query": "DELETE FROM customers"}),
    );
    provider.queue_response("I can only run read queries.");

    let mut session = sales_session(Arc::clone(&provider));
    let turn = session.send("wipe the customers table").await.unwrap();

    let result = &turn.steps[0].tool_results[0];
    assert!(result.is_error);
    assert!(result.result["error"]
        .as_str()
        .unwrap()
        .contains("Forbidden operation"));
    assert_eq!(turn.text, "I can only run read queries.");
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn unknown_tool_becomes_error_result() {
    let provider = Arc::new(MockProvider::new("test-model"));
    provider.queue_tool_call("call_1", "make_coffee", serde_json::json!({}));
    provider.queue_response("That tool does not exist.");

    let mut session = sales_session(Arc::clone(&provider));
    let turn = session.send("make me a coffee").await.unwrap();

    let result = &turn.steps[0].tool_results[0];
    assert!(result.is_error);
    assert!(result.result["error"]
        .as_str()
        .unwrap()
        .contains("Unknown tool"));
}

#[tokio::test]
async fn loop_stops_at_iteration_bound() {
    let provider = Arc::new(MockProvider::new("test-model"));
    for i in 0..4 {
        provider.queue_tool_call(
            &format!("call_{i}"),
            "describe_schema",
            serde_json::json!({}),
        );
    }

    let mut session = sales_session(Arc::clone(&provider)).with_max_tool_iterations(3);
    let err = session.send("loop forever").await.unwrap_err();

    assert!(matches!(
        err,
        RekonError::MaxIterationsExceeded { limit: 3 }
    ));
    assert_eq!(provider.call_count(), 3);
    // Failed turn leaves the transcript untouched.
    assert_eq!(session.transcript().len(), 0);
}

#[tokio::test]
async fn auth_failure_leaves_transcript_unchanged() {
    let provider = Arc::new(MockProvider::new("test-model"));
    provider.queue_response("fine");
    provider.queue_auth_failure("API key not valid");

    let mut session = plain_session(Arc::clone(&provider));
    session.send("first turn").await.unwrap();
    let before: Vec<_> = session.transcript().messages().to_vec();

    let err = session.send("second turn").await.unwrap_err();
    assert!(matches!(err, RekonError::Authentication(_)));
    assert_eq!(session.transcript().messages(), before.as_slice());
}

#[tokio::test]
async fn tool_turn_transcript_includes_intermediate_messages() {
    let provider = Arc::new(MockProvider::new("test-model"));
    // Two tool rounds, then a final answer: 2N + tool messages.
    provider.queue_tool_call("c1", "describe_schema", serde_json::json!({}));
    provider.queue_tool_call(
        "c2",
        "run_query",
        serde_json::json!({"sql_query": "SELECT COUNT(*) AS n FROM customers"}),
    );
    provider.queue_response("There are 5 customers.");

    let mut session = sales_session(Arc::clone(&provider));
    let turn = session.send("how many customers are there?").await.unwrap();

    assert_eq!(turn.steps.len(), 3);
    assert_eq!(
        turn.steps[1].tool_results[0].result["results"][0]["n"],
        serde_json::json!(5)
    );
    // user + 2 * (assistant tool call + tool result) + final assistant
    assert_eq!(session.transcript().len(), 6);
    assert_eq!(turn.text, "There are 5 customers.");
}
