//! Sample sales database.
//!
//! A small SQLite database seeded with demo sales data on first open. The
//! chat tools only ever read from it; write statements are rejected before
//! execution.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use tracing::info;

use crate::error::{RekonError, Result};

/// Default database file, created next to the binary on first run.
pub const DEFAULT_DB_PATH: &str = "sales_data.db";

/// Handle to the seeded sample database.
///
/// The connection is mutex-guarded; each session's turn runs to completion
/// before the next, so there is no contention in practice.
pub struct SalesDb {
    conn: Mutex<Connection>,
}

impl SalesDb {
    /// Open (creating and seeding if needed) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database, seeded. Used by tests and the tour app.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        ensure_seeded(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Execute a read-only query, returning rows as JSON objects keyed by
    /// column name.
    ///
    /// Anything other than a single SELECT (or WITH ... SELECT) statement
    /// is rejected with `ForbiddenOperation`.
    pub fn run_read_query(&self, sql: &str) -> Result<Vec<serde_json::Value>> {
        screen_read_only(sql)?;

        let conn = self.conn.lock().expect("sales db lock poisoned");
        let mut stmt = conn.prepare(sql)?;
        // Keyword screening can be fooled; SQLite itself cannot.
        if !stmt.readonly() {
            return Err(RekonError::ForbiddenOperation(format!(
                "statement is not read-only: {sql}"
            )));
        }

        let column_names: Vec<String> =
            stmt.column_names().iter().map(|c| c.to_string()).collect();

        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut obj = serde_json::Map::new();
            for (i, name) in column_names.iter().enumerate() {
                obj.insert(name.clone(), value_ref_to_json(row.get_ref(i)?));
            }
            out.push(serde_json::Value::Object(obj));
        }
        Ok(out)
    }

    /// Schema of all user tables: column name, type, nullability, primary key.
    pub fn schema(&self) -> Result<serde_json::Value> {
        let conn = self.conn.lock().expect("sales db lock poisoned");
        let tables = table_names(&conn)?;

        let mut schema = serde_json::Map::new();
        for table in &tables {
            let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
            let mut rows = stmt.query([])?;
            let mut columns = Vec::new();
            while let Some(row) = rows.next()? {
                columns.push(serde_json::json!({
                    "name": row.get::<_, String>(1)?,
                    "type": row.get::<_, String>(2)?,
                    "notnull": row.get::<_, i64>(3)? != 0,
                    "pk": row.get::<_, i64>(5)? != 0,
                }));
            }
            schema.insert(table.clone(), serde_json::Value::Array(columns));
        }
        Ok(serde_json::Value::Object(schema))
    }

    /// Schema plus the first three rows of each table, for query construction.
    pub fn database_info(&self) -> Result<serde_json::Value> {
        let schema = self.schema()?;
        let tables: Vec<String> = schema
            .as_object()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default();

        let mut sample_data = serde_json::Map::new();
        for table in tables {
            let rows = self.run_read_query(&format!("SELECT * FROM {table} LIMIT 3"))?;
            sample_data.insert(table, serde_json::Value::Array(rows));
        }

        Ok(serde_json::json!({
            "schema": schema,
            "sample_data": sample_data,
        }))
    }
}

/// Reject statements that are not a single read query.
///
/// First line of defense only; `Statement::readonly` is the authoritative
/// check after prepare.
fn screen_read_only(sql: &str) -> Result<()> {
    let trimmed = sql.trim().trim_end_matches(';').trim();
    if trimmed.is_empty() {
        return Err(RekonError::InvalidArgument("empty SQL query".into()));
    }
    if let Some(tail) = statement_tail(trimmed) {
        if !tail.trim().is_empty() {
            return Err(RekonError::ForbiddenOperation(
                "multiple SQL statements are not allowed".into(),
            ));
        }
    }
    let first_word = trimmed
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_uppercase();
    match first_word.as_str() {
        "SELECT" | "WITH" => Ok(()),
        other => Err(RekonError::ForbiddenOperation(format!(
            "only SELECT queries are allowed, got {other}"
        ))),
    }
}

/// Text after the first statement-separating semicolon, if any.
///
/// Semicolons inside quoted literals and identifiers do not count; a
/// doubled quote inside a quoted region is an escape.
fn statement_tail(sql: &str) -> Option<&str> {
    let bytes = sql.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"') => {
                i += 1;
                while i < bytes.len() {
                    if bytes[i] == quote {
                        if i + 1 < bytes.len() && bytes[i + 1] == quote {
                            i += 2;
                            continue;
                        }
                        break;
                    }
                    i += 1;
                }
            }
            b';' => return Some(&sql[i + 1..]),
            _ => {}
        }
        i += 1;
    }
    None
}

fn table_names(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
         ORDER BY name",
    )?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(names)
}

fn value_ref_to_json(value: rusqlite::types::ValueRef<'_>) -> serde_json::Value {
    use rusqlite::types::ValueRef;
    match value {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Integer(i) => serde_json::Value::from(i),
        ValueRef::Real(f) => serde_json::Value::from(f),
        ValueRef::Text(t) => serde_json::Value::from(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => serde_json::Value::from(format!("<blob {} bytes>", b.len())),
    }
}

/// Create the tables and insert the sample rows if the database is empty.
fn ensure_seeded(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS customers (
            customer_id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT UNIQUE,
            phone TEXT,
            address TEXT
        );
        CREATE TABLE IF NOT EXISTS products (
            product_id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            price REAL NOT NULL,
            stock_quantity INTEGER DEFAULT 0
        );
        CREATE TABLE IF NOT EXISTS sales (
            sale_id INTEGER PRIMARY KEY,
            customer_id INTEGER,
            sale_date TEXT NOT NULL,
            total_amount REAL NOT NULL,
            FOREIGN KEY (customer_id) REFERENCES customers (customer_id)
        );
        CREATE TABLE IF NOT EXISTS sale_items (
            item_id INTEGER PRIMARY KEY,
            sale_id INTEGER,
            product_id INTEGER,
            quantity INTEGER NOT NULL,
            price_per_unit REAL NOT NULL,
            FOREIGN KEY (sale_id) REFERENCES sales (sale_id),
            FOREIGN KEY (product_id) REFERENCES products (product_id)
        );",
    )?;

    let customer_count: i64 =
        conn.query_row("SELECT COUNT(*) FROM customers", [], |row| row.get(0))?;
    if customer_count > 0 {
        return Ok(());
    }

    info!("seeding sample sales database");

    let customers: &[(&str, &str, &str, &str)] = &[
        ("John Doe", "john@example.com", "555-1234", "123 Main St"),
        ("Jane Smith", "jane@example.com", "555-5678", "456 Oak Ave"),
        ("Bob Johnson", "bob@example.com", "555-9012", "789 Pine Rd"),
        ("Alice Brown", "alice@example.com", "555-3456", "321 Elm St"),
        ("Charlie Davis", "charlie@example.com", "555-7890", "654 Maple Dr"),
    ];
    for (name, email, phone, address) in customers {
        conn.execute(
            "INSERT INTO customers (name, email, phone, address) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![name, email, phone, address],
        )?;
    }

    let products: &[(&str, &str, f64, i64)] = &[
        ("Laptop", "High-performance laptop", 1200.00, 10),
        ("Smartphone", "Latest model smartphone", 800.00, 15),
        ("Tablet", "10-inch tablet", 300.00, 20),
        ("Headphones", "Noise-cancelling headphones", 150.00, 30),
        ("Monitor", "27-inch 4K monitor", 350.00, 8),
    ];
    for (name, description, price, stock) in products {
        conn.execute(
            "INSERT INTO products (name, description, price, stock_quantity)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![name, description, price, stock],
        )?;
    }

    let sales: &[(i64, &str, f64)] = &[
        (1, "2023-01-15", 1200.00),
        (2, "2023-01-20", 950.00),
        (3, "2023-02-05", 300.00),
        (4, "2023-02-10", 500.00),
        (5, "2023-03-01", 1550.00),
        (1, "2023-03-15", 150.00),
        (2, "2023-04-02", 350.00),
    ];
    for (customer_id, sale_date, total) in sales {
        conn.execute(
            "INSERT INTO sales (customer_id, sale_date, total_amount) VALUES (?1, ?2, ?3)",
            rusqlite::params![customer_id, sale_date, total],
        )?;
    }

    let sale_items: &[(i64, i64, i64, f64)] = &[
        (1, 1, 1, 1200.00),
        (2, 2, 1, 800.00),
        (2, 4, 1, 150.00),
        (3, 3, 1, 300.00),
        (4, 4, 2, 150.00),
        (4, 3, 1, 200.00),
        (5, 1, 1, 1200.00),
        (5, 4, 1, 150.00),
        (5, 5, 1, 200.00),
        (6, 4, 1, 150.00),
        (7, 5, 1, 350.00),
    ];
    for (sale_id, product_id, quantity, price) in sale_items {
        conn.execute(
            "INSERT INTO sale_items (sale_id, product_id, quantity, price_per_unit)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![sale_id, product_id, quantity, price],
        )?;
    }

    Ok(())
}
