//! File analysis tools over a local data directory.

use std::collections::BTreeSet;
use std::path::Path;

use crate::error::{RekonError, Result};

const PREVIEW_CHARS: usize = 500;

/// List regular files in the data directory, sorted by name.
pub fn list_files(dir: &Path) -> Result<serde_json::Value> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let meta = entry.metadata()?;
        if !meta.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let kind = Path::new(&name)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_else(|| "unknown".into());
        files.push(serde_json::json!({
            "name": name,
            "size_bytes": meta.len(),
            "kind": kind,
        }));
    }
    files.sort_by(|a, b| a["name"].as_str().cmp(&b["name"].as_str()));

    if files.is_empty() {
        return Ok(serde_json::json!({
            "files": [],
            "count": 0,
            "note": "No data files found. Add CSV or TXT files to the data directory first.",
        }));
    }
    Ok(serde_json::json!({
        "count": files.len(),
        "files": files,
    }))
}

/// Statistics and a content preview for one file in the data directory.
pub fn file_overview(dir: &Path, filename: &str) -> Result<serde_json::Value> {
    let content = read_data_file(dir, filename)?;

    let lines: Vec<&str> = content.lines().collect();
    let words = content.split_whitespace().count();
    let preview: String = content.chars().take(PREVIEW_CHARS).collect();

    let mut overview = serde_json::json!({
        "filename": filename,
        "characters": content.chars().count(),
        "words": words,
        "lines": lines.len(),
        "preview": preview,
    });

    // CSV files also get column names and a data row count.
    if is_csv(filename) {
        if let Some(header) = lines.first() {
            let columns: Vec<&str> = header.split(',').map(str::trim).collect();
            let obj = overview.as_object_mut().unwrap();
            obj.insert("columns".into(), serde_json::json!(columns));
            obj.insert(
                "rows".into(),
                serde_json::json!(lines.len().saturating_sub(1)),
            );
        }
    }

    Ok(overview)
}

/// Per-column analysis of one CSV file in the data directory.
///
/// `analysis` selects the report: `basic` (shape and column types),
/// `statistical` (count/min/max/mean for numeric columns), `missing_data`
/// (empty cells per column), or `data_quality` (unique values per column).
pub fn analyze_file(dir: &Path, filename: &str, analysis: &str) -> Result<serde_json::Value> {
    if !is_csv(filename) {
        return Err(RekonError::InvalidArgument(format!(
            "analysis is only available for CSV files, not '{filename}'; use file_overview instead"
        )));
    }
    let content = read_data_file(dir, filename)?;
    let table = parse_csv(&content)?;

    match analysis {
        "basic" => Ok(basic_report(filename, &table)),
        "statistical" => Ok(statistical_report(filename, &table)),
        "missing_data" => Ok(missing_data_report(filename, &table)),
        "data_quality" => Ok(data_quality_report(filename, &table)),
        other => Err(RekonError::InvalidArgument(format!(
            "unknown analysis type '{other}'; expected basic, statistical, missing_data, or data_quality"
        ))),
    }
}

/// Filename guard plus read. The model supplies the filename, so it must
/// stay inside the data directory.
fn read_data_file(dir: &Path, filename: &str) -> Result<String> {
    if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
        return Err(RekonError::InvalidArgument(format!(
            "invalid filename: {filename}"
        )));
    }

    let path = dir.join(filename);
    if !path.is_file() {
        let available = available_names(dir)?;
        return Err(RekonError::InvalidArgument(format!(
            "file '{filename}' not found; available files: {}",
            if available.is_empty() {
                "(none)".to_string()
            } else {
                available.join(", ")
            }
        )));
    }

    std::fs::read_to_string(&path).map_err(|e| {
        RekonError::InvalidArgument(format!("'{filename}' is not readable as text: {e}"))
    })
}

fn is_csv(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

struct CsvTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Cells of one column, in row order.
    fn column(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows.iter().map(move |row| row[index].as_str())
    }

    /// A column is numeric if every non-empty cell parses as a number and
    /// at least one cell is non-empty.
    fn is_numeric(&self, index: usize) -> bool {
        let mut any = false;
        for cell in self.column(index) {
            if cell.is_empty() {
                continue;
            }
            if cell.parse::<f64>().is_err() {
                return false;
            }
            any = true;
        }
        any
    }
}

fn parse_csv(content: &str) -> Result<CsvTable> {
    let mut lines = content.lines();
    let Some(header) = lines.next() else {
        return Err(RekonError::InvalidArgument("CSV file is empty".into()));
    };
    let columns: Vec<String> = header.split(',').map(|c| c.trim().to_string()).collect();
    let rows: Vec<Vec<String>> = lines
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut cells: Vec<String> = line.split(',').map(|c| c.trim().to_string()).collect();
            cells.resize(columns.len(), String::new());
            cells
        })
        .collect();
    Ok(CsvTable { columns, rows })
}

fn basic_report(filename: &str, table: &CsvTable) -> serde_json::Value {
    let mut column_types = serde_json::Map::new();
    let mut numeric = Vec::new();
    let mut text = Vec::new();
    for (i, name) in table.columns.iter().enumerate() {
        if table.is_numeric(i) {
            column_types.insert(name.clone(), "numeric".into());
            numeric.push(name.clone());
        } else {
            column_types.insert(name.clone(), "text".into());
            text.push(name.clone());
        }
    }
    serde_json::json!({
        "filename": filename,
        "analysis": "basic",
        "rows": table.rows.len(),
        "columns": table.columns.len(),
        "column_types": column_types,
        "numeric_columns": numeric,
        "text_columns": text,
    })
}

fn statistical_report(filename: &str, table: &CsvTable) -> serde_json::Value {
    let mut stats = serde_json::Map::new();
    for (i, name) in table.columns.iter().enumerate() {
        if !table.is_numeric(i) {
            continue;
        }
        let values: Vec<f64> = table
            .column(i)
            .filter_map(|cell| cell.parse::<f64>().ok())
            .collect();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        stats.insert(
            name.clone(),
            serde_json::json!({
                "count": values.len(),
                "min": min,
                "max": max,
                "mean": mean,
            }),
        );
    }

    let mut report = serde_json::json!({
        "filename": filename,
        "analysis": "statistical",
        "columns": stats,
    });
    if report["columns"].as_object().map(|m| m.is_empty()).unwrap_or(true) {
        report.as_object_mut().unwrap().insert(
            "note".into(),
            "No numeric columns to summarize.".into(),
        );
    }
    report
}

fn missing_data_report(filename: &str, table: &CsvTable) -> serde_json::Value {
    let total = table.rows.len();
    let mut missing = serde_json::Map::new();
    for (i, name) in table.columns.iter().enumerate() {
        let count = table.column(i).filter(|cell| cell.is_empty()).count();
        if count > 0 {
            missing.insert(
                name.clone(),
                serde_json::json!({
                    "missing": count,
                    "percent": percent(count, total),
                }),
            );
        }
    }

    let mut report = serde_json::json!({
        "filename": filename,
        "analysis": "missing_data",
        "columns": missing,
    });
    if report["columns"].as_object().map(|m| m.is_empty()).unwrap_or(true) {
        report
            .as_object_mut()
            .unwrap()
            .insert("note".into(), "No missing data found.".into());
    }
    report
}

fn data_quality_report(filename: &str, table: &CsvTable) -> serde_json::Value {
    let total = table.rows.len();
    let mut quality = serde_json::Map::new();
    for (i, name) in table.columns.iter().enumerate() {
        let unique: BTreeSet<&str> = table.column(i).collect();
        quality.insert(
            name.clone(),
            serde_json::json!({
                "unique": unique.len(),
                "percent": percent(unique.len(), total),
            }),
        );
    }
    serde_json::json!({
        "filename": filename,
        "analysis": "data_quality",
        "rows": total,
        "columns": quality,
    })
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 1000.0).round() / 10.0
}

fn available_names(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.metadata()?.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_sales_csv(dir: &Path) {
        std::fs::write(
            dir.join("sales.csv"),
            "region,amount,rep\nnorth,100,ann\nsouth,250,\nnorth,75,bo\n",
        )
        .unwrap();
    }

    #[test]
    fn overview_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let err = file_overview(dir.path(), "../etc/passwd").unwrap_err();
        assert!(matches!(err, RekonError::InvalidArgument(_)));
    }

    #[test]
    fn overview_reports_csv_columns() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("sales.csv"),
            "region,amount\nnorth,100\nsouth,250\n",
        )
        .unwrap();

        let overview = file_overview(dir.path(), "sales.csv").unwrap();
        assert_eq!(overview["columns"], serde_json::json!(["region", "amount"]));
        assert_eq!(overview["rows"], 2);
        assert_eq!(overview["lines"], 3);
    }

    #[test]
    fn missing_file_lists_available() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "hello world\n").unwrap();

        let err = file_overview(dir.path(), "nope.csv").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("notes.txt"), "message was: {msg}");
    }

    #[test]
    fn list_files_empty_dir_has_note() {
        let dir = tempfile::tempdir().unwrap();
        let listing = list_files(dir.path()).unwrap();
        assert_eq!(listing["count"], 0);
        assert!(listing["note"].as_str().unwrap().contains("No data files"));
    }

    #[test]
    fn basic_analysis_infers_column_types() {
        let dir = tempfile::tempdir().unwrap();
        write_sales_csv(dir.path());

        let report = analyze_file(dir.path(), "sales.csv", "basic").unwrap();
        assert_eq!(report["rows"], 3);
        assert_eq!(report["columns"], 3);
        assert_eq!(report["column_types"]["amount"], "numeric");
        assert_eq!(report["column_types"]["region"], "text");
        assert_eq!(report["numeric_columns"], serde_json::json!(["amount"]));
    }

    #[test]
    fn statistical_analysis_summarizes_numeric_columns() {
        let dir = tempfile::tempdir().unwrap();
        write_sales_csv(dir.path());

        let report = analyze_file(dir.path(), "sales.csv", "statistical").unwrap();
        let amount = &report["columns"]["amount"];
        assert_eq!(amount["count"], 3);
        assert_eq!(amount["min"], 75.0);
        assert_eq!(amount["max"], 250.0);
        assert!((amount["mean"].as_f64().unwrap() - 425.0 / 3.0).abs() < 1e-9);
        assert!(report["columns"].get("region").is_none());
    }

    #[test]
    fn missing_data_analysis_counts_empty_cells() {
        let dir = tempfile::tempdir().unwrap();
        write_sales_csv(dir.path());

        let report = analyze_file(dir.path(), "sales.csv", "missing_data").unwrap();
        assert_eq!(report["columns"]["rep"]["missing"], 1);
        assert_eq!(report["columns"]["rep"]["percent"], 33.3);
        assert!(report["columns"].get("amount").is_none());
    }

    #[test]
    fn missing_data_analysis_notes_complete_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("full.csv"), "a,b\n1,2\n3,4\n").unwrap();

        let report = analyze_file(dir.path(), "full.csv", "missing_data").unwrap();
        assert!(report["note"].as_str().unwrap().contains("No missing data"));
    }

    #[test]
    fn data_quality_analysis_counts_unique_values() {
        let dir = tempfile::tempdir().unwrap();
        write_sales_csv(dir.path());

        let report = analyze_file(dir.path(), "sales.csv", "data_quality").unwrap();
        assert_eq!(report["columns"]["region"]["unique"], 2);
        assert_eq!(report["columns"]["amount"]["unique"], 3);
    }

    #[test]
    fn analysis_rejects_unknown_type_and_non_csv() {
        let dir = tempfile::tempdir().unwrap();
        write_sales_csv(dir.path());
        std::fs::write(dir.path().join("notes.txt"), "hello\n").unwrap();

        let err = analyze_file(dir.path(), "sales.csv", "vibes").unwrap_err();
        assert!(matches!(err, RekonError::InvalidArgument(_)));

        let err = analyze_file(dir.path(), "notes.txt", "basic").unwrap_err();
        assert!(err.to_string().contains("only available for CSV"));
    }
}
