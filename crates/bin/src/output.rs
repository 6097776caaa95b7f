//! Output formatting helpers for human-readable and JSON output.

use clap::ValueEnum;
use electrum_store::Entity;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Display label of a node id; the root has an empty id.
pub fn id_label(id: &str) -> &str {
    if id.is_empty() { "(root)" } else { id }
}

/// One table row per node: id, generation and compact JSON values.
pub fn entity_rows(entities: &[Entity]) -> Vec<Vec<String>> {
    entities
        .iter()
        .map(|entity| {
            vec![
                id_label(entity.id()).to_string(),
                entity.generation().to_string(),
                entity.to_data().to_string(),
            ]
        })
        .collect()
}

/// Nodes as a JSON array of `{id, generation, values}` objects.
pub fn entities_json(entities: &[Entity]) -> serde_json::Value {
    entities
        .iter()
        .map(|entity| {
            serde_json::json!({
                "id": entity.id(),
                "generation": entity.generation(),
                "values": entity.to_data(),
            })
        })
        .collect()
}

/// Print a table with aligned columns in human-readable format.
///
/// `headers` and each row in `rows` must have the same length.
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        return;
    }

    // Calculate column widths (max of header and all row values)
    let col_count = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(col_count) {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let header_line: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:<width$}", h, width = widths[i]))
        .collect();
    println!("{}", header_line.join("  ").trim_end());

    for row in rows {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .take(col_count)
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect();
        println!("{}", line.join("  ").trim_end());
    }
}
