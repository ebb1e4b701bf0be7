//! Rendering of query rows on stdout

use crate::cli::OutputFormat;
use anyhow::Result;
use boic_query::exec::render;
use boic_query::{Row, Rows};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use serde_json::Value as Json;

/// Drain `rows` and print them in `format`
pub fn print_rows(rows: Rows, format: OutputFormat) -> Result<()> {
    let rows = rows.collect::<Result<Vec<_>, _>>()?;
    tracing::info!(count = rows.len(), "Query returned rows");

    match format {
        OutputFormat::Table => println!("{}", table(&rows)),
        OutputFormat::Json => {
            let rows: Vec<Json> = rows.iter().map(Row::to_json).collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }
    Ok(())
}

/// Columns of all rows in order of first appearance
pub fn header(rows: &[Row]) -> Vec<&str> {
    let mut columns: Vec<&str> = Vec::new();
    for column in rows.iter().flat_map(Row::columns) {
        if !columns.contains(&column) {
            columns.push(column);
        }
    }
    columns
}

/// Rows as a table; a column a row lacks is shown as absent
pub fn table(rows: &[Row]) -> Table {
    let header = header(rows);
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.clone());

    for row in rows {
        table.add_row(
            header
                .iter()
                .map(|column| render(row.get(column)))
                .collect::<Vec<_>>(),
        );
    }
    table
}
