use super::options;
use crate::cli::OutputFormat;
use crate::output;
use anyhow::{bail, Context, Result};
use boic_core::Jewel;
use std::io::{self, BufRead};
use std::rc::Rc;

pub fn execute(
    jewel: &Rc<Jewel>,
    query: Option<String>,
    depth: Option<usize>,
    explain: bool,
    format: OutputFormat,
) -> Result<()> {
    let query = match query {
        Some(query) => query,
        None => read_statement(io::stdin().lock())?,
    };

    if explain {
        let plan = boic_query::prepare(&query)?;
        println!("{}", plan.explain());
        return Ok(());
    }

    let rows = boic_query::execute(jewel, &query, &options(jewel, depth))?;
    output::print_rows(rows, format)
}

/// Read lines up to the first one ending with `;` (or end of input)
pub fn read_statement(input: impl BufRead) -> Result<String> {
    let mut statement = Vec::new();
    for line in input.lines() {
        let line = line.context("Failed to read query from stdin")?;
        let done = line.trim_end().ends_with(';');
        statement.push(line);
        if done {
            break;
        }
    }

    let statement = statement.join("\n");
    if statement.trim().is_empty() {
        bail!("No query given");
    }
    Ok(statement)
}
