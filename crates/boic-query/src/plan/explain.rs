//! Indented rendering of a plan, from its root down

use super::{Fetch, Plan, Projection, Step, StepKind};
use std::fmt;

impl Plan {
    /// Render the step tree rooted at the result step
    pub fn explain(&self) -> String {
        self.to_string()
    }

    fn explain_step(&self, out: &mut fmt::Formatter<'_>, step: &Step, indent: usize) -> fmt::Result {
        let space = "  ".repeat(indent);
        let inner = "  ".repeat(indent + 1);

        writeln!(out, "{} #{} (", step.kind.name(), step.id)?;
        match &step.kind {
            StepKind::OpenCorpus { shard_type, alias } => {
                writeln!(out, "{inner}type={}", shard_type.as_deref().unwrap_or("*"))?;
                if let Some(alias) = alias {
                    writeln!(out, "{inner}alias={alias}")?;
                }
            }
            StepKind::Scan {
                source,
                condition,
                projection,
            } => {
                write!(out, "{inner}source=")?;
                match self.step(*source) {
                    Some(source) => self.explain_step(out, source, indent + 1)?,
                    None => write!(out, "#{source}")?,
                }
                writeln!(out, ",")?;
                if let Some(condition) = condition {
                    writeln!(out, "{inner}condition={condition},")?;
                }
                if let Some(projection) = projection {
                    write!(out, "{inner}projection=")?;
                    explain_projection(out, projection, indent + 1)?;
                    writeln!(out, ",")?;
                }
            }
        }

        let deps: Vec<String> = step.dependencies.iter().map(ToString::to_string).collect();
        writeln!(out, "{inner}deps=[{}]", deps.join(", "))?;
        write!(out, "{space})")
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.step(self.root) {
            Some(root) => self.explain_step(f, root, 0),
            None => Ok(()),
        }
    }
}

fn explain_projection(out: &mut fmt::Formatter<'_>, projection: &Projection, indent: usize) -> fmt::Result {
    let space = "  ".repeat(indent);
    writeln!(out, "Project (")?;
    for (rank, column) in projection.columns.iter().enumerate() {
        writeln!(
            out,
            "{space}  {rank} ({}) := {}",
            column.alias,
            explain_fetch(&column.fetch)
        )?;
    }
    write!(out, "{space})")
}

fn explain_fetch(fetch: &Fetch) -> String {
    match &fetch.nested {
        Some(nested) => format!("({}).{}", explain_fetch(nested), fetch.field),
        None => fetch.field.clone(),
    }
}
