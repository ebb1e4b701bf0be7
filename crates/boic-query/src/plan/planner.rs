//! Expression tree to plan

use super::{ColumnProjection, Fetch, Plan, Projection, StepId, StepKind};
use crate::error::{PlanError, PlanResult};
use crate::syntax::{Column, Expr, Select, Table};

/// Build the plan of a parsed statement
pub fn plan(expr: &Expr) -> PlanResult<Plan> {
    let mut plan = Plan::new();
    plan.root = generate_step(&mut plan, expr)?;
    Ok(plan)
}

fn generate_step(plan: &mut Plan, expr: &Expr) -> PlanResult<StepId> {
    match expr {
        Expr::Select(select) => plan_select(plan, select),
        // Shard creation goes through templates, not the query engine
        other => Err(unimplemented(other)),
    }
}

fn unimplemented(expr: &Expr) -> PlanError {
    PlanError::Unimplemented { kind: expr.kind() }
}

fn plan_select(plan: &mut Plan, select: &Select) -> PlanResult<StepId> {
    let alias = select.from.as_ref().and_then(|table| table.alias.clone());
    let source = open_corpus(plan, select.from.as_ref());

    let projection = if select.columns.iter().any(|c| *c == Expr::Star) {
        None
    } else {
        Some(project(&select.columns, alias.as_deref())?)
    };

    let condition = select
        .selection
        .as_deref()
        .cloned()
        .map(|condition| strip_qualifier(condition, alias.as_deref()));

    Ok(plan.push(
        StepKind::Scan {
            source,
            condition,
            projection,
        },
        vec![source],
    ))
}

fn open_corpus(plan: &mut Plan, table: Option<&Table>) -> StepId {
    let (shard_type, alias) = match table {
        Some(table) => (Some(table.name.clone()), table.alias.clone()),
        None => (None, None),
    };
    plan.push(StepKind::OpenCorpus { shard_type, alias }, Vec::new())
}

fn project(columns: &[Expr], alias: Option<&str>) -> PlanResult<Projection> {
    let columns = columns
        .iter()
        .map(|expr| project_column(expr, alias))
        .collect::<PlanResult<Vec<_>>>()?;
    Ok(Projection { columns })
}

fn project_column(expr: &Expr, table_alias: Option<&str>) -> PlanResult<ColumnProjection> {
    let (expr, alias) = match expr {
        Expr::Alias { expr, alias } => (expr.as_ref(), Some(alias.clone())),
        expr => (expr, None),
    };

    let Expr::Column(column) = expr else {
        return Err(unimplemented(expr));
    };
    let column = qualifier_stripped(column.clone(), table_alias);
    let fetch = Fetch::from_path(&column.path).ok_or(PlanError::Unimplemented {
        kind: expr.kind(),
    })?;

    Ok(ColumnProjection {
        alias: alias.unwrap_or_else(|| column.name().to_string()),
        fetch,
    })
}

/// `i.nom` is `nom` when `i` is the FROM alias
fn qualifier_stripped(mut column: Column, table_alias: Option<&str>) -> Column {
    if column.path.len() > 1 && table_alias.is_some_and(|alias| column.path[0] == alias) {
        column.path.remove(0);
    }
    column
}

fn strip_qualifier(condition: Expr, table_alias: Option<&str>) -> Expr {
    match table_alias {
        Some(_) => condition.map_columns(&|column| qualifier_stripped(column, table_alias)),
        None => condition,
    }
}
