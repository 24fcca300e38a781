use super::pipeline::Transform;
use connectors::{engine::table::Table, error::EngineError};
use polars::prelude::{Expr, col, lit};

/// Keeps the rows where every listed column is strictly positive. Rows with
/// a null in any of them are dropped.
pub struct PositiveValuesFilter {
    columns: Vec<String>,
}

impl PositiveValuesFilter {
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn predicate(&self) -> Option<Expr> {
        self.columns
            .iter()
            .map(|c| col(c.as_str()).gt(lit(0)))
            .reduce(|acc, expr| acc.and(expr))
    }
}

impl Transform for PositiveValuesFilter {
    fn apply(&self, table: &Table) -> Result<Table, EngineError> {
        match self.predicate() {
            Some(predicate) => table.filter(predicate),
            None => Ok(table.clone()),
        }
    }
}
