use super::pipeline::Transform;
use connectors::{engine::table::Table, error::EngineError};
use polars::prelude::Expr;

/// Adds a column computed from `expression`, or replaces the column of the
/// same name.
pub struct ComputedTransform {
    name: String,
    expression: Expr,
}

impl ComputedTransform {
    pub fn new(name: &str, expression: Expr) -> Self {
        Self {
            name: name.to_string(),
            expression,
        }
    }
}

impl Transform for ComputedTransform {
    fn apply(&self, table: &Table) -> Result<Table, EngineError> {
        table.with_column(&self.name, self.expression.clone())
    }
}
