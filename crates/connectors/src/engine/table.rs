use crate::{
    engine::{
        PlanExecutor, StorageLevel,
        plan::{Operator, PlanNode},
    },
    error::EngineError,
};
use polars::prelude::{DataFrame, Expr, SchemaRef, len};
use std::{
    fmt::{self, Write},
    sync::Arc,
};

/// Name of the column produced by `GroupedTable::count`.
pub const COUNT_COLUMN: &str = "count";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    pub descending: bool,
}

pub fn asc(column: &str) -> SortKey {
    SortKey {
        column: column.to_string(),
        descending: false,
    }
}

pub fn desc(column: &str) -> SortKey {
    SortKey {
        column: column.to_string(),
        descending: true,
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order = if self.descending { "DESC" } else { "ASC" };
        write!(f, "{} {}", self.column, order)
    }
}

/// Lazy handle to a plan. Building a table never reads rows; only
/// `materialize` (and the `count`/`collect` wrappers around it) does.
#[derive(Clone)]
pub struct Table {
    node: Arc<PlanNode>,
    executor: Arc<dyn PlanExecutor>,
}

impl Table {
    pub fn new(node: Arc<PlanNode>, executor: Arc<dyn PlanExecutor>) -> Self {
        Table { node, executor }
    }

    pub fn schema(&self) -> &SchemaRef {
        &self.node.schema
    }

    pub fn columns(&self) -> Vec<String> {
        self.node.column_names()
    }

    /// Exact column name matching `name` after trimming, ignoring case.
    pub fn resolve_column(&self, name: &str) -> Result<String, EngineError> {
        let wanted = name.trim();
        let columns = self.columns();
        columns
            .iter()
            .find(|c| c.as_str() == wanted)
            .or_else(|| columns.iter().find(|c| c.trim().eq_ignore_ascii_case(wanted)))
            .cloned()
            .ok_or_else(|| EngineError::column_not_found(name, &columns))
    }

    /// Schema as an indented tree, one column per line.
    pub fn schema_tree(&self) -> String {
        let mut out = String::from("root\n");
        for (name, dtype) in self.node.schema.iter() {
            let _ = writeln!(out, " |-- {name}: {dtype}");
        }
        out
    }

    fn derive(&self, op: Operator) -> Result<Table, EngineError> {
        Ok(Table {
            node: PlanNode::derive(&self.node, op)?,
            executor: self.executor.clone(),
        })
    }

    pub fn filter(&self, predicate: Expr) -> Result<Table, EngineError> {
        self.derive(Operator::Filter {
            input: self.node.clone(),
            predicate,
        })
    }

    /// Adds `name` computed from `expr`, replacing an existing column with
    /// the same name.
    pub fn with_column(&self, name: &str, expr: Expr) -> Result<Table, EngineError> {
        self.derive(Operator::WithColumn {
            input: self.node.clone(),
            name: name.to_string(),
            expr,
        })
    }

    pub fn group_by(&self, keys: &[&str]) -> Result<GroupedTable, EngineError> {
        let keys = keys
            .iter()
            .map(|k| self.resolve_column(k))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(GroupedTable {
            table: self.clone(),
            keys,
        })
    }

    pub fn order_by(&self, keys: Vec<SortKey>) -> Result<Table, EngineError> {
        let keys = keys
            .into_iter()
            .map(|k| {
                Ok(SortKey {
                    column: self.resolve_column(&k.column)?,
                    descending: k.descending,
                })
            })
            .collect::<Result<Vec<_>, EngineError>>()?;
        self.derive(Operator::Sort {
            input: self.node.clone(),
            keys,
        })
    }

    pub fn limit(&self, n: usize) -> Result<Table, EngineError> {
        self.derive(Operator::Limit {
            input: self.node.clone(),
            n,
        })
    }

    /// Marks this table so its first materialization is kept and reused.
    pub fn cache(&self) -> Result<(), EngineError> {
        self.executor.mark(self.node.id, StorageLevel::Memory)
    }

    /// Like `cache`, for results meant to outlive the current stage.
    pub fn persist(&self) -> Result<(), EngineError> {
        self.executor.mark(self.node.id, StorageLevel::Persistent)
    }

    pub fn storage_level(&self) -> Option<StorageLevel> {
        self.executor.storage_level(self.node.id)
    }

    pub fn is_cached(&self) -> bool {
        self.storage_level().is_some()
    }

    /// Forces evaluation of the plan.
    pub fn materialize(&self) -> Result<DataFrame, EngineError> {
        self.executor.execute(&self.node)
    }

    pub fn count(&self) -> Result<usize, EngineError> {
        Ok(self.materialize()?.height())
    }

    pub fn collect(&self) -> Result<DataFrame, EngineError> {
        self.materialize()
    }

    /// Text rendering of the plan tree, marking nodes that carry a cache
    /// marker.
    pub fn explain(&self) -> String {
        let mut out = String::from("== Physical Plan ==\n");
        let mut node = Some(&self.node);
        let mut depth = 0;
        while let Some(current) = node {
            let prefix = if depth == 0 {
                String::new()
            } else {
                format!("{}+- ", "   ".repeat(depth - 1))
            };
            let marker = self
                .executor
                .storage_level(current.id)
                .map(|level| format!(" [cached: {level}]"))
                .unwrap_or_default();
            let _ = writeln!(out, "{prefix}{}{marker}", current.describe());
            node = current.input();
            depth += 1;
        }
        out
    }
}

/// A table with resolved grouping keys, waiting for its aggregates.
pub struct GroupedTable {
    table: Table,
    keys: Vec<String>,
}

impl GroupedTable {
    pub fn agg(&self, aggs: Vec<Expr>) -> Result<Table, EngineError> {
        if aggs.is_empty() {
            return Err(EngineError::InvalidPlan(
                "aggregation needs at least one function".into(),
            ));
        }

        self.table.derive(Operator::Aggregate {
            input: self.table.node.clone(),
            keys: self.keys.clone(),
            aggs,
        })
    }

    /// Row count per group, in a column named `count`.
    pub fn count(&self) -> Result<Table, EngineError> {
        self.agg(vec![len().alias(COUNT_COLUMN)])
    }
}
