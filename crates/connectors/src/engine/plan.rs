use crate::{engine::table::SortKey, file::csv::settings::CsvSettings};
use polars::prelude::{
    DataFrame, Expr, IdxSize, IntoLazy, LazyFrame, PlSmallStr, PolarsResult, SchemaRef,
    SortMultipleOptions, col,
};
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

pub type PlanId = u64;

static NEXT_PLAN_ID: AtomicU64 = AtomicU64::new(1);

fn next_plan_id() -> PlanId {
    NEXT_PLAN_ID.fetch_add(1, Ordering::Relaxed)
}

/// One node of a logical plan. Nodes are immutable and shared; the id is
/// what cache markers are keyed on, so two tables built from the same node
/// share any cached result.
#[derive(Debug)]
pub struct PlanNode {
    pub id: PlanId,
    pub op: Operator,
    pub schema: SchemaRef,
}

#[derive(Debug)]
pub enum Operator {
    Scan {
        path: String,
        settings: CsvSettings,
    },
    Filter {
        input: Arc<PlanNode>,
        predicate: Expr,
    },
    WithColumn {
        input: Arc<PlanNode>,
        name: String,
        expr: Expr,
    },
    Aggregate {
        input: Arc<PlanNode>,
        keys: Vec<String>,
        aggs: Vec<Expr>,
    },
    Sort {
        input: Arc<PlanNode>,
        keys: Vec<SortKey>,
    },
    Limit {
        input: Arc<PlanNode>,
        n: usize,
    },
}

impl PlanNode {
    pub fn new(op: Operator, schema: SchemaRef) -> Arc<Self> {
        Arc::new(PlanNode {
            id: next_plan_id(),
            op,
            schema,
        })
    }

    /// Builds a node on top of its input, resolving the output schema
    /// against an empty frame so unknown columns fail here rather than at
    /// the first materialization.
    pub fn derive(input: &Arc<PlanNode>, op: Operator) -> PolarsResult<Arc<Self>> {
        let empty = DataFrame::empty_with_schema(&input.schema).lazy();
        let schema = op.apply(empty).collect_schema()?;
        Ok(Self::new(op, schema))
    }

    pub fn input(&self) -> Option<&Arc<PlanNode>> {
        self.op.input()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.schema.iter_names().map(|n| n.to_string()).collect()
    }

    /// One-line description of this node without its inputs.
    pub fn describe(&self) -> String {
        match &self.op {
            Operator::Scan { path, .. } => {
                format!("Scan csv [{}] {}", self.column_names().join(", "), path)
            }
            Operator::Filter { predicate, .. } => format!("Filter {predicate:?}"),
            Operator::WithColumn { name, expr, .. } => format!("Project {expr:?} AS {name}"),
            Operator::Aggregate { keys, aggs, .. } => {
                let aggs: Vec<String> = aggs.iter().map(|a| format!("{a:?}")).collect();
                format!(
                    "HashAggregate keys=[{}] functions=[{}]",
                    keys.join(", "),
                    aggs.join(", ")
                )
            }
            Operator::Sort { keys, .. } => {
                let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
                format!("Sort [{}]", keys.join(", "))
            }
            Operator::Limit { n, .. } => format!("Limit {n}"),
        }
    }
}

impl Operator {
    pub fn input(&self) -> Option<&Arc<PlanNode>> {
        match self {
            Operator::Scan { .. } => None,
            Operator::Filter { input, .. }
            | Operator::WithColumn { input, .. }
            | Operator::Aggregate { input, .. }
            | Operator::Sort { input, .. }
            | Operator::Limit { input, .. } => Some(input),
        }
    }

    /// Appends this operator to `lf`, the plan of its input. A scan has no
    /// input and leaves `lf` untouched.
    pub fn apply(&self, lf: LazyFrame) -> LazyFrame {
        match self {
            Operator::Scan { .. } => lf,
            Operator::Filter { predicate, .. } => lf.filter(predicate.clone()),
            Operator::WithColumn { name, expr, .. } => {
                lf.with_column(expr.clone().alias(name.as_str()))
            }
            // Stable grouping keeps groups in first-seen order
            Operator::Aggregate { keys, aggs, .. } => {
                let keys: Vec<Expr> = keys.iter().map(|k| col(k.as_str())).collect();
                lf.group_by_stable(keys).agg(aggs.clone())
            }
            Operator::Sort { keys, .. } => {
                let by: Vec<PlSmallStr> = keys.iter().map(|k| k.column.as_str().into()).collect();
                let options = SortMultipleOptions::default()
                    .with_order_descending_multi(keys.iter().map(|k| k.descending))
                    .with_maintain_order(true);
                lf.sort(by, options)
            }
            Operator::Limit { n, .. } => lf.limit(*n as IdxSize),
        }
    }
}
