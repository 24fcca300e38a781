pub mod local;
pub mod plan;
pub mod table;

use crate::{
    engine::{
        plan::{PlanId, PlanNode},
        table::Table,
    },
    error::EngineError,
    file::csv::settings::CsvSettings,
};
use polars::prelude::DataFrame;
use std::{fmt, sync::Arc};

/// How long a marked table's materialized result is meant to live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageLevel {
    /// Reused by the consumers of the current stage sequence.
    Memory,
    /// Kept until the session stops.
    Persistent,
}

impl fmt::Display for StorageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageLevel::Memory => f.write_str("memory"),
            StorageLevel::Persistent => f.write_str("persistent"),
        }
    }
}

/// Counters describing the work an engine has done so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Full passes over a source file.
    pub scans: u64,
    /// Plans collected into a frame.
    pub evaluations: u64,
    /// Plan nodes served from a cached frame.
    pub cache_hits: u64,
    /// Materialized frames currently held.
    pub cached_tables: usize,
}

/// Executes plan nodes and owns the cache markers placed on them.
pub trait PlanExecutor: Send + Sync {
    fn execute(&self, node: &Arc<PlanNode>) -> Result<DataFrame, EngineError>;
    fn mark(&self, id: PlanId, level: StorageLevel) -> Result<(), EngineError>;
    fn storage_level(&self, id: PlanId) -> Option<StorageLevel>;
}

/// Entry point of a dataset engine session.
pub trait DatasetEngine: Send + Sync {
    /// Creates a lazy table over a delimited file. Column types are inferred
    /// here; rows are only read when the table is materialized.
    fn read_csv(&self, path: &str, settings: CsvSettings) -> Result<Table, EngineError>;

    fn stats(&self) -> EngineStats;

    /// Releases every cached table and rejects further execution.
    fn stop(&self);
}
