use crate::file::csv::error::FileError;
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Opening or decoding the source file failed.
    #[error("File error: {0}")]
    File(#[from] FileError),

    /// A plan referenced a column that its input does not have.
    #[error("Column not found: `{column}` (available: {available})")]
    ColumnNotFound { column: String, available: String },

    /// Planning or collecting a frame failed inside polars.
    #[error("Query error: {0}")]
    Query(#[from] PolarsError),

    /// The plan itself is malformed, e.g. an aggregation without outputs.
    #[error("Invalid plan: {0}")]
    InvalidPlan(String),

    /// The engine's shared state could not be locked.
    #[error("Lock error: {0}")]
    Lock(String),

    /// The session was stopped before the plan was executed.
    #[error("Engine session has been stopped")]
    SessionStopped,
}

impl EngineError {
    pub fn column_not_found(column: &str, available: &[String]) -> Self {
        EngineError::ColumnNotFound {
            column: column.to_string(),
            available: available.join(", "),
        }
    }

    /// True for failures reaching or decoding the underlying data, as opposed
    /// to failures in how the data is grouped, ordered or derived.
    pub fn is_data_access(&self) -> bool {
        match self {
            EngineError::File(_) | EngineError::Lock(_) | EngineError::SessionStopped => true,
            EngineError::Query(err) => reads_data(err),
            EngineError::ColumnNotFound { .. } | EngineError::InvalidPlan(_) => false,
        }
    }
}

fn reads_data(err: &PolarsError) -> bool {
    match err {
        PolarsError::IO { .. } | PolarsError::NoData(_) | PolarsError::ComputeError(_) => true,
        PolarsError::Context { error, .. } => reads_data(error),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_is_not_data_access() {
        let err = EngineError::Query(PolarsError::ColumnNotFound("Price".into()));
        assert!(!err.is_data_access());
        assert!(!EngineError::column_not_found("Price", &["Quantity".into()]).is_data_access());
    }

    #[test]
    fn test_read_failures_are_data_access() {
        let err = EngineError::Query(PolarsError::NoData("empty CSV".into()));
        assert!(err.is_data_access());
        assert!(EngineError::File(FileError::NotFound("x.csv".into())).is_data_access());
    }
}
