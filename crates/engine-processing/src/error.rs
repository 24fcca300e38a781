use connectors::error::EngineError;
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Nothing to plot for '{0}': the extract has no rows")]
    EmptyExtract(String),

    #[error("Column `{column}` required by '{chart}' is missing from the extract")]
    MissingColumn { column: String, chart: String },

    #[error("Column `{column}` in '{chart}' is {dtype}, expected numbers")]
    NonNumeric {
        column: String,
        chart: String,
        dtype: String,
    },

    #[error("Failed to read extract column: {0}")]
    Extract(#[from] PolarsError),

    #[error("Failed to write chart: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to draw chart '{chart}': {message}")]
    Drawing { chart: String, message: String },
}

/// Failure of the reporting stage: either building an extract or drawing it.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to build report extract: {0}")]
    Extract(#[from] EngineError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
