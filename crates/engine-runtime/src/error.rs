use connectors::error::EngineError;
use engine_processing::error::{RenderError, ReportError};
use std::fmt;
use thiserror::Error;

/// Coarse classification of a pipeline failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DataAccess,
    Aggregation,
    Rendering,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::DataAccess => f.write_str("data access"),
            ErrorKind::Aggregation => f.write_str("aggregation"),
            ErrorKind::Rendering => f.write_str("rendering"),
        }
    }
}

/// First error raised by a pipeline stage, tagged with the stage it aborted.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The source could not be read, or the engine session was unusable.
    #[error("Data access failed in '{stage}': {source}")]
    DataAccess {
        stage: String,
        #[source]
        source: EngineError,
    },

    /// A derivation, grouping or ordering could not be planned or evaluated.
    #[error("Aggregation failed in '{stage}': {source}")]
    Aggregation {
        stage: String,
        #[source]
        source: EngineError,
    },

    #[error("Rendering failed in '{stage}': {source}")]
    Rendering {
        stage: String,
        #[source]
        source: RenderError,
    },
}

impl PipelineError {
    pub fn engine(stage: &str, source: EngineError) -> Self {
        let stage = stage.to_string();
        if source.is_data_access() {
            PipelineError::DataAccess { stage, source }
        } else {
            PipelineError::Aggregation { stage, source }
        }
    }

    pub fn report(stage: &str, source: ReportError) -> Self {
        match source {
            ReportError::Extract(e) => PipelineError::engine(stage, e),
            ReportError::Render(source) => PipelineError::Rendering {
                stage: stage.to_string(),
                source,
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::DataAccess { .. } => ErrorKind::DataAccess,
            PipelineError::Aggregation { .. } => ErrorKind::Aggregation,
            PipelineError::Rendering { .. } => ErrorKind::Rendering,
        }
    }

    pub fn stage(&self) -> &str {
        match self {
            PipelineError::DataAccess { stage, .. }
            | PipelineError::Aggregation { stage, .. }
            | PipelineError::Rendering { stage, .. } => stage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use connectors::file::csv::error::FileError;

    #[test]
    fn test_engine_errors_are_classified() {
        let err = PipelineError::engine(
            "Read Data",
            EngineError::File(FileError::NotFound("data.csv".into())),
        );
        assert_eq!(err.kind(), ErrorKind::DataAccess);
        assert_eq!(err.stage(), "Read Data");

        let err = PipelineError::engine(
            "Data Filtering",
            EngineError::column_not_found("Price", &["Quantity".to_string()]),
        );
        assert_eq!(err.kind(), ErrorKind::Aggregation);
        assert!(err.to_string().contains("Price"));
    }

    #[test]
    fn test_report_errors_are_classified() {
        let err = PipelineError::report(
            "Plot Generation",
            ReportError::Render(RenderError::EmptyExtract("uk_monthly_spending.png".into())),
        );
        assert_eq!(err.kind(), ErrorKind::Rendering);

        let err = PipelineError::report(
            "Plot Generation",
            ReportError::Extract(EngineError::SessionStopped),
        );
        assert_eq!(err.kind(), ErrorKind::DataAccess);
    }
}
