use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Wall-clock time and resident memory recorded at the end of one stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StageMeasurement {
    pub stage: String,
    pub duration: Duration,
    /// Resident memory of the orchestrating process in MB, `None` when the
    /// platform could not report it.
    pub memory_mb: Option<f64>,
}

impl StageMeasurement {
    pub fn new(stage: &str, duration: Duration, memory_mb: Option<f64>) -> Self {
        StageMeasurement {
            stage: stage.to_string(),
            duration,
            memory_mb,
        }
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration.as_secs_f64()
    }
}
