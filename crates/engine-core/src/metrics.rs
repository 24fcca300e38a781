use model::execution::measurement::StageMeasurement;
use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, RefreshKind, System};
use tracing::{info, warn};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Source of resident memory readings for the running process.
pub trait MemorySampler: Send + Sync {
    /// Resident memory in MB, or `None` when it cannot be read.
    fn sample_mb(&self) -> Option<f64>;
}

/// Reads the resident set size of the current process through `sysinfo`.
pub struct SysinfoSampler {
    pid: Option<Pid>,
    system: Mutex<System>,
}

impl SysinfoSampler {
    pub fn new() -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                warn!("Memory sampling disabled: {}", e);
                None
            }
        };
        let system = System::new_with_specifics(
            RefreshKind::nothing().with_processes(ProcessRefreshKind::nothing().with_memory()),
        );
        Self {
            pid,
            system: Mutex::new(system),
        }
    }
}

impl Default for SysinfoSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySampler for SysinfoSampler {
    fn sample_mb(&self) -> Option<f64> {
        let pid = self.pid?;
        let mut system = self.system.lock().ok()?;
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );
        system
            .process(pid)
            .map(|process| process.memory() as f64 / BYTES_PER_MB)
    }
}

/// Append-only record of stage timings and memory readings.
pub struct MetricsRecorder {
    sampler: Arc<dyn MemorySampler>,
    measurements: Vec<StageMeasurement>,
}

impl MetricsRecorder {
    pub fn new(sampler: Arc<dyn MemorySampler>) -> Self {
        Self {
            sampler,
            measurements: Vec::new(),
        }
    }

    /// Closes a stage that started at `start`, sampling memory now.
    pub fn record(&mut self, stage: &str, start: Instant) -> StageMeasurement {
        let measurement = StageMeasurement::new(stage, start.elapsed(), self.sampler.sample_mb());
        info!(
            "Stage '{}' finished in {:.2} seconds, RAM: {}",
            measurement.stage,
            measurement.duration_secs(),
            format_mb(measurement.memory_mb)
        );
        self.measurements.push(measurement.clone());
        measurement
    }

    pub fn measurements(&self) -> &[StageMeasurement] {
        &self.measurements
    }

    pub fn into_measurements(self) -> Vec<StageMeasurement> {
        self.measurements
    }

    /// Mean of the available memory readings.
    pub fn average_memory_mb(&self) -> Option<f64> {
        let readings: Vec<f64> = self
            .measurements
            .iter()
            .filter_map(|m| m.memory_mb)
            .collect();
        if readings.is_empty() {
            return None;
        }
        Some(readings.iter().sum::<f64>() / readings.len() as f64)
    }

    pub fn summary(&self) {
        info!("--- Performance Measurements ---");
        for m in &self.measurements {
            info!("Time taken for '{}': {:.2} seconds", m.stage, m.duration_secs());
        }

        info!("--- RAM Usage Measurements (at the end of each stage) ---");
        for m in &self.measurements {
            info!("RAM usage after '{}': {}", m.stage, format_mb(m.memory_mb));
        }
        if let Some(avg) = self.average_memory_mb() {
            info!("Average RAM usage across stages: {:.2} MB", avg);
        }
    }
}

fn format_mb(memory_mb: Option<f64>) -> String {
    memory_mb.map_or_else(|| "n/a".to_string(), |mb| format!("{mb:.2} MB"))
}
