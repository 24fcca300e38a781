#![allow(dead_code)]

use connectors::engine::local::LocalEngine;
use engine_core::{config::PipelineConfig, metrics::MemorySampler};
use engine_processing::{
    error::RenderError,
    report::chart::{AxisLabels, ChartKind, ChartRenderer},
};
use engine_runtime::execution::executor::{RunReport, run};
use polars::prelude::DataFrame;
use std::{
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tempfile::{NamedTempFile, TempDir};

pub mod integration;
pub mod utils;

/// One call received by [`RecordingRenderer`].
#[derive(Debug, Clone)]
pub struct RenderCall {
    pub file_name: String,
    pub extract: DataFrame,
    pub kind: ChartKind,
    pub labels: AxisLabels,
}

/// Renderer double that keeps every extract it is handed and writes nothing.
pub struct RecordingRenderer {
    output_dir: PathBuf,
    calls: Mutex<Vec<RenderCall>>,
}

impl RecordingRenderer {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call(&self, file_name: &str) -> Option<RenderCall> {
        self.calls().into_iter().find(|c| c.file_name == file_name)
    }
}

impl ChartRenderer for RecordingRenderer {
    fn render(
        &self,
        extract: &DataFrame,
        kind: &ChartKind,
        labels: &AxisLabels,
        file_name: &str,
    ) -> Result<PathBuf, RenderError> {
        if extract.height() == 0 {
            return Err(RenderError::EmptyExtract(file_name.to_string()));
        }
        self.calls.lock().unwrap().push(RenderCall {
            file_name: file_name.to_string(),
            extract: extract.clone(),
            kind: kind.clone(),
            labels: labels.clone(),
        });
        Ok(self.output_dir.join(file_name))
    }
}

/// Sampler reporting a constant memory figure, or none at all.
pub struct FixedSampler(pub Option<f64>);

impl MemorySampler for FixedSampler {
    fn sample_mb(&self) -> Option<f64> {
        self.0
    }
}

/// A CSV dataset on disk plus a scratch output directory, both removed on
/// drop.
pub struct Dataset {
    pub file: NamedTempFile,
    pub output: TempDir,
}

impl Dataset {
    pub fn new(csv: &str) -> Self {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(csv.as_bytes()).unwrap();
        Self {
            file,
            output: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &str {
        self.file.path().to_str().unwrap()
    }

    pub fn config(&self, optimized: bool) -> PipelineConfig {
        PipelineConfig::default()
            .with_data_path(self.file.path())
            .with_output_dir(self.output.path().join("plots"))
            .with_optimized(optimized)
    }
}

/// Runs the full pipeline on `config` with a fresh engine and a recording
/// renderer.
pub fn run_pipeline(config: &PipelineConfig) -> (RunReport, RecordingRenderer) {
    let engine = LocalEngine::new();
    let renderer = RecordingRenderer::new(&config.output_dir);
    let report = run(config, &engine, &renderer, Arc::new(FixedSampler(Some(128.0))));
    (report, renderer)
}
