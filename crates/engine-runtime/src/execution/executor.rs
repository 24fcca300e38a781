use crate::{error::PipelineError, execution::stages};
use connectors::{
    engine::{DatasetEngine, EngineStats, table::Table},
    error::EngineError,
    file::csv::settings::CsvSettings,
};
use engine_core::{
    config::PipelineConfig,
    metrics::{MemorySampler, MetricsRecorder},
};
use engine_processing::{
    aggregate::{country_counts, monthly_average_spending},
    report::{chart::ChartRenderer, generate_reports},
    transform::cleaning_pipeline,
};
use model::execution::measurement::StageMeasurement;
use std::{
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};
use tracing::{debug, error, info};

/// Outcome of one pipeline run. A failed run still carries the measurements
/// and artifacts produced before the failing stage.
#[derive(Debug)]
pub struct RunReport {
    pub measurements: Vec<StageMeasurement>,
    pub artifacts: Vec<PathBuf>,
    pub total_duration: Duration,
    /// Engine counters taken just before the session was stopped.
    pub engine_stats: EngineStats,
    pub error: Option<PipelineError>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Runs the five analysis stages in order. Stage errors do not escape: the
/// first one aborts the remaining stages and is returned inside the report.
pub fn run(
    config: &PipelineConfig,
    engine: &dyn DatasetEngine,
    renderer: &dyn ChartRenderer,
    sampler: Arc<dyn MemorySampler>,
) -> RunReport {
    PipelineExecutor {
        config,
        engine,
        renderer,
        metrics: MetricsRecorder::new(sampler),
        artifacts: Vec::new(),
    }
    .execute()
}

/// Stops the engine session on every exit path, panics included.
struct SessionGuard<'a> {
    engine: &'a dyn DatasetEngine,
    app_name: &'a str,
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        self.engine.stop();
        info!("{} finished.", self.app_name);
    }
}

struct PipelineExecutor<'a> {
    config: &'a PipelineConfig,
    engine: &'a dyn DatasetEngine,
    renderer: &'a dyn ChartRenderer,
    metrics: MetricsRecorder,
    artifacts: Vec<PathBuf>,
}

impl PipelineExecutor<'_> {
    fn execute(mut self) -> RunReport {
        let app_start = Instant::now();
        info!(
            "Starting application: {} (optimized: {})",
            self.config.app_name, self.config.optimized
        );

        let config = self.config;
        let guard = SessionGuard {
            engine: self.engine,
            app_name: &config.app_name,
        };

        let outcome = self.run_stages();
        let total_duration = app_start.elapsed();
        let error = match outcome {
            Ok(()) => {
                info!(
                    "{} total execution time: {:.2} seconds",
                    self.config.app_name,
                    total_duration.as_secs_f64()
                );
                None
            }
            Err(e) => {
                error!("An error occurred: {}", e);
                Some(e)
            }
        };
        self.metrics.summary();

        let engine_stats = self.engine.stats();
        debug!("Engine stats: {:?}", engine_stats);
        drop(guard);

        RunReport {
            measurements: self.metrics.into_measurements(),
            artifacts: self.artifacts,
            total_duration,
            engine_stats,
            error,
        }
    }

    fn run_stages(&mut self) -> Result<(), PipelineError> {
        let raw = self
            .read_data()
            .map_err(|e| PipelineError::engine(stages::READ_DATA, e))?;

        let cleaned = self
            .filter_data(&raw)
            .map_err(|e| PipelineError::engine(stages::DATA_FILTERING, e))?;

        info!("Stage 3: Performing repetitive aggregation of data...");
        for iteration in 1..=stages::COUNTRY_COUNT_REPETITIONS {
            let stage = stages::country_counts_iteration(iteration);
            self.aggregate_country_counts(&cleaned, iteration, &stage)
                .map_err(|e| PipelineError::engine(&stage, e))?;
        }

        let monthly = self
            .calculate_avg_spending(&cleaned)
            .map_err(|e| PipelineError::engine(stages::CALCULATE_AVG_SPENDING, e))?;

        self.generate_plots(&raw, &monthly)
    }

    fn read_data(&mut self) -> Result<Table, EngineError> {
        let start = Instant::now();
        let path = self.config.data_path.to_string_lossy();
        info!("Stage 1: Reading data from {}", path);

        let raw = self.engine.read_csv(&path, CsvSettings::default())?;
        let rows = raw.count()?;
        info!(
            "Stage 1: Read {} rows in {:.2} seconds.",
            rows,
            start.elapsed().as_secs_f64()
        );
        info!("Schema:\n{}", raw.schema_tree());

        if self.config.optimized {
            raw.cache()?;
            info!("Cached the initial table.");
        }

        self.metrics.record(stages::READ_DATA, start);
        Ok(raw)
    }

    fn filter_data(&mut self, raw: &Table) -> Result<Table, EngineError> {
        let start = Instant::now();
        info!("Stage 2: Filtering the data...");

        let cleaned = cleaning_pipeline().apply(raw)?;
        if self.config.optimized {
            cleaned.cache()?;
            info!("Cached the cleaned table.");
        }

        info!(
            "Stage 2: Data Filtering completed in {:.2} seconds.",
            start.elapsed().as_secs_f64()
        );
        self.metrics.record(stages::DATA_FILTERING, start);
        Ok(cleaned)
    }

    fn aggregate_country_counts(
        &mut self,
        cleaned: &Table,
        iteration: usize,
        stage: &str,
    ) -> Result<(), EngineError> {
        let start = Instant::now();

        let counts = country_counts(cleaned)?;
        debug!("{}", counts.explain());
        let frame = counts.collect()?;

        info!(
            "Stage 3 - Iteration {}: Aggregated {} country counts in {:.2} seconds",
            iteration,
            frame.height(),
            start.elapsed().as_secs_f64()
        );
        self.metrics.record(stage, start);
        Ok(())
    }

    fn calculate_avg_spending(&mut self, cleaned: &Table) -> Result<Table, EngineError> {
        let start = Instant::now();
        info!("Stage 4: Calculating monthly average spending per country...");

        let monthly = monthly_average_spending(cleaned)?;
        if self.config.optimized {
            monthly.persist()?;
            info!("Persisted the monthly aggregate.");
        }
        debug!("{}", monthly.explain());

        let frame = monthly.materialize()?;
        info!(
            "Stage 4: Calculated monthly average spending for {} groups in {:.2} seconds.",
            frame.height(),
            start.elapsed().as_secs_f64()
        );
        info!(
            "Monthly average spending:\n{}",
            frame.head(Some(self.config.top_n))
        );

        self.metrics.record(stages::CALCULATE_AVG_SPENDING, start);
        Ok(monthly)
    }

    fn generate_plots(&mut self, raw: &Table, monthly: &Table) -> Result<(), PipelineError> {
        let start = Instant::now();
        info!("Stage 5: Generating plots...");

        generate_reports(
            raw,
            monthly,
            self.renderer,
            self.config.top_n,
            &mut self.artifacts,
        )
        .map_err(|e| PipelineError::report(stages::PLOT_GENERATION, e))?;

        info!(
            "Stage 5: Plot generation completed in {:.2} seconds.",
            start.elapsed().as_secs_f64()
        );
        self.metrics.record(stages::PLOT_GENERATION, start);
        Ok(())
    }
}
