use crate::{context::env::EnvContext, error::ConfigError};
use std::path::PathBuf;

pub const ENV_DATA_PATH: &str = "RETAIL_DATA_PATH";
pub const ENV_OUTPUT_DIR: &str = "RETAIL_OUTPUT_DIR";
pub const ENV_APP_NAME: &str = "RETAIL_APP_NAME";
pub const ENV_TOP_N: &str = "RETAIL_TOP_N";

const DEFAULT_DATA_PATH: &str = "data/online_retail_II.csv";
const DEFAULT_OUTPUT_DIR: &str = "plots";
const DEFAULT_APP_NAME: &str = "RetailAnalysis";
const DEFAULT_TOP_N: usize = 20;

/// Everything a pipeline run needs to know up front. `optimized` decides
/// whether intermediate tables are cached for reuse by later stages.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub app_name: String,
    pub data_path: PathBuf,
    pub output_dir: PathBuf,
    pub optimized: bool,
    /// Row limit for the top-N report extracts and the aggregate preview.
    pub top_n: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            app_name: DEFAULT_APP_NAME.to_string(),
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            optimized: false,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl PipelineConfig {
    pub fn from_env(optimized: bool) -> Result<Self, ConfigError> {
        Self::from_context(&EnvContext::new(), optimized)
    }

    pub fn from_context(env: &EnvContext, optimized: bool) -> Result<Self, ConfigError> {
        let defaults = PipelineConfig::default();
        Ok(PipelineConfig {
            app_name: env.get_or(ENV_APP_NAME, DEFAULT_APP_NAME),
            data_path: env
                .get(ENV_DATA_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            output_dir: env
                .get(ENV_OUTPUT_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            optimized,
            top_n: parse_count(env, ENV_TOP_N, defaults.top_n)?,
        })
    }

    pub fn with_optimized(mut self, optimized: bool) -> Self {
        self.optimized = optimized;
        self
    }

    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }
}

fn parse_count(env: &EnvContext, key: &str, default: usize) -> Result<usize, ConfigError> {
    let Some(raw) = env.get(key) else {
        return Ok(default);
    };
    match raw.parse::<usize>() {
        Ok(0) => Err(ConfigError::invalid(key, &raw, "must be at least 1")),
        Ok(n) => Ok(n),
        Err(e) => Err(ConfigError::invalid(key, &raw, e.to_string())),
    }
}
