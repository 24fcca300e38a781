use engine_core::error::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Pipeline task failed to complete: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}
