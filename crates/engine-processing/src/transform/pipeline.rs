use connectors::{engine::table::Table, error::EngineError};
use std::sync::Arc;

/// One lazy step over a table. Applying a transform extends the plan; it
/// never reads data.
pub trait Transform: Send + Sync {
    fn apply(&self, table: &Table) -> Result<Table, EngineError>;
}

#[derive(Clone)]
pub struct TransformPipeline {
    transforms: Vec<Arc<dyn Transform>>,
}

impl TransformPipeline {
    pub fn new() -> Self {
        Self {
            transforms: Vec::new(),
        }
    }

    pub fn apply(&self, table: &Table) -> Result<Table, EngineError> {
        self.transforms
            .iter()
            .try_fold(table.clone(), |acc, transform| transform.apply(&acc))
    }

    pub fn add_transform<T: Transform + 'static>(mut self, transform: T) -> Self {
        self.transforms.push(Arc::new(transform));
        self
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl Default for TransformPipeline {
    fn default() -> Self {
        Self::new()
    }
}
