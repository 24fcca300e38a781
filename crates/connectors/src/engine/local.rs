use crate::{
    engine::{
        DatasetEngine, EngineStats, PlanExecutor, StorageLevel,
        plan::{Operator, PlanId, PlanNode},
        table::Table,
    },
    error::EngineError,
    file::csv::{settings::CsvSettings, source::CsvSource},
};
use polars::prelude::{DataFrame, IntoLazy, LazyFrame};
use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};
use tracing::{debug, info};

#[derive(Default)]
struct CacheState {
    markers: HashMap<PlanId, StorageLevel>,
    frames: HashMap<PlanId, DataFrame>,
}

#[derive(Default)]
struct EngineInner {
    cache: Mutex<CacheState>,
    scans: AtomicU64,
    evaluations: AtomicU64,
    cache_hits: AtomicU64,
    stopped: AtomicBool,
}

/// In-process engine collecting polars plans on the calling thread. Marked
/// plan nodes keep their first materialized frame until the engine stops;
/// unmarked nodes are recomputed from the source file every time they are
/// materialized.
#[derive(Clone, Default)]
pub struct LocalEngine {
    inner: Arc<EngineInner>,
}

impl LocalEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DatasetEngine for LocalEngine {
    fn read_csv(&self, path: &str, settings: CsvSettings) -> Result<Table, EngineError> {
        self.inner.ensure_running()?;

        let source = CsvSource::new(path, settings)?;
        let schema = source.infer_schema()?;
        let node = PlanNode::new(
            Operator::Scan {
                path: source.path,
                settings: source.settings,
            },
            schema,
        );

        let executor: Arc<dyn PlanExecutor> = self.inner.clone();
        Ok(Table::new(node, executor))
    }

    fn stats(&self) -> EngineStats {
        let cached_tables = self
            .inner
            .lock_cache()
            .map(|state| state.frames.len())
            .unwrap_or_default();
        EngineStats {
            scans: self.inner.scans.load(Ordering::Relaxed),
            evaluations: self.inner.evaluations.load(Ordering::Relaxed),
            cache_hits: self.inner.cache_hits.load(Ordering::Relaxed),
            cached_tables,
        }
    }

    fn stop(&self) {
        if self.inner.stopped.swap(true, Ordering::SeqCst) {
            return;
        }

        let released = match self.inner.cache.lock() {
            Ok(mut state) => {
                let released = state.frames.len();
                state.frames.clear();
                state.markers.clear();
                released
            }
            Err(poisoned) => {
                let mut state = poisoned.into_inner();
                let released = state.frames.len();
                *state = CacheState::default();
                released
            }
        };
        info!("Engine stopped, released {} cached tables", released);
    }
}

impl EngineInner {
    fn ensure_running(&self) -> Result<(), EngineError> {
        if self.stopped.load(Ordering::SeqCst) {
            return Err(EngineError::SessionStopped);
        }
        Ok(())
    }

    fn lock_cache(&self) -> Result<MutexGuard<'_, CacheState>, EngineError> {
        self.cache
            .lock()
            .map_err(|_| EngineError::Lock("Failed to lock engine cache".into()))
    }

    fn cached(&self, id: PlanId) -> Result<Option<DataFrame>, EngineError> {
        Ok(self.lock_cache()?.frames.get(&id).cloned())
    }

    /// Lazy plan for `node`. Marked inputs are materialized first and enter
    /// the plan as in-memory frames, so nothing below them is rescanned.
    fn plan(&self, node: &Arc<PlanNode>) -> Result<LazyFrame, EngineError> {
        if let Operator::Scan { path, settings } = &node.op {
            self.scans.fetch_add(1, Ordering::Relaxed);
            debug!("Scanning {}", path);
            let source = CsvSource::new(path, settings.clone())?;
            return Ok(source.scan(node.schema.clone())?);
        }

        let input = node
            .input()
            .ok_or_else(|| EngineError::InvalidPlan(format!("node {} has no input", node.id)))?;
        let lf = if self.storage_level(input.id).is_some() {
            self.execute(input)?.lazy()
        } else {
            self.plan(input)?
        };
        Ok(node.op.apply(lf))
    }
}

impl PlanExecutor for EngineInner {
    fn execute(&self, node: &Arc<PlanNode>) -> Result<DataFrame, EngineError> {
        self.ensure_running()?;

        if let Some(frame) = self.cached(node.id)? {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            return Ok(frame);
        }

        self.evaluations.fetch_add(1, Ordering::Relaxed);
        let frame = self.plan(node)?.collect()?;

        let mut state = self.lock_cache()?;
        if state.markers.contains_key(&node.id) {
            debug!("Caching result of plan node {}", node.id);
            state.frames.insert(node.id, frame.clone());
        }
        Ok(frame)
    }

    fn mark(&self, id: PlanId, level: StorageLevel) -> Result<(), EngineError> {
        self.ensure_running()?;
        self.lock_cache()?.markers.insert(id, level);
        Ok(())
    }

    fn storage_level(&self, id: PlanId) -> Option<StorageLevel> {
        self.lock_cache()
            .ok()
            .and_then(|state| state.markers.get(&id).copied())
    }
}
