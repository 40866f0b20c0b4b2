// ===== modelforge/src/registry.rs =====
use crate::model::{DatasetInfo, LearnerParams, ModelType, PreprocessingPlan, TaskType};
use crate::sampler::ParamSpace;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Per-family metadata the registry serves: fixed defaults, the sampling
/// space, declared preprocessing requirements, pass-through metadata and
/// optional dataset-size limits.
#[derive(Debug, Clone, Default)]
pub struct AlgorithmInfo {
    pub default_params: Map<String, Value>,
    pub param_space: ParamSpace,
    pub required_preprocessing: Vec<String>,
    pub additional: Map<String, Value>,
    pub max_rows_limit: Option<usize>,
    pub max_cols_limit: Option<usize>,
}

/// Catalog of algorithm families, keyed by task and family. Populated by
/// the driver before tuning starts.
#[derive(Debug, Clone, Default)]
pub struct AlgorithmRegistry {
    entries: HashMap<(TaskType, ModelType), AlgorithmInfo>,
}

impl AlgorithmRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, task: TaskType, model_type: ModelType, info: AlgorithmInfo) {
        self.entries.insert((task, model_type), info);
    }

    pub fn lookup(&self, task: TaskType, model_type: ModelType) -> Option<&AlgorithmInfo> {
        self.entries.get(&(task, model_type))
    }

    pub fn max_rows_limit(&self, task: TaskType, model_type: ModelType) -> Option<usize> {
        self.lookup(task, model_type).and_then(|i| i.max_rows_limit)
    }

    pub fn max_cols_limit(&self, task: TaskType, model_type: ModelType) -> Option<usize> {
        self.lookup(task, model_type).and_then(|i| i.max_cols_limit)
    }
}

/// Randomized hyperparameter source. `None` means no feasible
/// parameterization exists for that space/seed.
pub trait ParameterSampler {
    fn sample(&self, space: &ParamSpace, seed: u64) -> Option<Map<String, Value>>;
}

/// Synthesizes the preprocessing plan for a fresh candidate from the
/// family's declared requirements and the dataset descriptor.
pub trait PreprocessingSynthesizer {
    fn synthesize(
        &self,
        required: &[String],
        data_info: &DatasetInfo,
        task: TaskType,
    ) -> PreprocessingPlan;
}

/// Local-search step: proposes neighbor learner configurations around a
/// trained parent. The sequence is finite and not restartable; `None`
/// entries are infeasible neighbors and are skipped by the caller.
pub trait NeighborGenerator {
    fn neighbors(
        &self,
        learner: &LearnerParams,
        task: TaskType,
        seed: u64,
    ) -> Vec<Option<LearnerParams>>;
}

/// Fallback synthesizer emitting an empty plan. Keeps the crate usable
/// stand-alone; real drivers install their own implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyPlanSynthesizer;

impl PreprocessingSynthesizer for EmptyPlanSynthesizer {
    fn synthesize(
        &self,
        _required: &[String],
        _data_info: &DatasetInfo,
        _task: TaskType,
    ) -> PreprocessingPlan {
        PreprocessingPlan::default()
    }
}

/// Fallback neighbor generator proposing nothing. Hill-climbing stages
/// become no-ops until the driver installs a real implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNeighbors;

impl NeighborGenerator for NoNeighbors {
    fn neighbors(
        &self,
        _learner: &LearnerParams,
        _task: TaskType,
        _seed: u64,
    ) -> Vec<Option<LearnerParams>> {
        Vec::new()
    }
}
