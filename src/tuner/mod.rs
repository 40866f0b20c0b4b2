// ===== modelforge/src/tuner/mod.rs =====
pub mod factory;
pub mod fingerprint;
pub mod planner;
mod stages;

pub use factory::ParamsMode;
pub use fingerprint::{params_key, Ledger};
pub use planner::{plan, Stage};

use crate::config::TunerConfig;
use crate::error::MfResult;
use crate::model::{Candidate, DatasetInfo, TaskType, ValidationStrategy};
use crate::registry::{
    AlgorithmRegistry, EmptyPlanSynthesizer, NeighborGenerator, NoNeighbors, ParameterSampler,
    PreprocessingSynthesizer,
};
use crate::sampler::SeededSampler;
use std::path::Path;
use tracing::info;

/// The search controller: owns the run-scoped dedup ledger, dispatches a
/// stage to its generator, and is the single entry point the external
/// training loop calls once per stage.
///
/// `generate` distinguishes `Ok(None)` ("stage skipped, preconditions
/// unmet") from `Ok(Some(vec![]))` ("ran, produced nothing").
pub struct Tuner {
    pub(crate) config: TunerConfig,
    pub(crate) ml_task: TaskType,
    pub(crate) registry: AlgorithmRegistry,
    pub(crate) validation_strategy: ValidationStrategy,
    pub(crate) data_info: DatasetInfo,
    pub(crate) sampler: Box<dyn ParameterSampler>,
    pub(crate) synthesizer: Box<dyn PreprocessingSynthesizer>,
    pub(crate) neighbor_generator: Box<dyn NeighborGenerator>,
    pub(crate) ledger: Ledger,
}

impl Tuner {
    pub fn new(
        config: TunerConfig,
        ml_task: TaskType,
        registry: AlgorithmRegistry,
        validation_strategy: ValidationStrategy,
        data_info: DatasetInfo,
    ) -> Self {
        Self {
            config,
            ml_task,
            registry,
            validation_strategy,
            data_info,
            sampler: Box::new(SeededSampler),
            synthesizer: Box::new(EmptyPlanSynthesizer),
            neighbor_generator: Box::new(NoNeighbors),
            ledger: Ledger::new(),
        }
    }

    pub fn with_sampler(mut self, sampler: Box<dyn ParameterSampler>) -> Self {
        self.sampler = sampler;
        self
    }

    pub fn with_synthesizer(mut self, synthesizer: Box<dyn PreprocessingSynthesizer>) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    pub fn with_neighbor_generator(mut self, generator: Box<dyn NeighborGenerator>) -> Self {
        self.neighbor_generator = generator;
        self
    }

    pub fn with_ledger(mut self, ledger: Ledger) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn config(&self) -> &TunerConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Ordered stage list for this run.
    pub fn steps(&self) -> Vec<Stage> {
        planner::plan(&self.config)
    }

    /// Generates the candidate configurations for one stage. The driver
    /// trains whatever is returned, appends the results to
    /// `current_models`, and moves on to the next planned stage.
    pub fn generate(
        &mut self,
        stage: Stage,
        current_models: &[Candidate],
        results_path: &Path,
        stacked_models: &[Candidate],
    ) -> MfResult<Option<Vec<Candidate>>> {
        info!(stage = %stage, models = current_models.len(), "generating candidates");
        let models_cnt = current_models.len();
        match stage {
            Stage::SimpleAlgorithms => Ok(Some(self.simple_algorithms_params())),
            Stage::DefaultAlgorithms => Ok(Some(self.default_params(models_cnt))),
            Stage::NotSoRandom => Ok(Some(self.not_so_random_params(models_cnt))),
            Stage::GoldenFeatures => self
                .golden_features_params(current_models, results_path)
                .map(Some),
            Stage::InsertRandomFeature => self.insert_random_feature_params(current_models),
            Stage::FeaturesSelection => {
                self.features_selection_params(current_models, results_path)
            }
            Stage::HillClimbing(_) => self.hill_climbing_params(current_models).map(Some),
            Stage::Ensemble => Ok(Some(vec![Candidate::ensemble_descriptor(
                self.ml_task,
                false,
            )])),
            Stage::Stack => Ok(Some(self.stack_params(stacked_models))),
            Stage::EnsembleStacked => {
                // Without at least one stacked model there is nothing to
                // ensemble; return empty rather than the descriptor.
                if !current_models.iter().any(|m| m.is_stacked) {
                    return Ok(Some(Vec::new()));
                }
                Ok(Some(vec![Candidate::ensemble_descriptor(
                    self.ml_task,
                    true,
                )]))
            }
        }
    }
}
