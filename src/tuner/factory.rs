// ===== modelforge/src/tuner/factory.rs =====
use crate::model::{Candidate, LearnerParams, ModelStatus, ModelType};
use crate::tuner::Tuner;
use tracing::warn;

/// Where a fresh candidate's hyperparameters come from: the family's fixed
/// defaults, or a seeded draw from its declared space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamsMode {
    Default,
    Sampled,
}

impl Tuner {
    /// Builds one unnamed candidate for a family, seed and parameter mode.
    /// The only place hyperparameters and preprocessing are paired for a
    /// freshly generated candidate. `None` when the family is not in the
    /// registry or the sampler reports no feasible parameterization.
    pub fn build_model_params(
        &self,
        model_type: ModelType,
        seed: u64,
        mode: ParamsMode,
    ) -> Option<Candidate> {
        let Some(info) = self.registry.lookup(self.ml_task, model_type) else {
            warn!(%model_type, task = %self.ml_task, "family missing from registry");
            return None;
        };

        let params = match mode {
            ParamsMode::Default => info.default_params.clone(),
            ParamsMode::Sampled => self
                .sampler
                .sample(&info.param_space, seed + self.config.seed)?,
        };

        let preprocessing =
            self.synthesizer
                .synthesize(&info.required_preprocessing, &self.data_info, self.ml_task);

        Some(Candidate {
            name: String::new(),
            status: ModelStatus::Initialized,
            final_loss: None,
            train_time: None,
            ml_task: self.ml_task,
            explain_level: self.config.explain_level,
            is_stacked: false,
            learner: LearnerParams {
                model_type,
                ml_task: self.ml_task,
                seed,
                num_class: self.data_info.num_class,
                params,
            },
            preprocessing,
            validation_strategy: self.validation_strategy.clone(),
            additional: info.additional.clone(),
        })
    }
}
