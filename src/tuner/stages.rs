// ===== modelforge/src/tuner/stages.rs =====
use crate::error::{MfResult, ModelForgeError};
use crate::model::{Candidate, GoldenFeaturesRequest, ModelType, TaskType};
use crate::tuner::factory::ParamsMode;
use crate::tuner::Tuner;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Families visited by `default_algorithms`, in generation order.
const DEFAULT_ALGORITHMS_ORDER: [ModelType; 8] = [
    ModelType::RandomForest,
    ModelType::ExtraTrees,
    ModelType::Xgboost,
    ModelType::LightGbm,
    ModelType::CatBoost,
    ModelType::NeuralNetwork,
    ModelType::NearestNeighbors,
    ModelType::Mlp,
];

/// Same families, but boosted trees first for the randomized sweep.
const NOT_SO_RANDOM_ORDER: [ModelType; 8] = [
    ModelType::Xgboost,
    ModelType::LightGbm,
    ModelType::CatBoost,
    ModelType::RandomForest,
    ModelType::ExtraTrees,
    ModelType::NeuralNetwork,
    ModelType::NearestNeighbors,
    ModelType::Mlp,
];

const DROP_FEATURES_FILE: &str = "drop_features.json";

/// `{ordinal}_{special}{CompactFamilyName}`.
pub(crate) fn model_name(model_type: ModelType, models_cnt: usize, special: &str) -> String {
    format!("{}_{}{}", models_cnt, special, model_type.compact_name())
}

/// Highest ordinal prefix among existing candidate names. Names without a
/// leading ordinal (e.g. `Ensemble`) are ignored.
fn max_ordinal(models: &[Candidate]) -> usize {
    models
        .iter()
        .filter_map(|m| m.name.split('_').next()?.parse::<usize>().ok())
        .max()
        .unwrap_or(0)
}

fn loss_or_inf(m: &Candidate) -> f64 {
    m.final_loss.unwrap_or(f64::INFINITY)
}

/// Groups by family and stable-sorts each group ascending by loss, so ties
/// keep their original relative order. Group iteration order follows the
/// `ModelType` declaration order.
fn group_by_loss<'a>(models: &'a [Candidate]) -> BTreeMap<ModelType, Vec<&'a Candidate>> {
    let mut groups: BTreeMap<ModelType, Vec<&Candidate>> = BTreeMap::new();
    for m in models {
        groups.entry(m.model_type()).or_default().push(m);
    }
    for group in groups.values_mut() {
        group.sort_by(|a, b| f64::total_cmp(&loss_or_inf(a), &loss_or_inf(b)));
    }
    groups
}

/// Stages that rank by loss require at least one trained model; calling
/// them earlier is a driver ordering bug, not a skippable condition.
fn require_measured_losses(models: &[Candidate], stage: &str) -> MfResult<()> {
    if models.iter().any(|m| m.final_loss.is_some()) {
        return Ok(());
    }
    Err(ModelForgeError::Validation(format!(
        "stage '{}' requires current models with measured losses",
        stage
    )))
}

impl Tuner {
    fn skip_if_rows_cols_limit(&self, model_type: ModelType) -> bool {
        if let Some(max_rows) = self.registry.max_rows_limit(self.ml_task, model_type) {
            if self.data_info.rows > max_rows {
                debug!(%model_type, rows = self.data_info.rows, max_rows, "skipped on row limit");
                return true;
            }
        }
        if let Some(max_cols) = self.registry.max_cols_limit(self.ml_task, model_type) {
            if self.data_info.cols > max_cols {
                debug!(%model_type, cols = self.data_info.cols, max_cols, "skipped on column limit");
                return true;
            }
        }
        false
    }

    /// One candidate per enabled family in {Baseline, Decision Tree,
    /// Linear}; the decision tree gets up to `min(3, budget)` seeded
    /// variants.
    pub(crate) fn simple_algorithms_params(&mut self) -> Vec<Candidate> {
        let mut models_cnt = 0usize;
        let mut generated = Vec::new();
        for model_type in [ModelType::Baseline, ModelType::DecisionTree, ModelType::Linear] {
            if !self.config.is_enabled(model_type) {
                continue;
            }
            let models_to_check = if model_type == ModelType::DecisionTree {
                self.config.start_random_models.min(3)
            } else {
                1
            };
            for i in 0..models_to_check {
                info!(%model_type, ordinal = models_cnt + 1, "generating simple candidate");
                let Some(mut params) =
                    self.build_model_params(model_type, i as u64 + 1, ParamsMode::Sampled)
                else {
                    continue;
                };
                params.name = model_name(model_type, models_cnt + 1, "");
                if self.ledger.insert_if_new(&params) {
                    generated.push(params);
                    models_cnt += 1;
                }
            }
        }
        generated
    }

    /// One default-parameter candidate per enabled family, skipping
    /// families whose declared row/column limits the dataset exceeds.
    /// Numbering continues from the run-wide model count.
    pub(crate) fn default_params(&mut self, mut models_cnt: usize) -> Vec<Candidate> {
        let mut generated = Vec::new();
        for model_type in DEFAULT_ALGORITHMS_ORDER {
            if !self.config.is_enabled(model_type) {
                continue;
            }
            if self.skip_if_rows_cols_limit(model_type) {
                continue;
            }
            info!(%model_type, ordinal = models_cnt + 1, "generating default candidate");
            let Some(mut params) =
                self.build_model_params(model_type, models_cnt as u64 + 1, ParamsMode::Default)
            else {
                continue;
            };
            params.name = model_name(model_type, models_cnt + 1, "Default_");
            if self.ledger.insert_if_new(&params) {
                generated.push(params);
                models_cnt += 1;
            }
        }
        generated
    }

    /// `budget - 1` sampled candidates per enabled family (one default
    /// variant already exists from the previous stage).
    pub(crate) fn not_so_random_params(&mut self, mut models_cnt: usize) -> Vec<Candidate> {
        let mut generated = Vec::new();
        for model_type in NOT_SO_RANDOM_ORDER {
            if !self.config.is_enabled(model_type) {
                continue;
            }
            if self.skip_if_rows_cols_limit(model_type) {
                continue;
            }
            for i in 0..self.config.start_random_models.saturating_sub(1) {
                info!(%model_type, ordinal = models_cnt + 1, "generating sampled candidate");
                let Some(mut params) =
                    self.build_model_params(model_type, i as u64 + 1, ParamsMode::Sampled)
                else {
                    continue;
                };
                params.name = model_name(model_type, models_cnt + 1, "");
                if self.ledger.insert_if_new(&params) {
                    generated.push(params);
                    models_cnt += 1;
                }
            }
        }
        generated
    }

    /// Local-search refinement: per family (except the simple ones and
    /// nearest neighbors) the best `top_models_to_improve` models seed the
    /// external neighbor generator; each feasible neighbor becomes a clone
    /// of its parent with only the learner replaced. Lineage suffixes stay
    /// visible in the name.
    pub(crate) fn hill_climbing_params(&mut self, current_models: &[Candidate]) -> MfResult<Vec<Candidate>> {
        require_measured_losses(current_models, "hill_climbing")?;

        let groups = group_by_loss(current_models);
        let model_max_index = max_ordinal(current_models);
        let neighbor_seed = current_models.len() as u64 + self.config.seed;

        let mut generated: Vec<Candidate> = Vec::new();
        for (m_type, group) in groups {
            if m_type.skips_hill_climbing() {
                continue;
            }
            for m in group.iter().take(self.config.top_models_to_improve) {
                let proposals =
                    self.neighbor_generator
                        .neighbors(&m.learner, self.ml_task, neighbor_seed);
                for p in proposals.into_iter().flatten() {
                    let ordinal = model_max_index + 1 + generated.len();
                    info!(ordinal, parent = %m.name, "hill climbing step");
                    let mut all_params = m.derive_variant();
                    all_params.learner = p;
                    all_params.name = model_name(all_params.learner.model_type, ordinal, "");
                    if all_params.preprocessing.golden_features.is_some() {
                        all_params.name.push_str("_GoldenFeatures");
                    }
                    if !all_params.preprocessing.drop_features.is_empty() {
                        all_params.name.push_str("_SelectedFeatures");
                    }
                    if self.ledger.insert_if_new(&all_params) {
                        generated.push(all_params);
                    }
                }
            }
        }
        Ok(generated)
    }

    /// Clones the single best model of each boosted-tree family with a
    /// golden-feature request attached to its preprocessing plan.
    pub(crate) fn golden_features_params(
        &mut self,
        current_models: &[Candidate],
        results_path: &Path,
    ) -> MfResult<Vec<Candidate>> {
        require_measured_losses(current_models, "golden_features")?;

        let mut generated = Vec::new();
        for (m_type, group) in group_by_loss(current_models) {
            if !m_type.is_boosted() {
                continue;
            }
            for m in group.iter().take(1) {
                let mut params = m.derive_variant();
                params.preprocessing.golden_features = Some(GoldenFeaturesRequest {
                    results_path: results_path.display().to_string(),
                    ml_task: self.ml_task,
                });
                params.name = format!("{}_GoldenFeatures", m.name);
                // Rebuild from scratch: the augmented input has a new width.
                params.learner.strip_architecture();
                if self.ledger.insert_if_new(&params) {
                    generated.push(params);
                }
            }
        }
        Ok(generated)
    }

    /// Probe for the feature-selection stage: clones the single best model
    /// overall with one synthetic uncorrelated feature injected and
    /// explanations reduced to the importance report.
    pub(crate) fn insert_random_feature_params(
        &mut self,
        current_models: &[Candidate],
    ) -> MfResult<Option<Vec<Candidate>>> {
        require_measured_losses(current_models, "insert_random_feature")?;

        let best = current_models
            .iter()
            .min_by(|a, b| f64::total_cmp(&loss_or_inf(a), &loss_or_inf(b)))
            .expect("non-empty by the losses check");

        let mut params = best.derive_variant();
        params.preprocessing.add_random_feature = true;
        params.name = format!("{}_RandomFeature", best.name);
        params.explain_level = 1;
        params.learner.strip_architecture();

        if self.ledger.insert_if_new(&params) {
            Ok(Some(vec![params]))
        } else {
            Ok(None)
        }
    }

    /// Feature-pruning variants driven by the drop-feature manifest written
    /// by the external explainer after the random-feature probe trains.
    /// `Ok(None)` when the manifest is absent or lists at most one feature
    /// (the lone entry is assumed to be the synthetic feature itself).
    pub(crate) fn features_selection_params(
        &mut self,
        current_models: &[Candidate],
        results_path: &Path,
    ) -> MfResult<Option<Vec<Candidate>>> {
        let fname = results_path.join(DROP_FEATURES_FILE);
        if !fname.exists() {
            debug!(path = %fname.display(), "drop-feature manifest not present yet");
            return Ok(None);
        }
        let content = std::fs::read_to_string(&fname)?;
        let drop_features: Vec<String> = serde_json::from_str(&content)?;
        info!(count = drop_features.len(), "drop features loaded");

        if drop_features.len() <= 1 {
            return Ok(None);
        }
        require_measured_losses(current_models, "features_selection")?;

        let mut generated = Vec::new();
        for (m_type, group) in group_by_loss(current_models) {
            if !m_type.supports_feature_selection() {
                continue;
            }
            for m in group.iter().take(1) {
                let mut params = m.derive_variant();
                params.preprocessing.drop_features = drop_features.clone();
                params.name = format!("{}_SelectedFeatures", m.name);
                params.learner.strip_architecture();
                if self.ledger.insert_if_new(&params) {
                    generated.push(params);
                }
            }
        }
        Ok(Some(generated))
    }

    /// Re-trains the boosted stacked seeds on the stacked dataset variant.
    /// For regression with a scaled target, the scaling is propagated onto
    /// the added prediction columns.
    pub(crate) fn stack_params(&mut self, stacked_models: &[Candidate]) -> Vec<Candidate> {
        if stacked_models.is_empty() {
            return Vec::new();
        }

        let added_columns: Vec<String> = stacked_models
            .iter()
            .filter(|m| m.model_type().is_boosted())
            .map(|m| format!("prediction_{}", m.name))
            .collect();

        let mut generated = Vec::new();
        for m in stacked_models {
            if !m.model_type().is_boosted() {
                continue;
            }
            let mut params = m.derive_variant();
            params.validation_strategy.x_path = m.validation_strategy.stacked_x_path();
            params.name = format!("{}_Stacked", m.name);
            params.is_stacked = true;
            // The stacked input is wider than what the artifact was fit on.
            params.learner.strip_architecture();

            if self.ml_task == TaskType::Regression {
                let target = &params.preprocessing.target_preprocessing;
                let scale = if target.iter().any(|s| s == "scale_log_and_normal") {
                    Some("scale_log_and_normal")
                } else if target.iter().any(|s| s == "scale_normal") {
                    Some("scale_normal")
                } else {
                    None
                };
                if let Some(scale) = scale {
                    for col in &added_columns {
                        params
                            .preprocessing
                            .columns_preprocessing
                            .insert(col.clone(), vec![scale.to_string()]);
                    }
                }
            }

            if self.ledger.insert_if_new(&params) {
                generated.push(params);
            }
        }
        generated
    }
}
