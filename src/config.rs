use crate::model::ModelType;
use clap::Args;
use std::str::FromStr;

/// Feature flags and budgets steering the search controller. Derives
/// `clap::Args` so a driver binary can flatten it into its own CLI.
#[derive(Args, Debug, Clone)]
pub struct TunerConfig {
    #[arg(long, default_value_t = 5)]
    pub start_random_models: usize,
    #[arg(long, default_value_t = 3)]
    pub hill_climbing_steps: usize,
    #[arg(long, default_value_t = 3)]
    pub top_models_to_improve: usize,

    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    pub golden_features: bool,
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    pub features_selection: bool,
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    pub train_ensemble: bool,
    #[arg(long, action = clap::ArgAction::Set, default_value_t = false)]
    pub stack_models: bool,

    #[arg(long, default_value_t = 1234)]
    pub seed: u64,

    /// Verbosity of post-hoc explanation artifacts (0 = none, 2 = full).
    #[arg(long, default_value_t = 2)]
    pub explain_level: u8,

    #[arg(
        long,
        default_value = "Baseline,Decision Tree,Linear,Random Forest,Extra Trees,Xgboost,LightGBM,CatBoost,Neural Network,Nearest Neighbors"
    )]
    pub algorithms: String,
}

impl TunerConfig {
    pub fn get_algorithms(&self) -> Vec<ModelType> {
        self.algorithms
            .split(',')
            .map(|s| {
                let name = s.trim();
                ModelType::from_str(name)
                    .unwrap_or_else(|_| panic!("Unknown algorithm family '{}'", name))
            })
            .collect()
    }

    pub fn is_enabled(&self, model_type: ModelType) -> bool {
        self.get_algorithms().contains(&model_type)
    }
}

impl Default for TunerConfig {
    fn default() -> Self {
        Self {
            start_random_models: 5,
            hill_climbing_steps: 3,
            top_models_to_improve: 3,
            golden_features: true,
            features_selection: true,
            train_ensemble: true,
            stack_models: false,
            seed: 1234,
            explain_level: 2,
            algorithms: "Baseline,Decision Tree,Linear,Random Forest,Extra Trees,Xgboost,\
                         LightGBM,CatBoost,Neural Network,Nearest Neighbors"
                .to_string(),
        }
    }
}
