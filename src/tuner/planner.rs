// ===== modelforge/src/tuner/planner.rs =====
use crate::config::TunerConfig;
use crate::error::ModelForgeError;
use std::fmt;
use std::str::FromStr;

/// The closed set of generation strategies, in wire form
/// (`simple_algorithms`, `hill_climbing_2`, ...). Hill-climbing carries its
/// 1-based depth index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    SimpleAlgorithms,
    DefaultAlgorithms,
    NotSoRandom,
    GoldenFeatures,
    InsertRandomFeature,
    FeaturesSelection,
    HillClimbing(usize),
    Ensemble,
    Stack,
    EnsembleStacked,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::SimpleAlgorithms => write!(f, "simple_algorithms"),
            Stage::DefaultAlgorithms => write!(f, "default_algorithms"),
            Stage::NotSoRandom => write!(f, "not_so_random"),
            Stage::GoldenFeatures => write!(f, "golden_features"),
            Stage::InsertRandomFeature => write!(f, "insert_random_feature"),
            Stage::FeaturesSelection => write!(f, "features_selection"),
            Stage::HillClimbing(i) => write!(f, "hill_climbing_{}", i),
            Stage::Ensemble => write!(f, "ensemble"),
            Stage::Stack => write!(f, "stack"),
            Stage::EnsembleStacked => write!(f, "ensemble_stacked"),
        }
    }
}

impl FromStr for Stage {
    type Err = ModelForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(suffix) = s.strip_prefix("hill_climbing_") {
            let i: usize = suffix
                .parse()
                .map_err(|_| ModelForgeError::Config(format!("Invalid stage name '{}'", s)))?;
            return Ok(Stage::HillClimbing(i));
        }
        match s {
            "simple_algorithms" => Ok(Stage::SimpleAlgorithms),
            "default_algorithms" => Ok(Stage::DefaultAlgorithms),
            "not_so_random" => Ok(Stage::NotSoRandom),
            "golden_features" => Ok(Stage::GoldenFeatures),
            "insert_random_feature" => Ok(Stage::InsertRandomFeature),
            "features_selection" => Ok(Stage::FeaturesSelection),
            "ensemble" => Ok(Stage::Ensemble),
            "stack" => Ok(Stage::Stack),
            "ensemble_stacked" => Ok(Stage::EnsembleStacked),
            _ => Err(ModelForgeError::Config(format!(
                "Invalid stage name '{}'",
                s
            ))),
        }
    }
}

/// Ordered stage list for one run. Pure function of the configuration
/// flags; the driver asks once and then walks it front to back.
pub fn plan(config: &TunerConfig) -> Vec<Stage> {
    let mut stages = vec![Stage::SimpleAlgorithms, Stage::DefaultAlgorithms];
    if config.start_random_models > 1 {
        stages.push(Stage::NotSoRandom);
    }
    if config.golden_features {
        stages.push(Stage::GoldenFeatures);
    }
    if config.features_selection {
        stages.push(Stage::InsertRandomFeature);
        stages.push(Stage::FeaturesSelection);
    }
    for i in 0..config.hill_climbing_steps {
        stages.push(Stage::HillClimbing(i + 1));
    }
    if config.train_ensemble {
        stages.push(Stage::Ensemble);
    }
    if config.stack_models {
        stages.push(Stage::Stack);
        if config.train_ensemble {
            stages.push(Stage::EnsembleStacked);
        }
    }
    stages
}
