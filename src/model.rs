// ===== modelforge/src/model.rs =====
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use strum_macros::{Display, EnumIter, EnumString};

/// Hyperparameter key under which trainers cache a fitted architecture.
/// Derived-variant stages strip it so the clone is rebuilt fresh.
pub const MODEL_ARCHITECTURE_KEY: &str = "model_architecture_json";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    BinaryClassification,
    MulticlassClassification,
    Regression,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
pub enum ModelType {
    Baseline,
    #[strum(serialize = "Decision Tree")]
    DecisionTree,
    Linear,
    #[strum(serialize = "Random Forest")]
    RandomForest,
    #[strum(serialize = "Extra Trees")]
    ExtraTrees,
    Xgboost,
    #[strum(serialize = "LightGBM")]
    LightGbm,
    CatBoost,
    #[strum(serialize = "Neural Network")]
    NeuralNetwork,
    #[strum(serialize = "Nearest Neighbors")]
    NearestNeighbors,
    #[strum(serialize = "MLP")]
    Mlp,
    Ensemble,
}

impl ModelType {
    /// Display name with whitespace removed, used in candidate names.
    pub fn compact_name(&self) -> String {
        self.to_string().replace(' ', "")
    }

    /// Families generated by the simple_algorithms stage.
    pub fn is_simple(&self) -> bool {
        matches!(self, Self::Baseline | Self::DecisionTree | Self::Linear)
    }

    /// Gradient-boosted tree families.
    pub fn is_boosted(&self) -> bool {
        matches!(self, Self::Xgboost | Self::LightGbm | Self::CatBoost)
    }

    /// Families that are never refined by hill climbing.
    pub fn skips_hill_climbing(&self) -> bool {
        matches!(
            self,
            Self::Baseline | Self::DecisionTree | Self::Linear | Self::NearestNeighbors
        )
    }

    /// Families eligible for the feature-selection stage.
    pub fn supports_feature_selection(&self) -> bool {
        self.is_boosted()
            || matches!(
                self,
                Self::RandomForest | Self::ExtraTrees | Self::NeuralNetwork
            )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ModelStatus {
    Initialized,
    Trained,
    Error,
}

/// Descriptor of the dataset being tuned: shape and, for multiclass, the
/// number of target classes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub rows: usize,
    pub cols: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub num_class: Option<u32>,
}

/// Request to augment the feature matrix with engineered "golden" features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoldenFeaturesRequest {
    pub results_path: String,
    pub ml_task: TaskType,
}

/// Feature/target transforms attached to a candidate. Produced by the
/// external preprocessing synthesizer, mutated by the derived-variant stages.
/// Optional fields are absent from the serialized form when unset so that
/// presence participates in the dedup fingerprint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreprocessingPlan {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub golden_features: Option<GoldenFeaturesRequest>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub drop_features: Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub add_random_feature: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub target_preprocessing: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub columns_preprocessing: BTreeMap<String, Vec<String>>,
}

/// How the dataset is split for validation. Opaque to the tuner except for
/// the feature-matrix path, which stacking rewrites.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationStrategy {
    pub x_path: String,
    pub y_path: String,
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl ValidationStrategy {
    /// Path of the stacked-dataset variant of the feature matrix:
    /// `X.parquet` -> `X_stacked.parquet`.
    pub fn stacked_x_path(&self) -> String {
        match self.x_path.rfind('.') {
            Some(dot) => format!("{}_stacked{}", &self.x_path[..dot], &self.x_path[dot..]),
            None => format!("{}_stacked", self.x_path),
        }
    }
}

/// The algorithm half of a candidate: family, task, seed and the open
/// hyperparameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnerParams {
    pub model_type: ModelType,
    pub ml_task: TaskType,
    pub seed: u64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub num_class: Option<u32>,
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl LearnerParams {
    /// Drops the cached architecture artifact, if present.
    pub fn strip_architecture(&mut self) {
        self.params.remove(MODEL_ARCHITECTURE_KEY);
    }
}

/// A fully specified, not-yet-trained description of one model to fit.
/// `final_loss` and `train_time` are populated later by the external
/// trainer; lower loss is better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub status: ModelStatus,
    pub final_loss: Option<f64>,
    pub train_time: Option<f64>,
    pub ml_task: TaskType,
    pub explain_level: u8,
    pub is_stacked: bool,
    pub learner: LearnerParams,
    pub preprocessing: PreprocessingPlan,
    pub validation_strategy: ValidationStrategy,
    #[serde(skip_serializing_if = "Map::is_empty", default)]
    pub additional: Map<String, Value>,
}

impl Candidate {
    pub fn model_type(&self) -> ModelType {
        self.learner.model_type
    }

    /// Clone-then-patch base for the derived-variant stages: the training
    /// state is reset here so each stage applies only its own mutation.
    pub fn derive_variant(&self) -> Candidate {
        let mut c = self.clone();
        c.status = ModelStatus::Initialized;
        c.final_loss = None;
        c.train_time = None;
        c
    }

    /// Descriptor consumed by the external ensembler instead of trainable
    /// hyperparameters. Keyed on the `Ensemble` sentinel family.
    pub fn ensemble_descriptor(ml_task: TaskType, is_stacked: bool) -> Candidate {
        Candidate {
            name: if is_stacked {
                "Ensemble_Stacked".to_string()
            } else {
                "Ensemble".to_string()
            },
            status: ModelStatus::Initialized,
            final_loss: None,
            train_time: None,
            ml_task,
            explain_level: 0,
            is_stacked,
            learner: LearnerParams {
                model_type: ModelType::Ensemble,
                ml_task,
                seed: 0,
                num_class: None,
                params: Map::new(),
            },
            preprocessing: PreprocessingPlan::default(),
            validation_strategy: ValidationStrategy::default(),
            additional: Map::new(),
        }
    }
}
