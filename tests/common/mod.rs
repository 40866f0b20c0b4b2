// Shared fixtures: a small algorithm catalog plus scripted collaborators,
// so stage behavior can be tested without a real training engine.
#![allow(dead_code)]

use modelforge::config::TunerConfig;
use modelforge::model::{
    Candidate, DatasetInfo, LearnerParams, ModelStatus, ModelType, PreprocessingPlan, TaskType,
    ValidationStrategy,
};
use modelforge::registry::{
    AlgorithmInfo, AlgorithmRegistry, NeighborGenerator, PreprocessingSynthesizer,
};
use modelforge::sampler::ParamSpace;
use modelforge::tuner::Tuner;
use serde_json::{json, Map, Value};

pub fn space(entries: &[(&str, &[Value])]) -> ParamSpace {
    let mut s = ParamSpace::new();
    for (name, values) in entries {
        s = s.add(name, values);
    }
    s
}

fn defaults(entries: &[(&str, Value)]) -> Map<String, Value> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

pub fn fixture_registry(task: TaskType) -> AlgorithmRegistry {
    let mut registry = AlgorithmRegistry::new();

    registry.register(
        task,
        ModelType::Baseline,
        AlgorithmInfo {
            default_params: defaults(&[]),
            param_space: space(&[("strategy", &[json!("mean")])]),
            required_preprocessing: vec!["missing_values_inputation".to_string()],
            ..Default::default()
        },
    );
    registry.register(
        task,
        ModelType::DecisionTree,
        AlgorithmInfo {
            default_params: defaults(&[("max_depth", json!(3))]),
            param_space: space(&[
                ("criterion", &[json!("gini"), json!("entropy")]),
                ("max_depth", &[json!(2), json!(3), json!(4)]),
            ]),
            required_preprocessing: vec!["missing_values_inputation".to_string()],
            ..Default::default()
        },
    );
    registry.register(
        task,
        ModelType::Linear,
        AlgorithmInfo {
            default_params: defaults(&[]),
            param_space: space(&[("alpha", &[json!(0.0), json!(0.1)])]),
            required_preprocessing: vec!["scale".to_string()],
            ..Default::default()
        },
    );

    for model_type in [
        ModelType::RandomForest,
        ModelType::ExtraTrees,
        ModelType::NeuralNetwork,
        ModelType::NearestNeighbors,
    ] {
        registry.register(
            task,
            model_type,
            AlgorithmInfo {
                default_params: defaults(&[("trees", json!(100))]),
                param_space: space(&[
                    ("trees", &[json!(50), json!(100), json!(200), json!(400)]),
                    ("max_features", &[json!(0.5), json!(0.7), json!(0.9)]),
                ]),
                required_preprocessing: vec!["missing_values_inputation".to_string()],
                ..Default::default()
            },
        );
    }

    for model_type in [ModelType::Xgboost, ModelType::LightGbm, ModelType::CatBoost] {
        registry.register(
            task,
            model_type,
            AlgorithmInfo {
                default_params: defaults(&[("eta", json!(0.1)), ("max_depth", json!(6))]),
                param_space: space(&[
                    ("eta", &[json!(0.05), json!(0.1), json!(0.2), json!(0.3)]),
                    ("max_depth", &[json!(3), json!(6), json!(9), json!(12)]),
                    (
                        "subsample",
                        &[json!(0.5), json!(0.6), json!(0.8), json!(1.0)],
                    ),
                ]),
                required_preprocessing: vec!["missing_values_inputation".to_string()],
                ..Default::default()
            },
        );
    }

    registry
}

pub fn fixture_dataset() -> DatasetInfo {
    DatasetInfo {
        rows: 500,
        cols: 20,
        num_class: None,
    }
}

pub fn fixture_validation() -> ValidationStrategy {
    ValidationStrategy {
        x_path: "out/run/X.parquet".to_string(),
        y_path: "out/run/y.parquet".to_string(),
        params: Map::new(),
    }
}

/// Synthesizer scripting a fixed plan; lets tests control the target
/// preprocessing seen by the stacking stage.
pub struct ScriptedSynthesizer {
    pub target_preprocessing: Vec<String>,
}

impl PreprocessingSynthesizer for ScriptedSynthesizer {
    fn synthesize(
        &self,
        _required: &[String],
        _data_info: &DatasetInfo,
        _task: TaskType,
    ) -> PreprocessingPlan {
        PreprocessingPlan {
            target_preprocessing: self.target_preprocessing.clone(),
            ..Default::default()
        }
    }
}

/// Deterministic neighbor generator: two feasible perturbations of the
/// parent's `max_depth` plus one infeasible slot.
pub struct StubNeighbors;

impl NeighborGenerator for StubNeighbors {
    fn neighbors(
        &self,
        learner: &LearnerParams,
        _task: TaskType,
        seed: u64,
    ) -> Vec<Option<LearnerParams>> {
        let mut out = Vec::new();
        for delta in [1i64, 2] {
            let mut p = learner.clone();
            let depth = p
                .params
                .get("max_depth")
                .and_then(Value::as_i64)
                .unwrap_or(3);
            p.params
                .insert("max_depth".to_string(), json!(depth + delta));
            p.seed = seed + delta as u64;
            out.push(Some(p));
        }
        out.push(None);
        out
    }
}

pub fn make_tuner(config: TunerConfig, task: TaskType) -> Tuner {
    Tuner::new(
        config,
        task,
        fixture_registry(task),
        fixture_validation(),
        fixture_dataset(),
    )
    .with_neighbor_generator(Box::new(StubNeighbors))
}

/// A trained model as the driver would hand it back: a generated candidate
/// with a measured loss.
pub fn trained(name: &str, model_type: ModelType, task: TaskType, loss: f64) -> Candidate {
    Candidate {
        name: name.to_string(),
        status: ModelStatus::Trained,
        final_loss: Some(loss),
        train_time: Some(1.0),
        ml_task: task,
        explain_level: 2,
        is_stacked: false,
        learner: LearnerParams {
            model_type,
            ml_task: task,
            seed: 1,
            num_class: None,
            // Loss doubles as a distinguishing hyperparameter so fixtures
            // with different losses fingerprint differently.
            params: defaults(&[("eta", json!(loss)), ("max_depth", json!(6))]),
        },
        preprocessing: PreprocessingPlan::default(),
        validation_strategy: fixture_validation(),
        additional: Map::new(),
    }
}
