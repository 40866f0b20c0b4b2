// ===== modelforge/src/sampler.rs =====
use crate::registry::ParameterSampler;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Discrete hyperparameter search space: each parameter carries the list of
/// values it may take. Ordered so that sampling is reproducible for a given
/// seed regardless of insertion order.
#[derive(Debug, Clone, Default)]
pub struct ParamSpace {
    choices: BTreeMap<String, Vec<Value>>,
}

impl ParamSpace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, name: &str, values: &[Value]) -> Self {
        self.choices.insert(name.to_string(), values.to_vec());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<Value>)> {
        self.choices.iter()
    }
}

/// Default sampler: one seeded uniform draw per parameter. An empty space
/// has no feasible parameterization.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeededSampler;

impl ParameterSampler for SeededSampler {
    fn sample(&self, space: &ParamSpace, seed: u64) -> Option<Map<String, Value>> {
        if space.is_empty() {
            return None;
        }
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut params = Map::new();
        for (name, values) in space.iter() {
            if values.is_empty() {
                return None;
            }
            let pick = rng.usize(0..values.len());
            params.insert(name.clone(), values[pick].clone());
        }
        Some(params)
    }
}
