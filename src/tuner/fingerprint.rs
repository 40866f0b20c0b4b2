// ===== modelforge/src/tuner/fingerprint.rs =====
use crate::model::Candidate;
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

/// Canonical identity of a candidate's semantic content: the serialized
/// `preprocessing` and `learner` sections, field-by-field in sorted key
/// order, minus the excluded keys. Two candidates differing only in their
/// originating seed fingerprint identically.
pub fn params_key(candidate: &Candidate, excluded: &HashSet<String>) -> String {
    let mut key = String::from("key_");
    let sections = [
        (
            "preprocessing",
            serde_json::to_value(&candidate.preprocessing).unwrap_or(Value::Null),
        ),
        (
            "learner",
            serde_json::to_value(&candidate.learner).unwrap_or(Value::Null),
        ),
    ];
    for (section, value) in sections {
        key.push_str(section);
        if let Value::Object(fields) = value {
            for (k, v) in fields {
                if excluded.contains(&k) {
                    continue;
                }
                key.push('_');
                key.push_str(&k);
                key.push('_');
                key.push_str(&v.to_string());
            }
        }
    }
    key
}

/// Run-scoped deduplication ledger. Owned by one `Tuner` instance; its only
/// mutation is acceptance of a new fingerprint.
#[derive(Debug, Clone)]
pub struct Ledger {
    seen: HashSet<String>,
    excluded_keys: HashSet<String>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            seen: HashSet::new(),
            excluded_keys: ["seed".to_string()].into_iter().collect(),
        }
    }

    /// Overrides the fields left out of the fingerprint. The default,
    /// `["seed"]`, matches the established dedup behavior.
    pub fn with_excluded_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            seen: HashSet::new(),
            excluded_keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn contains(&self, candidate: &Candidate) -> bool {
        self.seen.contains(&params_key(candidate, &self.excluded_keys))
    }

    /// Accepts the candidate if its fingerprint is unseen. Returns whether
    /// it was accepted.
    pub fn insert_if_new(&mut self, candidate: &Candidate) -> bool {
        let key = params_key(candidate, &self.excluded_keys);
        let accepted = self.seen.insert(key);
        if !accepted {
            debug!(name = %candidate.name, "duplicate candidate rejected");
        }
        accepted
    }
}
