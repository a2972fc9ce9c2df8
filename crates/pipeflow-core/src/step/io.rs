use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Inputs validados de un step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepInputs(BTreeMap<String, f64>);

impl StepInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.0.insert(name.into(), value);
    }

    /// Valor de un input declarado; su ausencia es un `MissingArgument`.
    pub fn get(&self, name: &str) -> Result<f64, CoreError> {
        self.0
            .get(name)
            .copied()
            .ok_or_else(|| CoreError::MissingArgument(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for StepInputs {
    fn from_iter<T: IntoIterator<Item = (K, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Outputs producidos por un step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepOutputs(BTreeMap<String, f64>);

impl StepOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outputs con un único valor.
    pub fn single(name: impl Into<String>, value: f64) -> Self {
        let mut out = Self::new();
        out.insert(name, value);
        out
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
