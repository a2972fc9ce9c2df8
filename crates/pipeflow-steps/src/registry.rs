//! Registro de steps por nombre.
//!
//! El contenedor de un step ejecuta `pipeflow step <name> ...`; el registro
//! traduce ese nombre al descriptor correspondiente.

use std::collections::BTreeMap;
use std::sync::Arc;

use pipeflow_core::{CoreError, StepDefinition};

use crate::steps::add::add_op;

#[derive(Debug, Default)]
pub struct StepRegistry {
    steps: BTreeMap<String, Arc<dyn StepDefinition>>,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registro con todos los steps incluidos en este crate.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(add_op());
        registry
    }

    pub fn register<S: StepDefinition + 'static>(&mut self, step: S) {
        self.steps.insert(step.name().to_string(), Arc::new(step));
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn StepDefinition>, CoreError> {
        self.steps
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::UnknownStep(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.steps.keys().map(String::as_str)
    }
}
