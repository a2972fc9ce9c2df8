//! Definición inmutable de una pipeline.
//!
//! Sólo se construye a través de `PipelineBuilder::build`, que valida los
//! invariantes (nombres únicos, bindings completos, defaults tipados) y
//! calcula el `definition_hash`.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::constants::SDK_VERSION;
use crate::param::{number_value, ParamSpec};
use crate::step::StepDefinition;

/// Origen del valor de un input de step dentro de una pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskArgument {
    /// Referencia a un parámetro de la pipeline.
    Param(String),
    /// Valor fijo.
    Constant(f64),
}

impl TaskArgument {
    pub fn param(name: impl Into<String>) -> Self {
        TaskArgument::Param(name.into())
    }

    pub fn constant(value: f64) -> Self {
        TaskArgument::Constant(value)
    }

    fn describe(&self) -> Value {
        match self {
            TaskArgument::Param(p) => json!({ "param": p }),
            TaskArgument::Constant(c) => json!({ "constant": c }),
        }
    }
}

/// Una invocación de un step dentro de la pipeline.
#[derive(Debug, Clone)]
pub struct TaskInvocation {
    pub name: String,
    pub step: Arc<dyn StepDefinition>,
    pub arguments: BTreeMap<String, TaskArgument>,
}

#[derive(Debug, Clone)]
pub struct PipelineDefinition {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) params: Vec<ParamSpec>,
    pub(crate) tasks: Vec<TaskInvocation>,
    pub(crate) definition_hash: String,
}

impl PipelineDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Parámetros en orden de declaración.
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn tasks(&self) -> &[TaskInvocation] {
        &self.tasks
    }

    pub fn task(&self, name: &str) -> Option<&TaskInvocation> {
        self.tasks.iter().find(|t| t.name == name)
    }

    /// Hash determinista de la definición (versión de la pipeline).
    pub fn definition_hash(&self) -> &str {
        &self.definition_hash
    }

    /// Defaults declarados como objeto JSON (sólo parámetros con default).
    pub fn defaults(&self) -> Value {
        let map: serde_json::Map<String, Value> =
            self.params
                .iter()
                .filter_map(|p| p.default.map(|d| (p.name.clone(), number_value(d))))
                .collect();
        Value::Object(map)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Descripción estructural usada como input del hash.
pub(crate) fn describe(name: &str, description: &str, params: &[ParamSpec], tasks: &[TaskInvocation]) -> Value {
    let tasks: Vec<Value> = tasks.iter()
                                 .map(|t| {
                                     let args: serde_json::Map<String, Value> =
                                         t.arguments.iter().map(|(k, a)| (k.clone(), a.describe())).collect();
                                     json!({
                                         "name": t.name,
                                         "step": {
                                             "name": t.step.name(),
                                             "image": t.step.image(),
                                             "command": t.step.command(),
                                             "inputs": t.step.inputs(),
                                             "outputs": t.step.outputs(),
                                         },
                                         "arguments": args,
                                     })
                                 })
                                 .collect();
    json!({
        "sdk_version": SDK_VERSION,
        "name": name,
        "description": description,
        "params": params,
        "tasks": tasks,
    })
}
