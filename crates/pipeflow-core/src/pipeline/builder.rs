//! Builder para `PipelineDefinition`.
//!
//! Consume `self` en cada llamada y difiere toda la validación a `build`,
//! que falla de forma atómica: o la definición completa es válida o no se
//! produce ninguna.
//!
//! ```ignore
//! let pipeline = PipelineBuilder::new("Addition pipeline")
//!     .description("An example pipeline that adds two numbers.")
//!     .param("a", ParamType::Float, 1.0)
//!     .param("b", ParamType::Float, 7.0)
//!     .task(add_op(), [("a", TaskArgument::param("a")), ("b", TaskArgument::param("b"))])
//!     .build()?;
//! ```

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use super::compiler::sanitize_k8s_name;
use super::definition::{describe, PipelineDefinition, TaskArgument, TaskInvocation};
use crate::errors::CoreError;
use crate::hashing::hash_value;
use crate::param::{ParamSpec, ParamType};
use crate::step::StepDefinition;

#[derive(Debug)]
pub struct PipelineBuilder {
    name: String,
    description: String,
    params: Vec<ParamSpec>,
    tasks: Vec<TaskInvocation>,
}

impl PipelineBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(),
               description: String::new(),
               params: Vec::new(),
               tasks: Vec::new() }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Declara un parámetro con default.
    pub fn param(mut self, name: impl Into<String>, ty: ParamType, default: f64) -> Self {
        self.params.push(ParamSpec::new(name, ty).with_default(default));
        self
    }

    /// Declara un parámetro sin default: toda ejecución debe proveerlo.
    pub fn required_param(mut self, name: impl Into<String>, ty: ParamType) -> Self {
        self.params.push(ParamSpec::new(name, ty));
        self
    }

    /// Añade una invocación de `step`; el nombre de la tarea es el del step
    /// (con sufijo `-2`, `-3`, ... si el step ya fue invocado).
    pub fn task<S, I, K>(self, step: S, bindings: I) -> Self
        where S: StepDefinition + 'static,
              I: IntoIterator<Item = (K, TaskArgument)>,
              K: Into<String>
    {
        self.task_shared(Arc::new(step), bindings)
    }

    /// Igual que `task` pero reutilizando un step compartido.
    pub fn task_shared<I, K>(self, step: Arc<dyn StepDefinition>, bindings: I) -> Self
        where I: IntoIterator<Item = (K, TaskArgument)>,
              K: Into<String>
    {
        let base = step.name().to_string();
        let mut name = base.clone();
        let mut n = 1;
        while self.tasks.iter().any(|t| t.name == name) {
            n += 1;
            name = format!("{base}-{n}");
        }
        self.named_task(name, step, bindings)
    }

    /// Añade una invocación con nombre de tarea explícito.
    pub fn named_task<I, K>(mut self, name: impl Into<String>, step: Arc<dyn StepDefinition>, bindings: I) -> Self
        where I: IntoIterator<Item = (K, TaskArgument)>,
              K: Into<String>
    {
        let arguments: BTreeMap<String, TaskArgument> = bindings.into_iter().map(|(k, a)| (k.into(), a)).collect();
        self.tasks.push(TaskInvocation { name: name.into(),
                                         step,
                                         arguments });
        self
    }

    /// Valida y construye la definición final.
    pub fn build(self) -> Result<PipelineDefinition, CoreError> {
        if self.name.trim().is_empty() {
            return Err(invalid("pipeline name must not be empty"));
        }
        // El manifest usa el nombre saneado como entrypoint.
        if sanitize_k8s_name(&self.name).is_empty() {
            return Err(invalid(format!("pipeline name '{}' has no ASCII letters or digits", self.name)));
        }
        if self.tasks.is_empty() {
            return Err(invalid("pipeline must contain at least one task"));
        }

        let mut seen = HashSet::new();
        for p in &self.params {
            if !seen.insert(p.name.as_str()) {
                return Err(invalid(format!("duplicated parameter '{}'", p.name)));
            }
            if let Some(d) = p.default {
                if !p.ty.accepts(d) {
                    return Err(CoreError::TypeMismatch { name: p.name.clone(),
                                                         expected: p.ty,
                                                         found: format!("default {d}") });
                }
            }
        }

        let mut task_names = HashSet::new();
        for task in &self.tasks {
            if !task_names.insert(task.name.as_str()) {
                return Err(invalid(format!("duplicated task '{}'", task.name)));
            }
            self.validate_task(task)?;
        }

        let definition_hash = hash_value(&describe(&self.name, &self.description, &self.params, &self.tasks));
        Ok(PipelineDefinition { name: self.name,
                                description: self.description,
                                params: self.params,
                                tasks: self.tasks,
                                definition_hash })
    }

    fn validate_task(&self, task: &TaskInvocation) -> Result<(), CoreError> {
        let step = &task.step;
        if sanitize_k8s_name(step.name()).is_empty() || sanitize_k8s_name(&task.name).is_empty() {
            return Err(invalid(format!("task '{}' of step '{}' has no ASCII letters or digits",
                                       task.name,
                                       step.name())));
        }
        for input_name in task.arguments.keys() {
            if !step.inputs().iter().any(|i| &i.name == input_name) {
                return Err(invalid(format!("task '{}' binds unknown input '{}' of step '{}'",
                                           task.name,
                                           input_name,
                                           step.name())));
            }
        }
        for input in step.inputs() {
            match task.arguments.get(&input.name) {
                Some(TaskArgument::Param(p)) => {
                    let param = self.params
                                    .iter()
                                    .find(|x| &x.name == p)
                                    .ok_or_else(|| CoreError::UnknownParameter(p.clone()))?;
                    if param.ty == ParamType::Float && input.ty == ParamType::Integer {
                        return Err(invalid(format!("parameter '{}' (Float) cannot feed Integer input '{}' of task '{}'",
                                                   p, input.name, task.name)));
                    }
                }
                Some(TaskArgument::Constant(c)) => {
                    if !input.ty.accepts(*c) {
                        return Err(CoreError::TypeMismatch { name: input.name.clone(),
                                                             expected: input.ty,
                                                             found: format!("constant {c}") });
                    }
                }
                None if input.default.is_some() => {}
                None => {
                    return Err(invalid(format!("task '{}' leaves input '{}' unbound", task.name, input.name)));
                }
            }
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> CoreError {
    CoreError::InvalidDefinition(msg.into())
}
