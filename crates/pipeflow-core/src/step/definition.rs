use std::fmt::Debug;

use super::{StepInputs, StepOutputs};
use crate::errors::CoreError;
use crate::param::ParamSpec;

/// Resultado abstracto de ejecutar un step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepRunResult {
    Success { outputs: StepOutputs },
    Failure { error: CoreError },
}

/// Trait que define un Step. Implementaciones deben ser puras respecto a
/// sus inputs.
pub trait StepDefinition: Debug + Send + Sync {
    /// Identificador estable del step (también nombre del componente).
    fn name(&self) -> &str;

    /// Descripción opcional.
    fn description(&self) -> &str {
        ""
    }

    /// Esquema de inputs, en orden de declaración.
    fn inputs(&self) -> &[ParamSpec];

    /// Esquema de outputs, en orden de declaración.
    fn outputs(&self) -> &[ParamSpec];

    /// Imagen de contenedor en la que se ejecuta el step.
    fn image(&self) -> &str;

    /// Comando del contenedor (sin los argumentos de inputs/outputs).
    fn command(&self) -> Vec<String>;

    /// Ejecución pura del step sobre inputs ya validados.
    fn run(&self, inputs: &StepInputs) -> StepRunResult;
}
