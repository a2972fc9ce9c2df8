//! `StepDescriptor`: adaptador explícito entre una función pura y una unidad
//! planificable por el servicio de orquestación.
//!
//! ```ignore
//! fn add(inputs: &StepInputs) -> Result<StepOutputs, CoreError> {
//!     Ok(StepOutputs::single("Output", inputs.get("a")? + inputs.get("b")?))
//! }
//!
//! let step = StepDescriptor::new("add-op", add)
//!     .with_input("a", ParamType::Float)
//!     .with_input("b", ParamType::Float)
//!     .with_output("Output", ParamType::Float);
//! ```

use super::{StepDefinition, StepInputs, StepOutputs, StepRunResult};
use crate::constants::{DEFAULT_STEP_IMAGE, STEP_ENTRYPOINT};
use crate::errors::CoreError;
use crate::param::{ParamSpec, ParamType};

/// Función pura envuelta por un descriptor.
pub type StepFn = fn(&StepInputs) -> Result<StepOutputs, CoreError>;

#[derive(Debug, Clone)]
pub struct StepDescriptor {
    name: String,
    description: String,
    inputs: Vec<ParamSpec>,
    outputs: Vec<ParamSpec>,
    image: String,
    command: Option<Vec<String>>,
    func: StepFn,
}

impl StepDescriptor {
    /// Crea un descriptor sin inputs ni outputs, con la imagen por defecto.
    pub fn new(name: impl Into<String>, func: StepFn) -> Self {
        Self { name: name.into(),
               description: String::new(),
               inputs: Vec::new(),
               outputs: Vec::new(),
               image: DEFAULT_STEP_IMAGE.to_string(),
               command: None,
               func }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_input(mut self, name: impl Into<String>, ty: ParamType) -> Self {
        self.inputs.push(ParamSpec::new(name, ty));
        self
    }

    pub fn with_output(mut self, name: impl Into<String>, ty: ParamType) -> Self {
        self.outputs.push(ParamSpec::new(name, ty));
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Sustituye el entrypoint por defecto (`pipeflow step <name>`).
    pub fn with_command<I, S>(mut self, command: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        self.command = Some(command.into_iter().map(Into::into).collect());
        self
    }
}

impl StepDefinition for StepDescriptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn inputs(&self) -> &[ParamSpec] {
        &self.inputs
    }

    fn outputs(&self) -> &[ParamSpec] {
        &self.outputs
    }

    fn image(&self) -> &str {
        &self.image
    }

    fn command(&self) -> Vec<String> {
        match &self.command {
            Some(cmd) => cmd.clone(),
            None => vec![STEP_ENTRYPOINT.to_string(), "step".to_string(), self.name.clone()],
        }
    }

    fn run(&self, inputs: &StepInputs) -> StepRunResult {
        match (self.func)(inputs) {
            Ok(outputs) => StepRunResult::Success { outputs },
            Err(error) => StepRunResult::Failure { error },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn double(inputs: &StepInputs) -> Result<StepOutputs, CoreError> {
        Ok(StepOutputs::single("Output", inputs.get("x")? * 2.0))
    }

    #[test]
    fn default_command_points_to_step_entrypoint() {
        let step = StepDescriptor::new("double", double).with_input("x", ParamType::Float);
        assert_eq!(step.command(), vec!["pipeflow", "step", "double"]);
        assert_eq!(step.image(), DEFAULT_STEP_IMAGE);

        let custom = step.with_command(["/bin/double"]).with_image("registry/double:1");
        assert_eq!(custom.command(), vec!["/bin/double"]);
        assert_eq!(custom.image(), "registry/double:1");
    }

    #[test]
    fn run_maps_function_errors_to_failure() {
        let step = StepDescriptor::new("double", double);
        let res = step.run(&StepInputs::new());
        assert_eq!(res, StepRunResult::Failure { error: CoreError::MissingArgument("x".into()) });

        let ok = step.run(&[("x", 2.0)].into_iter().collect());
        assert_eq!(ok, StepRunResult::Success { outputs: StepOutputs::single("Output", 4.0) });
    }
}
