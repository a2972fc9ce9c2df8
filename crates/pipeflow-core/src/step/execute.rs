use log::debug;

use super::{StepDefinition, StepInputs, StepOutputs, StepRunResult};
use crate::errors::CoreError;
use crate::param::{coerce_value, RawArguments};

/// Ejecuta `step` sobre valores crudos.
///
/// Antes de `run`: nombres desconocidos y valores no numéricos se rechazan,
/// los inputs ausentes usan su default declarado o producen
/// `MissingArgument`. Después de `run`: cada output declarado debe existir y
/// respetar su tipo.
pub fn execute_step(step: &dyn StepDefinition, raw: &RawArguments) -> Result<StepOutputs, CoreError> {
    if let Some(unknown) = raw.keys().find(|k| !step.inputs().iter().any(|i| &i.name == *k)) {
        return Err(CoreError::UnknownParameter(unknown.clone()));
    }

    let mut inputs = StepInputs::new();
    for spec in step.inputs() {
        let value = match (raw.get(&spec.name), spec.default) {
            (Some(v), _) => coerce_value(&spec.name, spec.ty, v)?,
            (None, Some(default)) => default,
            (None, None) => return Err(CoreError::MissingArgument(spec.name.clone())),
        };
        inputs.insert(spec.name.clone(), value);
    }

    debug!("running step '{}' with {:?}", step.name(), inputs);
    let outputs = match step.run(&inputs) {
        StepRunResult::Success { outputs } => outputs,
        StepRunResult::Failure { error } => {
            return Err(CoreError::StepFailed { step: step.name().to_string(),
                                               reason: error.to_string() })
        }
    };

    for spec in step.outputs() {
        match outputs.get(&spec.name) {
            Some(v) if spec.ty.accepts(v) => {}
            Some(v) => {
                return Err(CoreError::TypeMismatch { name: spec.name.clone(),
                                                     expected: spec.ty,
                                                     found: format!("number {v}") })
            }
            None => {
                return Err(CoreError::StepFailed { step: step.name().to_string(),
                                                   reason: format!("output '{}' not produced", spec.name) })
            }
        }
    }
    if let Some((extra, _)) = outputs.iter().find(|(k, _)| !step.outputs().iter().any(|o| o.name == *k)) {
        return Err(CoreError::StepFailed { step: step.name().to_string(),
                                           reason: format!("undeclared output '{extra}'") });
    }
    Ok(outputs)
}
