//! `add-op`: suma dos números.
//!
//! - Inputs `a`, `b` (Float), output `Output` (Float).
//! - Sin efectos secundarios; el resultado es exactamente `a + b`.

use pipeflow_core::constants::DEFAULT_OUTPUT;
use pipeflow_core::{CoreError, ParamType, StepDescriptor, StepInputs, StepOutputs};

pub const ADD_OP: &str = "add-op";

fn add(inputs: &StepInputs) -> Result<StepOutputs, CoreError> {
    let a = inputs.get("a")?;
    let b = inputs.get("b")?;
    Ok(StepOutputs::single(DEFAULT_OUTPUT, a + b))
}

/// Descriptor del step con la imagen por defecto.
pub fn add_op() -> StepDescriptor {
    StepDescriptor::new(ADD_OP, add).with_description("Adds two numbers.")
                                    .with_input("a", ParamType::Float)
                                    .with_input("b", ParamType::Float)
                                    .with_output(DEFAULT_OUTPUT, ParamType::Float)
}
