//! Definiciones relacionadas a Steps.
//!
//! Un Step es una unidad pura que transforma inputs numéricos con nombre en
//! outputs numéricos con nombre, empaquetable como contenedor independiente.
//! Este módulo define:
//! - `StepDefinition`: interfaz neutral usada por el compilador y el runner.
//! - `StepDescriptor`: value object (nombre, esquemas, imagen, función pura).
//! - `StepInputs` / `StepOutputs` y `StepRunResult`.
//! - `execute_step`: validación de inputs/outputs alrededor de `run`.

pub mod definition;
pub mod descriptor;
mod execute;
mod io;
mod status;

pub use definition::{StepDefinition, StepRunResult};
pub use descriptor::{StepDescriptor, StepFn};
pub use execute::execute_step;
pub use io::{StepInputs, StepOutputs};
pub use status::StepStatus;
