//! pipeflow-steps: steps concretos y pipelines listas para enviar.
//!
//! - `steps::add`: `add-op`, suma de dos números.
//! - `pipelines::addition`: "Addition pipeline" (una invocación de `add-op`).
//! - `registry`: resolución de steps por nombre, usada por el entrypoint del
//!   contenedor (`pipeflow step <name>`).

pub mod pipelines;
pub mod registry;
pub mod steps;

pub use pipelines::addition::{addition_pipeline, ADDITION_PIPELINE_DESCRIPTION, ADDITION_PIPELINE_NAME};
pub use registry::StepRegistry;
pub use steps::add::{add_op, ADD_OP};
