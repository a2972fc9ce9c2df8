//! pipeflow-core: definición de steps y pipelines numéricas.
//!
//! - `step`: `StepDescriptor` (función pura + esquemas + imagen) y la
//!   ejecución validada de un step.
//! - `pipeline`: `PipelineBuilder`, `PipelineDefinition`, enlace de
//!   argumentos y compilación a manifest.
//! - `engine`: ejecución local en proceso.
pub mod constants;
pub mod engine;
pub mod errors;
pub mod hashing;
pub mod param;
pub mod pipeline;
pub mod step;

pub use engine::{run_local, LocalRun, TaskRecord};
pub use errors::CoreError;
pub use param::{parse_assignments, ParamSpec, ParamType, RawArguments};
pub use pipeline::{bind_arguments, compile, BoundArguments, PipelineBuilder, PipelineDefinition, TaskArgument};
pub use step::{execute_step, StepDefinition, StepDescriptor, StepInputs, StepOutputs, StepRunResult, StepStatus};
