//! Ejecución local (en proceso) de pipelines.

mod local;

pub use local::{run_local, LocalRun, TaskRecord};
