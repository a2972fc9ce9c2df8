//! Pipelines: definición inmutable, builder, enlace de argumentos y
//! compilación a manifest.

pub mod binding;
pub mod builder;
pub mod compiler;
pub mod definition;

pub use binding::{bind_arguments, BoundArgument, BoundArguments};
pub use builder::PipelineBuilder;
pub use compiler::{compile, sanitize_k8s_name};
pub use definition::{PipelineDefinition, TaskArgument, TaskInvocation};
