//! pipeflow-client: handle explícito hacia el servicio de orquestación.
//!
//! Ciclo de vida: `OrchestrationClient::connect` → operaciones → `close`.
//! No hay estado global: cada handle lleva su propia configuración y su
//! propio cliente HTTP.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod types;

pub use client::{OrchestrationClient, RunHandle, RunOptions, DEFAULT_EXPERIMENT};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use types::{ApiExperiment, ApiPipeline, ApiRun};
