//! pipeflow: define la "Addition pipeline" y la envía a un servicio de
//! orquestación.
//!
//! - `config`: configuración de envío desde entorno (`.env`) y flags.
//! - `submit`: flujo connect → crear run → close, y registro de la pipeline.
//! - `commands`: operaciones locales de la CLI (compilar, ejecutar en proceso,
//!   entrypoint de contenedor de un step).
//! - `errors`: `AppError`, error de nivel aplicación.

pub mod commands;
pub mod config;
pub mod errors;
pub mod submit;

pub use config::SubmitConfig;
pub use errors::AppError;
pub use submit::{register, submit};
