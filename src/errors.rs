//! Error de nivel aplicación: agrupa los errores de cada crate.

use pipeflow_client::ClientError;
use pipeflow_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("configuración inválida: {0}")]
    Config(String),
    #[error("error de E/S: {0}")]
    Io(#[from] std::io::Error),
    #[error("error de serialización: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_crate_errors_transparently() {
        let e: AppError = CoreError::UnknownParameter("c".into()).into();
        assert_eq!(e.to_string(), "unknown parameter 'c'");

        let e: AppError = ClientError::Conflict("dup".into()).into();
        assert_eq!(e.to_string(), "conflict: dup");
    }
}
