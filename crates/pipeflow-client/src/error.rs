//! Errores del cliente.

use pipeflow_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// La pipeline o los argumentos no superan la validación local.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("request timed out")]
    Timeout,

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("resource not found: {0}")]
    NotFound(String),

    /// El recurso ya existe (p. ej. una pipeline registrada con el mismo
    /// nombre).
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("api error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Traduce un status HTTP no exitoso a la variante correspondiente.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => ClientError::Authentication(body),
            404 => ClientError::NotFound(body),
            409 => ClientError::Conflict(body),
            _ => ClientError::Api { status, message: body },
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, ClientError::Conflict(_))
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(self, ClientError::Authentication(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_statuses() {
        assert!(ClientError::from_status(401, String::new()).is_auth_error());
        assert!(ClientError::from_status(403, String::new()).is_auth_error());
        assert!(matches!(ClientError::from_status(404, "x".into()), ClientError::NotFound(m) if m == "x"));
        assert!(ClientError::from_status(409, String::new()).is_conflict());
        assert!(matches!(ClientError::from_status(500, "boom".into()), ClientError::Api { status: 500, .. }));
    }
}
