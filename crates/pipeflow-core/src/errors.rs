//! Errores específicos del core.
//!
//! Todos los errores de validación (tipos, nombres de parámetros, definición
//! de pipeline) se detectan localmente, antes de cualquier llamada de red.

use thiserror::Error;

use crate::param::ParamType;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum CoreError {
    #[error("invalid pipeline definition: {0}")]
    InvalidDefinition(String),
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),
    #[error("missing value for parameter '{0}'")]
    MissingArgument(String),
    #[error("type mismatch for '{name}': expected {expected}, found {found}")]
    TypeMismatch { name: String, expected: ParamType, found: String },
    #[error("malformed argument '{0}' (expected name=value)")]
    MalformedArgument(String),
    #[error("unknown step '{0}'")]
    UnknownStep(String),
    #[error("step '{step}' failed: {reason}")]
    StepFailed { step: String, reason: String },
    #[error("internal: {0}")]
    Internal(String),
}
