use std::fmt;

use serde::{Deserialize, Serialize};

/// Tipos numéricos soportados por inputs, outputs y parámetros de pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamType {
    /// Cualquier número salvo NaN (admite `inf`, p. ej. una suma que desborda).
    Float,
    /// Número finito sin parte fraccionaria.
    Integer,
}

impl ParamType {
    /// Nombre con el que el tipo aparece en los manifests.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::Float => "Float",
            ParamType::Integer => "Integer",
        }
    }

    /// `true` si `value` es un valor válido para este tipo.
    pub fn accepts(&self, value: f64) -> bool {
        match self {
            ParamType::Float => !value.is_nan(),
            ParamType::Integer => value.is_finite() && value.fract() == 0.0,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declaración de un parámetro con nombre (input/output de step o parámetro
/// de pipeline).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ParamType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self { name: name.into(),
               ty,
               default: None,
               description: None }
    }

    pub fn with_default(mut self, default: f64) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
