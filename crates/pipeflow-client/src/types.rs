//! Tipos del API REST del servicio de orquestación (forma v1beta1).
//!
//! Los campos opcionales se toleran ausentes al decodificar y se omiten al
//! serializar, de modo que el mismo tipo sirve como petición y respuesta.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const API_PREFIX: &str = "/apis/v1beta1";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiHealth {
    #[serde(default)]
    pub commit_sha: Option<String>,
    #[serde(default)]
    pub tag_name: Option<String>,
    #[serde(default)]
    pub multi_user: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiResourceType {
    Experiment,
    Namespace,
    Pipeline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiRelationship {
    Owner,
    Creator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResourceKey {
    #[serde(rename = "type")]
    pub kind: ApiResourceType,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResourceReference {
    pub key: ApiResourceKey,
    pub relationship: ApiRelationship,
}

impl ApiResourceReference {
    pub fn owner(kind: ApiResourceType, id: impl Into<String>) -> Self {
        Self { key: ApiResourceKey { kind, id: id.into() },
               relationship: ApiRelationship::Owner }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiParameter {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiPipelineSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_manifest: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ApiParameter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiExperiment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource_references: Vec<ApiResourceReference>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApiListExperimentsResponse {
    #[serde(default)]
    pub experiments: Vec<ApiExperiment>,
    #[serde(default)]
    pub total_size: i64,
    #[serde(default)]
    pub next_page_token: String,
}

/// Pipeline registrada en el servicio.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiPipeline {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_manifest: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ApiParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiRun {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub pipeline_spec: ApiPipelineSpec,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource_references: Vec<ApiResourceReference>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ApiRun {
    /// Id del experimento propietario, si la respuesta lo incluye.
    pub fn experiment_id(&self) -> Option<&str> {
        self.resource_references
            .iter()
            .find(|r| r.key.kind == ApiResourceType::Experiment)
            .map(|r| r.key.id.as_str())
    }
}

/// Respuesta de creación/consulta de una run.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApiRunDetail {
    #[serde(default)]
    pub run: ApiRun,
}
