//! `OrchestrationClient`: registro de pipelines y creación de runs.

use chrono::Utc;
use log::{debug, info};
use pipeflow_core::param::render_value;
use pipeflow_core::{bind_arguments, compile, PipelineDefinition, RawArguments};
use serde_json::json;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::http::HttpClient;
use crate::types::{ApiExperiment, ApiHealth, ApiListExperimentsResponse, ApiParameter, ApiPipeline, ApiPipelineSpec,
                   ApiResourceReference, ApiResourceType, ApiRun, ApiRunDetail, API_PREFIX};

/// Experimento usado cuando la ejecución no indica otro.
pub const DEFAULT_EXPERIMENT: &str = "Default";

/// Opciones de una petición de ejecución.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub experiment_name: String,
    /// Nombre de la run. `None`: `"<pipeline> <fecha UTC>"`.
    pub run_name: Option<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { experiment_name: DEFAULT_EXPERIMENT.to_string(),
               run_name: None }
    }
}

/// Referencia a la run creada. El resultado de la ejecución pertenece al
/// servicio; el cliente no lo observa.
#[derive(Debug, Clone, PartialEq)]
pub struct RunHandle {
    pub run_id: Uuid,
    pub run_name: String,
    pub experiment_id: Uuid,
    pub pipeline_name: String,
    pub arguments: Vec<(String, String)>,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct OrchestrationClient {
    http: HttpClient,
    config: ClientConfig,
}

impl OrchestrationClient {
    /// Construye el handle y comprueba que el servicio responde.
    pub async fn connect(config: ClientConfig) -> ClientResult<Self> {
        let http = HttpClient::new(&config)?;
        let client = Self { http, config };
        let health = client.health().await?;
        info!("connected to {} (version {}, multi_user={})",
              client.http.base_url(),
              health.tag_name.as_deref().unwrap_or("unknown"),
              health.multi_user);
        Ok(client)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Libera el handle. Consumirlo impide usarlo después de cerrado.
    pub fn close(self) {
        info!("closing connection to {}", self.http.base_url());
    }

    pub async fn health(&self) -> ClientResult<ApiHealth> {
        self.http.get(&format!("{API_PREFIX}/healthz"), &[]).await
    }

    /// URL de la vista de detalle de una run en la UI del servicio.
    pub fn run_url(&self, run_id: Uuid) -> String {
        format!("{}/#/runs/details/{}", self.http.base_url(), run_id)
    }

    /// Busca un experimento por nombre exacto.
    pub async fn find_experiment(&self, name: &str) -> ClientResult<Option<ApiExperiment>> {
        let filter = json!({
            "predicates": [{ "key": "name", "op": "EQUALS", "string_value": name }]
        }).to_string();
        let mut query: Vec<(&str, &str)> = vec![("filter", filter.as_str())];
        if let Some(ns) = &self.config.namespace {
            query.push(("resource_reference_key.type", "NAMESPACE"));
            query.push(("resource_reference_key.id", ns.as_str()));
        }
        let list: ApiListExperimentsResponse = self.http.get(&format!("{API_PREFIX}/experiments"), &query).await?;
        Ok(list.experiments.into_iter().find(|e| e.name == name))
    }

    pub async fn create_experiment(&self, name: &str, description: &str) -> ClientResult<ApiExperiment> {
        let mut body = ApiExperiment { name: name.to_string(),
                                       description: description.to_string(),
                                       ..Default::default() };
        if let Some(ns) = &self.config.namespace {
            body.resource_references.push(ApiResourceReference::owner(ApiResourceType::Namespace, ns.clone()));
        }
        let created: ApiExperiment = self.http.post(&format!("{API_PREFIX}/experiments"), &body).await?;
        info!("created experiment '{}'", created.name);
        Ok(created)
    }

    /// Devuelve el experimento `name`, creándolo si no existe.
    pub async fn ensure_experiment(&self, name: &str) -> ClientResult<ApiExperiment> {
        match self.find_experiment(name).await? {
            Some(existing) => {
                debug!("reusing experiment '{}'", name);
                Ok(existing)
            }
            None => self.create_experiment(name, "").await,
        }
    }

    /// Registra `pipeline` en el servicio.
    ///
    /// Registrar dos veces el mismo nombre no es idempotente: el servicio
    /// responde 409 y el cliente devuelve `ClientError::Conflict`.
    pub async fn upload_pipeline(&self, pipeline: &PipelineDefinition) -> ClientResult<ApiPipeline> {
        let manifest = compile(pipeline);
        let parameters = pipeline.params()
                                 .iter()
                                 .map(|p| ApiParameter { name: p.name.clone(),
                                                         value: p.default
                                                                 .map(|d| render_value(p.ty, d))
                                                                 .unwrap_or_default() })
                                 .collect();
        let body = ApiPipeline { name: pipeline.name().to_string(),
                                 description: pipeline.description().to_string(),
                                 workflow_manifest: Some(manifest.to_string()),
                                 parameters,
                                 ..Default::default() };
        let created: ApiPipeline = self.http.post(&format!("{API_PREFIX}/pipelines"), &body).await?;
        info!("registered pipeline '{}' (id {})",
              created.name,
              created.id.as_deref().unwrap_or("unknown"));
        Ok(created)
    }

    pub async fn create_run(&self, run: &ApiRun) -> ClientResult<ApiRun> {
        let detail: ApiRunDetail = self.http.post(&format!("{API_PREFIX}/runs"), run).await?;
        Ok(detail.run)
    }

    pub async fn get_run(&self, run_id: Uuid) -> ClientResult<ApiRun> {
        let detail: ApiRunDetail = self.http.get(&format!("{API_PREFIX}/runs/{run_id}"), &[]).await?;
        Ok(detail.run)
    }

    /// Envía `pipeline` con `overrides` y solicita una única run.
    ///
    /// Los argumentos se validan y la pipeline se compila antes de cualquier
    /// llamada de red; el manifest viaja embebido en la petición, así que no
    /// requiere un registro previo.
    pub async fn create_run_from_pipeline(&self,
                                          pipeline: &PipelineDefinition,
                                          overrides: &RawArguments,
                                          options: &RunOptions)
                                          -> ClientResult<RunHandle> {
        let arguments = bind_arguments(pipeline, overrides)?.rendered();
        let manifest = compile(pipeline);

        let experiment = self.ensure_experiment(&options.experiment_name).await?;
        let experiment_id =
            experiment.id
                      .ok_or_else(|| ClientError::UnexpectedResponse(format!("experiment '{}' has no id", experiment.name)))?;

        let run_name = options.run_name.clone().unwrap_or_else(|| {
                                                    format!("{} {}",
                                                            pipeline.name(),
                                                            Utc::now().format("%Y-%m-%d %H-%M-%S"))
                                                });
        let request = ApiRun { name: run_name.clone(),
                               description: pipeline.description().to_string(),
                               pipeline_spec: ApiPipelineSpec { pipeline_name: Some(pipeline.name().to_string()),
                                                                workflow_manifest: Some(manifest.to_string()),
                                                                parameters: arguments.iter()
                                                                                     .map(|(name, value)| {
                                                                                         ApiParameter { name: name.clone(),
                                                                                                        value: value.clone() }
                                                                                     })
                                                                                     .collect(),
                                                                ..Default::default() },
                               resource_references: vec![ApiResourceReference::owner(ApiResourceType::Experiment,
                                                                                     experiment_id.to_string())],
                               ..Default::default() };

        let created = self.create_run(&request).await?;
        let run_id = created.id
                            .ok_or_else(|| ClientError::UnexpectedResponse("created run has no id".to_string()))?;
        let url = self.run_url(run_id);
        info!("run '{}' created for pipeline '{}': {}", run_name, pipeline.name(), url);

        Ok(RunHandle { run_id,
                       run_name: if created.name.is_empty() { run_name } else { created.name },
                       experiment_id,
                       pipeline_name: pipeline.name().to_string(),
                       arguments,
                       url })
    }
}
