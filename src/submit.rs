//! Envío de la "Addition pipeline" al servicio de orquestación.
//!
//! Cada operación abre su propio handle de cliente y lo cierra al terminar,
//! también cuando la operación falla.

use log::info;
use pipeflow_client::{ApiPipeline, OrchestrationClient, RunHandle};
use pipeflow_steps::addition_pipeline;

use crate::config::SubmitConfig;
use crate::errors::AppError;

/// Solicita una run de la pipeline con los argumentos configurados.
///
/// La pipeline se construye y los argumentos se validan antes de conectar;
/// un argumento inválido no genera tráfico de red.
pub async fn submit(config: &SubmitConfig) -> Result<RunHandle, AppError> {
    let pipeline = addition_pipeline(&config.step_image)?;
    pipeflow_core::bind_arguments(&pipeline, &config.arguments)?;

    let client = OrchestrationClient::connect(config.client_config()).await?;
    let result = client.create_run_from_pipeline(&pipeline, &config.arguments, &config.run_options())
                       .await;
    client.close();

    let handle = result?;
    info!("run {} submitted ({})", handle.run_id, handle.url);
    Ok(handle)
}

/// Registra la definición de la pipeline en el servicio.
pub async fn register(config: &SubmitConfig) -> Result<ApiPipeline, AppError> {
    let pipeline = addition_pipeline(&config.step_image)?;

    let client = OrchestrationClient::connect(config.client_config()).await?;
    let result = client.upload_pipeline(&pipeline).await;
    client.close();

    Ok(result?)
}
