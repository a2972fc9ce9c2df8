//! Configuración de conexión del cliente.

use std::time::Duration;

use reqwest::Url;

use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// URL base del servicio (`http://<host>:<port>`).
    pub host: String,
    /// Token opcional enviado como `Authorization: Bearer`.
    pub api_token: Option<String>,
    /// Namespace para despliegues multi-usuario.
    pub namespace: Option<String>,
    /// Timeout por petición. `None`: sin timeout.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into(),
               api_token: None,
               namespace: None,
               timeout: None }
    }

    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// URL base sin `/` final; falla si no es una URL http(s) válida.
    pub fn base_url(&self) -> ClientResult<String> {
        let url = Url::parse(self.host.trim()).map_err(|e| {
                                                  ClientError::Configuration(format!("invalid host '{}': {e}",
                                                                                     self.host))
                                              })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::Configuration(format!("unsupported scheme '{}' in host '{}'",
                                                          url.scheme(),
                                                          self.host)));
        }
        Ok(url.as_str().trim_end_matches('/').to_string())
    }
}
