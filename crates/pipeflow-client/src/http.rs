//! Cliente HTTP/JSON de bajo nivel.
//!
//! Construye URLs a partir de la URL base, añade la cabecera de
//! autenticación y traduce respuestas no exitosas a `ClientError`.

use log::{debug, error};
use reqwest::{header, Client as ReqwestClient, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    base_url: String,
    api_token: Option<String>,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let base_url = config.base_url()?;
        let mut builder = ReqwestClient::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()
                            .map_err(|e| ClientError::Configuration(e.to_string()))?;
        Ok(Self { client,
                  base_url,
                  api_token: config.api_token.clone() })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<T>(&self, path: &str, query: &[(&str, &str)]) -> ClientResult<T>
        where T: DeserializeOwned
    {
        self.request(Method::GET, path, query, None::<&()>).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
        where B: Serialize,
              T: DeserializeOwned
    {
        self.request(Method::POST, path, &[], Some(body)).await
    }

    async fn request<B, T>(&self, method: Method, path: &str, query: &[(&str, &str)], body: Option<&B>) -> ClientResult<T>
        where B: Serialize,
              T: DeserializeOwned
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let mut request = self.client.request(method, &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        request = self.add_auth_header(request);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
                                                error!("request to {url} failed: {e}");
                                                if e.is_timeout() {
                                                    ClientError::Timeout
                                                } else {
                                                    ClientError::Connection(e.to_string())
                                                }
                                            })?;
        Self::handle_response(response).await
    }

    fn add_auth_header(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => request.header(header::AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    async fn handle_response<T>(response: Response) -> ClientResult<T>
        where T: DeserializeOwned
    {
        let status = response.status();
        let body = response.text()
                           .await
                           .map_err(|e| ClientError::Connection(e.to_string()))?;

        if status.is_success() {
            debug!("response {}: {} bytes", status, body.len());
            // Algunas respuestas exitosas llegan sin cuerpo.
            let body = if body.trim().is_empty() { "{}" } else { body.as_str() };
            serde_json::from_str(body).map_err(|e| {
                                          error!("failed to decode response body: {e}");
                                          ClientError::UnexpectedResponse(e.to_string())
                                      })
        } else {
            error!("request failed with status {}: {}", status.as_u16(), body);
            Err(ClientError::from_status(status.as_u16(), body))
        }
    }
}
