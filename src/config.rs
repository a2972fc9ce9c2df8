//! Configuración de envío.
//!
//! Se carga desde variables de entorno (con `.env` opcional, leído una sola
//! vez). Los flags de la CLI sobreescriben estos valores en `main`.

use std::env;
use std::time::Duration;

use dotenvy::dotenv;
use once_cell::sync::Lazy;
use pipeflow_client::{ClientConfig, RunOptions, DEFAULT_EXPERIMENT};
use pipeflow_core::constants::DEFAULT_STEP_IMAGE;
use pipeflow_core::{parse_assignments, RawArguments};

use crate::errors::AppError;

pub const DEFAULT_HOST: &str = "http://localhost:8888";
/// Argumentos enviados cuando no se configuran otros.
pub const DEFAULT_ARGS: &str = "a=3,b=4";

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitConfig {
    pub host: String,
    pub api_token: Option<String>,
    pub namespace: Option<String>,
    pub experiment: String,
    pub run_name: Option<String>,
    pub arguments: RawArguments,
    pub step_image: String,
    pub timeout: Option<Duration>,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self { host: DEFAULT_HOST.to_string(),
               api_token: None,
               namespace: None,
               experiment: DEFAULT_EXPERIMENT.to_string(),
               run_name: None,
               arguments: parse_argument_list(DEFAULT_ARGS).unwrap_or_default(),
               step_image: DEFAULT_STEP_IMAGE.to_string(),
               timeout: None }
    }
}

impl SubmitConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Lazy::force(&DOTENV_LOADED);
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero leyendo de `lookup`; variables vacías cuentan
    /// como ausentes.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
        where F: Fn(&str) -> Option<String>
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let arguments = match var("PIPEFLOW_ARGS") {
            Some(list) => parse_argument_list(&list)?,
            None => defaults.arguments,
        };
        let timeout = var("PIPEFLOW_TIMEOUT_SECS").map(|v| parse_timeout(&v)).transpose()?;

        Ok(Self { host: var("PIPEFLOW_HOST").unwrap_or(defaults.host),
                  api_token: var("PIPEFLOW_API_TOKEN"),
                  namespace: var("PIPEFLOW_NAMESPACE"),
                  experiment: var("PIPEFLOW_EXPERIMENT").unwrap_or(defaults.experiment),
                  run_name: var("PIPEFLOW_RUN_NAME"),
                  arguments,
                  step_image: var("PIPEFLOW_STEP_IMAGE").unwrap_or(defaults.step_image),
                  timeout })
    }

    pub fn client_config(&self) -> ClientConfig {
        let mut cfg = ClientConfig::new(self.host.clone());
        if let Some(token) = &self.api_token {
            cfg = cfg.with_api_token(token.clone());
        }
        if let Some(namespace) = &self.namespace {
            cfg = cfg.with_namespace(namespace.clone());
        }
        if let Some(timeout) = self.timeout {
            cfg = cfg.with_timeout(timeout);
        }
        cfg
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions { experiment_name: self.experiment.clone(),
                     run_name: self.run_name.clone() }
    }
}

/// Parsea `"a=3,b=4"`.
pub fn parse_argument_list(list: &str) -> Result<RawArguments, AppError> {
    Ok(parse_assignments(list.split(','))?)
}

pub fn parse_timeout(value: &str) -> Result<Duration, AppError> {
    value.parse::<u64>()
         .map(Duration::from_secs)
         .map_err(|_| AppError::Config(format!("PIPEFLOW_TIMEOUT_SECS inválido: '{value}'")))
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use serde_json::json;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn defaults_submit_three_and_four_to_localhost() {
        let cfg = SubmitConfig::from_lookup(lookup(&[])).expect("config");
        assert_eq!(cfg.host, "http://localhost:8888");
        assert_eq!(cfg.experiment, "Default");
        assert_eq!(cfg.arguments.get("a"), Some(&json!("3")));
        assert_eq!(cfg.arguments.get("b"), Some(&json!("4")));
        assert_eq!(cfg.step_image, DEFAULT_STEP_IMAGE);
        assert_eq!(cfg.timeout, None);
    }

    #[test]
    fn reads_every_variable() {
        let cfg = SubmitConfig::from_lookup(lookup(&[("PIPEFLOW_HOST", "https://kfp.internal"),
                                                     ("PIPEFLOW_API_TOKEN", "tok"),
                                                     ("PIPEFLOW_NAMESPACE", "team-a"),
                                                     ("PIPEFLOW_EXPERIMENT", "nightly"),
                                                     ("PIPEFLOW_RUN_NAME", "r1"),
                                                     ("PIPEFLOW_ARGS", "a=10, b=2.5"),
                                                     ("PIPEFLOW_STEP_IMAGE", "registry/pipeflow:1"),
                                                     ("PIPEFLOW_TIMEOUT_SECS", "30")])).expect("config");
        assert_eq!(cfg.host, "https://kfp.internal");
        assert_eq!(cfg.api_token.as_deref(), Some("tok"));
        assert_eq!(cfg.namespace.as_deref(), Some("team-a"));
        assert_eq!(cfg.run_options().experiment_name, "nightly");
        assert_eq!(cfg.run_options().run_name.as_deref(), Some("r1"));
        assert_eq!(cfg.arguments.get("b"), Some(&json!("2.5")));
        let client = cfg.client_config();
        assert_eq!(client.host, "https://kfp.internal");
        assert_eq!(client.api_token.as_deref(), Some("tok"));
        assert_eq!(client.namespace.as_deref(), Some("team-a"));
        assert_eq!(client.timeout, Some(Duration::from_secs(30)));
        assert_eq!(cfg.step_image, "registry/pipeflow:1");
    }

    #[test]
    fn empty_variables_fall_back_to_defaults() {
        let cfg = SubmitConfig::from_lookup(lookup(&[("PIPEFLOW_HOST", "  "), ("PIPEFLOW_API_TOKEN", "")])).expect("config");
        assert_eq!(cfg.host, DEFAULT_HOST);
        assert_eq!(cfg.api_token, None);
    }

    #[test]
    fn rejects_malformed_values() {
        let err = SubmitConfig::from_lookup(lookup(&[("PIPEFLOW_ARGS", "a3")])).unwrap_err();
        assert!(matches!(err, AppError::Core(_)));

        let err = SubmitConfig::from_lookup(lookup(&[("PIPEFLOW_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
