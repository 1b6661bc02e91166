use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tourgid_core::Catalog;
use tourgid_gateway::{
    CompletionBackend, OpenAiClient, OpenAiConfig, ScriptedClient, DEFAULT_BASE_URL,
    DEFAULT_MODEL,
};
use tracing::{info, warn};

const DEFAULT_BIND: &str = "0.0.0.0:8000";
const DEFAULT_OPENAI_TIMEOUT_SECONDS: u64 = 20;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub openai_timeout: Duration,
    pub catalog_path: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            openai_api_key: None,
            openai_model: DEFAULT_MODEL.to_string(),
            openai_base_url: DEFAULT_BASE_URL.to_string(),
            openai_timeout: Duration::from_secs(DEFAULT_OPENAI_TIMEOUT_SECONDS),
            catalog_path: None,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            bind: env::var("TOURGID_BIND").unwrap_or(defaults.bind),
            openai_api_key: env::var("OPENAI_API_KEY")
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
            openai_model: env::var("TOURGID_OPENAI_MODEL").unwrap_or(defaults.openai_model),
            openai_base_url: env::var("TOURGID_OPENAI_BASE_URL")
                .unwrap_or(defaults.openai_base_url),
            openai_timeout: env::var("TOURGID_OPENAI_TIMEOUT_SECONDS")
                .ok()
                .and_then(|value| value.trim().parse::<u64>().ok())
                .map(|value| Duration::from_secs(value.clamp(1, 300)))
                .unwrap_or(defaults.openai_timeout),
            catalog_path: env::var("TOURGID_CATALOG_PATH")
                .ok()
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn load_catalog(&self) -> Result<Catalog> {
        match &self.catalog_path {
            Some(path) => Catalog::from_json_file(path)
                .with_context(|| format!("failed loading catalog from {}", path.display())),
            None => Catalog::seeded().context("embedded catalog is invalid"),
        }
    }

    pub fn completion_backend(&self) -> Result<CompletionBackend> {
        let Some(api_key) = self.openai_api_key.as_ref() else {
            warn!("OPENAI_API_KEY is not set; voice queries will use the offline fallback");
            return Ok(CompletionBackend::Scripted(ScriptedClient::outage(
                "OPENAI_API_KEY is not set",
            )));
        };

        let client = OpenAiClient::new(OpenAiConfig {
            api_key: api_key.clone(),
            model: self.openai_model.clone(),
            base_url: self.openai_base_url.clone(),
            timeout: self.openai_timeout,
        })
        .context("failed to build completion client")?;
        info!(model = %client.model(), "completion client configured");

        Ok(CompletionBackend::OpenAi(client))
    }
}
