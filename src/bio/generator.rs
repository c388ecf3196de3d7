//! Bio generation through an Ollama-compatible HTTP endpoint

use crate::bio::prompts::{build_payload, PromptTemplate};
use crate::bio::BioRequest;
use crate::config::BioConfig;
use crate::error::{Result, SkillMatcherError};
use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

#[async_trait]
pub trait BioGenerator: Send + Sync {
    async fn generate(&self, request: &BioRequest) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

pub struct OllamaBioGenerator {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    template: PromptTemplate,
}

impl std::fmt::Debug for OllamaBioGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OllamaBioGenerator")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OllamaBioGenerator {
    pub fn new(config: &BioConfig) -> Result<Self> {
        let template = PromptTemplate::load(config.prompt_path.as_deref())?;
        Self::with_template(config, template)
    }

    pub fn with_template(config: &BioConfig, template: PromptTemplate) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs.max(1));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SkillMatcherError::Configuration(format!("bio http client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            template,
        })
    }
}

fn classify(err: reqwest::Error) -> SkillMatcherError {
    if err.is_timeout() {
        SkillMatcherError::BioTimeout(
            "Request to the bio service timed out. Please try again later.".to_string(),
        )
    } else if err.is_connect() {
        SkillMatcherError::BioConnection(format!("Service might be unavailable: {}", err))
    } else {
        SkillMatcherError::BioGeneration(err.to_string())
    }
}

#[async_trait]
impl BioGenerator for OllamaBioGenerator {
    async fn generate(&self, request: &BioRequest) -> Result<String> {
        let start_time = Instant::now();
        let payload = build_payload(request, &self.template);
        let body = GenerateRequest {
            model: &self.model,
            prompt: serde_json::to_string(&payload)?,
            stream: false,
        };

        debug!("Posting bio request to {} ({} prompt bytes)", self.endpoint, body.prompt.len());

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(classify)?
            .error_for_status()
            .map_err(classify)?;

        let parsed: GenerateResponse = response.json().await.map_err(classify)?;
        if parsed.response.trim().is_empty() {
            return Err(SkillMatcherError::BioGeneration(
                "Empty response from bio service".to_string(),
            ));
        }

        info!("Bio generated with {} in {:.2?}", self.model, start_time.elapsed());
        Ok(parsed.response)
    }
}
