use std::error::Error as StdError;
use std::fmt;

use async_trait::async_trait;
use nd_core::{AnalysisResult, Error, ModelConfig, Result, ToneAnalyzer};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::classify::{status_failure, transport_failure};
use crate::parse::{parse_reply, PARSE_FAILED_EXPLANATION};
use crate::prompt::analysis_prompt;

const SERVICE: &str = "Ollama";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Deserialize)]
struct OllamaError {
    error: String,
}

pub struct OllamaAnalyzer {
    client: Client,
    endpoint: Url,
    server: String,
    model_name: String,
}

impl fmt::Debug for OllamaAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OllamaAnalyzer")
            .field("client", &"<reqwest::Client>")
            .field("endpoint", &self.endpoint.as_str())
            .field("model_name", &self.model_name)
            .finish()
    }
}

impl OllamaAnalyzer {
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            endpoint: config.generate_endpoint()?,
            server: config.base_url.to_string(),
            model_name: config.model_name.clone(),
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Send one non-streaming generate request and return the model's raw text.
    ///
    /// Network failures come back as `Error::Transport` with the full cause chain,
    /// non-success statuses as `Error::Remote`.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            model: &self.model_name,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Transport(error_chain(&e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(error_chain(&e)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<OllamaError>(&body).ok().map(|e| e.error);
            return Err(Error::remote(SERVICE, status.as_u16(), message));
        }

        serde_json::from_str::<GenerateResponse>(&body)
            .map(|r| r.response)
            .map_err(|_| Error::MalformedResponse(body))
    }
}

#[async_trait]
impl ToneAnalyzer for OllamaAnalyzer {
    fn name(&self) -> &str {
        SERVICE
    }

    async fn analyze(&self, text: &str) -> AnalysisResult {
        let prompt = analysis_prompt(text);
        match self.generate(&prompt).await {
            Ok(reply) => {
                tracing::debug!(chars = reply.len(), "Model replied");
                parse_reply(&reply).into_result()
            }
            Err(Error::Remote { status, message, .. }) => {
                tracing::warn!(status, ?message, model = %self.model_name, "Model server rejected request");
                status_failure(status, message.as_deref(), &self.server, &self.model_name)
            }
            Err(Error::MalformedResponse(body)) => {
                tracing::warn!("Model server sent a body without a response field");
                AnalysisResult::unknown(PARSE_FAILED_EXPLANATION, body)
            }
            Err(e) => {
                tracing::warn!(error = %e, server = %self.server, "Model server unreachable");
                transport_failure(&e.to_string(), &self.server, &self.model_name)
            }
        }
    }
}

fn error_chain(error: &dyn StdError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
