//! Itzam provider client.
//!
//! One synchronous "generate text for workflow X given input text" call
//! against a pre-registered workflow. The client is constructed once at
//! process start from the configured credential.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ItzamError {
    /// The provider signaled that the requested workflow does not exist.
    #[error("workflow not found")]
    WorkflowNotFound,

    #[error("Itzam API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Itzam request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct ItzamClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct GenerateTextRequest<'a> {
    #[serde(rename = "workflowSlug")]
    workflow_slug: &'a str,
    input: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateTextResponse {
    text: String,
}

impl ItzamClient {
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, ItzamError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Run the named workflow over `input` and return the generated text.
    pub async fn generate_text(&self, workflow_slug: &str, input: &str) -> Result<String, ItzamError> {
        let url = format!("{}/generate/text", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&GenerateTextRequest {
                workflow_slug,
                input,
                stream: false,
            })
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ItzamError::WorkflowNotFound);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ItzamError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: GenerateTextResponse = response.json().await?;
        info!(workflow = workflow_slug, response_len = body.text.len(), "Itzam generation completed");
        Ok(body.text)
    }
}
