//! Upload triage pipeline.
//!
//! Composes text extraction, the Itzam workflow call, and tolerant response
//! parsing into one persisted `UploadRecord`. Provider failures never abort
//! a request: they are recorded as human-readable text in `raw_result` and
//! the record is stored anyway. The only fatal condition is a UTF-8 decode
//! failure during extraction.

pub mod parser;

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::ItzamConfig;
use crate::db::uploads::UploadStore;
use crate::extraction::extract_text;
use crate::llm::{ItzamClient, ItzamError};
use crate::models::UploadRecord;
use crate::types::{AppError, AppResult};
use parser::parse_classification;

/// Sentinel values stored when AI processing is disabled. Distinguishable
/// from an actual provider call failure by their fixed text.
pub const CATEGORY_UNCLASSIFIED: &str = "Não classificado";
pub const AUTO_RESPONSE_UNAVAILABLE: &str = "Resposta automática não disponível";
pub const AI_DISABLED_MESSAGE: &str =
    "Funcionalidade de IA desabilitada - ITZAM_API_KEY não configurada";

/// The classifier dependency: either a configured provider client or an
/// explicit disabled marker (missing credential at process start).
#[derive(Clone)]
pub enum ClassifierHandle {
    Configured(ItzamClient),
    Disabled,
}

impl ClassifierHandle {
    pub fn from_config(config: &ItzamConfig) -> anyhow::Result<Self> {
        match &config.api_key {
            Some(api_key) => {
                let client = ItzamClient::new(
                    api_key,
                    &config.base_url,
                    std::time::Duration::from_secs(config.timeout_secs),
                )?;
                Ok(Self::Configured(client))
            }
            None => {
                warn!("ITZAM_API_KEY not configured, AI processing disabled");
                Ok(Self::Disabled)
            }
        }
    }
}

#[derive(Clone)]
pub struct TriageService {
    classifier: ClassifierHandle,
    workflow_slug: String,
}

impl TriageService {
    pub fn new(classifier: ClassifierHandle, workflow_slug: impl Into<String>) -> Self {
        Self {
            classifier,
            workflow_slug: workflow_slug.into(),
        }
    }

    /// Run the full upload pipeline and persist the resulting record.
    pub async fn process(
        &self,
        pool: &SqlitePool,
        filename: &str,
        content: &[u8],
    ) -> AppResult<UploadRecord> {
        info!(filename, size = content.len(), "Processing upload");

        let extracted_text =
            extract_text(filename, content).map_err(|e| AppError::InvalidRequest(e.to_string()))?;

        let (category, auto_response, raw_result) = self.classify(&extracted_text).await;

        let record = UploadRecord {
            id: Uuid::new_v4().to_string(),
            filename: filename.to_string(),
            extracted_text,
            category,
            auto_response,
            raw_result,
            created_at: Utc::now(),
        };
        UploadStore::insert(pool, &record).await?;

        info!(id = %record.id, category = %record.category, "Upload processed");
        Ok(record)
    }

    async fn classify(&self, extracted_text: &str) -> (String, String, String) {
        let client = match &self.classifier {
            ClassifierHandle::Configured(client) => client,
            ClassifierHandle::Disabled => {
                return (
                    CATEGORY_UNCLASSIFIED.to_string(),
                    AUTO_RESPONSE_UNAVAILABLE.to_string(),
                    AI_DISABLED_MESSAGE.to_string(),
                );
            }
        };

        match client.generate_text(&self.workflow_slug, extracted_text).await {
            Ok(response_text) => {
                let classification = parse_classification(&response_text);
                if classification.category.is_empty() {
                    warn!("No structured classification in provider response, storing raw text");
                }
                (
                    classification.category,
                    classification.auto_response,
                    classification.canonical_text,
                )
            }
            Err(ItzamError::WorkflowNotFound) => {
                error!(workflow = %self.workflow_slug, "Itzam workflow not found");
                (
                    String::new(),
                    String::new(),
                    format!(
                        "Erro: Workflow '{}' não encontrado. Verifique se o workflow existe na sua conta do Itzam.",
                        self.workflow_slug
                    ),
                )
            }
            Err(e) => {
                error!(error = %e, "Itzam call failed");
                (
                    String::new(),
                    String::new(),
                    format!("Erro ao processar com Itzam: {e}"),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn memory_pool() -> SqlitePool {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        db::init_schema(&pool).await.unwrap();
        pool
    }

    fn disabled_service() -> TriageService {
        TriageService::new(ClassifierHandle::Disabled, "automail")
    }

    #[tokio::test]
    async fn disabled_classifier_stores_sentinel_values() {
        let pool = memory_pool().await;
        let record = disabled_service()
            .process(&pool, "mensagem.txt", "conteúdo do email".as_bytes())
            .await
            .unwrap();

        assert_eq!(record.extracted_text, "conteúdo do email");
        assert_eq!(record.category, CATEGORY_UNCLASSIFIED);
        assert_eq!(record.auto_response, AUTO_RESPONSE_UNAVAILABLE);
        assert_eq!(record.raw_result, AI_DISABLED_MESSAGE);

        let stored = UploadStore::get(&pool, &record.id).await.unwrap();
        assert!(stored.is_some());
    }

    #[tokio::test]
    async fn decode_failure_creates_no_record() {
        let pool = memory_pool().await;
        let result = disabled_service()
            .process(&pool, "broken.txt", &[0xff, 0xfe])
            .await;

        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
        assert!(UploadStore::list(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn configured_classifier_parses_workflow_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/generate/text")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"text": "{\"category\": \"invoice\", \"auto_response\": \"thanks\"}"}"#)
            .create_async()
            .await;

        let pool = memory_pool().await;
        let client =
            ItzamClient::new("key", &server.url(), std::time::Duration::from_secs(5)).unwrap();
        let service = TriageService::new(ClassifierHandle::Configured(client), "automail");

        let record = service
            .process(&pool, "fatura.txt", b"please find attached")
            .await
            .unwrap();
        assert_eq!(record.category, "invoice");
        assert_eq!(record.auto_response, "thanks");
        assert!(record.raw_result.contains("\"category\": \"invoice\""));
    }

    #[tokio::test]
    async fn workflow_not_found_is_recorded_not_fatal() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/generate/text")
            .with_status(404)
            .create_async()
            .await;

        let pool = memory_pool().await;
        let client =
            ItzamClient::new("key", &server.url(), std::time::Duration::from_secs(5)).unwrap();
        let service = TriageService::new(ClassifierHandle::Configured(client), "automail");

        let record = service.process(&pool, "email.txt", b"hello").await.unwrap();
        assert_eq!(record.category, "");
        assert_eq!(record.auto_response, "");
        assert!(record.raw_result.contains("Workflow 'automail' não encontrado"));
    }

    #[tokio::test]
    async fn provider_error_is_recorded_not_fatal() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/generate/text")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let pool = memory_pool().await;
        let client =
            ItzamClient::new("key", &server.url(), std::time::Duration::from_secs(5)).unwrap();
        let service = TriageService::new(ClassifierHandle::Configured(client), "automail");

        let record = service.process(&pool, "email.txt", b"hello").await.unwrap();
        assert!(record.raw_result.starts_with("Erro ao processar com Itzam:"));
        assert!(record.raw_result.contains("boom"));
    }
}
