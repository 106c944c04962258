use sqlx::SqlitePool;

use crate::config::Config;
use crate::triage::TriageService;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub triage: TriageService,
}

// Note: FromRow is needed for runtime query_as (without DATABASE_URL at compile time)

/// One row per processed submission. Records are only ever inserted and
/// deleted; there is no update path.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct UploadRecord {
    pub id: String,
    pub filename: String,
    pub extracted_text: String,
    pub category: String,
    pub auto_response: String,
    pub raw_result: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// API Request/Response types
//
// The wire field names (texto_extraido, categoria, ...) are kept for
// compatibility with the existing frontend clients.

#[derive(Debug, serde::Serialize)]
pub struct UploadResponse {
    pub id: String,
    pub filename: String,
    #[serde(rename = "texto_extraido")]
    pub extracted_text: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "resposta_automatica")]
    pub auto_response: String,
    #[serde(rename = "resultado_itzam")]
    pub raw_result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl UploadResponse {
    /// Shape returned by list/get, including the creation timestamp.
    pub fn from_record(record: UploadRecord) -> Self {
        Self {
            created_at: Some(record.created_at),
            id: record.id,
            filename: record.filename,
            extracted_text: record.extracted_text,
            category: record.category,
            auto_response: record.auto_response,
            raw_result: record.raw_result,
        }
    }

    /// Shape returned by POST /upload, which historically omits created_at.
    pub fn from_new_record(record: UploadRecord) -> Self {
        Self {
            created_at: None,
            ..Self::from_record(record)
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct UploadsListResponse {
    pub uploads: Vec<UploadResponse>,
}

#[derive(Debug, serde::Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub database: String,
}
