// Automail - document upload and AI email triage service

pub mod config;
pub mod db;
pub mod extraction;
pub mod llm;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod triage;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
