// Document Analyzer - AI summaries of uploaded PDF, DOCX and text documents

pub mod config;
pub mod models;
pub mod types;
pub mod extraction;
pub mod llm;
pub mod analysis;
pub mod storage;
pub mod routes;
pub mod middleware;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
