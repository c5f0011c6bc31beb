//! Sinapsi HTTP server.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/ask` | Answer a question (`{question, mode?, context?, params?}`) |
//! | `GET`  | `/api/ask?q=...` | Answer a question in generic mode |
//! | `GET`  | `/health` | Health check (version, rule count, provider) |
//!
//! # Error Contract
//!
//! Only a malformed request body is reported as a failure:
//!
//! ```json
//! { "error": true, "answer": "Richiesta non valida.", "detail": "..." }
//! ```
//!
//! Every other problem degrades into a normal answer.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so the wizard can be
//! served from another host.

mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use sinapsi_answer::AnswerPipeline;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared state passed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<AnswerPipeline>,
}

/// Build the application router.
pub fn router(pipeline: Arc<AnswerPipeline>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/ask", post(routes::ask_post).get(routes::ask_get))
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(AppState { pipeline })
}

/// Start the server on `bind` and serve until the process is terminated.
pub async fn run_server(bind: &str, pipeline: Arc<AnswerPipeline>) -> anyhow::Result<()> {
    let app = router(pipeline);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!("Sinapsi listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
