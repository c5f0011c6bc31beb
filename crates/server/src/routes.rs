//! Route handlers.

use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use sinapsi_answer::{AskInput, AskMode, WizardParams};

const MALFORMED_REQUEST_MESSAGE: &str = "Richiesta non valida.";

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: bool,
    answer: String,
    detail: String,
}

fn malformed_request(detail: impl Into<String>) -> Response {
    let body = ErrorBody {
        error: true,
        answer: MALFORMED_REQUEST_MESSAGE.to_string(),
        detail: detail.into(),
    };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

// ============ /api/ask ============

#[derive(Debug, Deserialize)]
pub(crate) struct AskRequest {
    #[serde(default)]
    question: String,

    #[serde(default)]
    mode: Option<String>,

    #[serde(default)]
    context: Option<String>,

    /// Raw wizard values, formatted and appended to `context`
    #[serde(default)]
    params: Option<serde_json::Map<String, serde_json::Value>>,
}

impl AskRequest {
    fn into_input(self) -> AskInput {
        let input = AskInput::new(self.question)
            .with_mode(AskMode::parse(self.mode.as_deref()))
            .with_context(self.context.unwrap_or_default());

        match self.params {
            Some(params) => input.with_params(&WizardParams::from_json(&params)),
            None => input,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AskQuery {
    #[serde(default)]
    q: String,
}

/// Handler for `POST /api/ask`.
pub(crate) async fn ask_post(
    State(state): State<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::warn!("Malformed ask request: {}", rejection.body_text());
            return malformed_request(rejection.body_text());
        }
    };

    let outcome = state.pipeline.ask(request.into_input()).await;
    Json(outcome).into_response()
}

/// Handler for `GET /api/ask?q=...`.
pub(crate) async fn ask_get(
    State(state): State<AppState>,
    Query(query): Query<AskQuery>,
) -> Response {
    let outcome = state.pipeline.ask(AskInput::new(query.q)).await;
    Json(outcome).into_response()
}

// ============ GET /health ============

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: String,
    version: String,
    rules: usize,
    provider: String,
}

/// Handler for `GET /health`.
pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        rules: state.pipeline.rules().len(),
        provider: state.pipeline.provider_name().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use crate::router;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use sinapsi_answer::{
        AnswerPipeline, HttpFetcher, Synthesizer, EMPTY_QUESTION_MESSAGE, FALLBACK_MESSAGE,
    };
    use sinapsi_rules::{Rule, RuleMode, RuleStore};
    use sinapsi_search::{create_client, DomainFilter, WebSearchAdapter};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(rules: Vec<Rule>) -> axum::Router {
        let client = create_client("bing", None, None, 6).unwrap();
        let search = WebSearchAdapter::new(client, DomainFilter::new(["tecnaria.com"]), 5);
        let synthesizer = Synthesizer::new(Arc::new(HttpFetcher::new(4).unwrap()));
        let pipeline =
            AnswerPipeline::new(Arc::new(RuleStore::from_rules(rules)), search, synthesizer);
        router(Arc::new(pipeline))
    }

    async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/ask")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(app(vec![]), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["rules"], 0);
        assert_eq!(body["provider"], "bing");
    }

    #[tokio::test]
    async fn test_malformed_body_is_400() {
        let (status, body) = send(app(vec![]), post_json("{ question: ")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], true);
        assert!(body["answer"].is_string());
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn test_post_override_rule_with_attachments() {
        let rule = Rule::new("p560", "p560", RuleMode::Override, "it", "Usare propulsori gialli.")
            .unwrap()
            .with_attachments(vec![sinapsi_rules::Attachment::new(
                "Scheda P560",
                "https://tecnaria.com/p560.pdf",
            )]);

        let (status, body) = send(
            app(vec![rule]),
            post_json(r#"{"question": "Taratura P560?", "mode": "generic"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["answer"]
            .as_str()
            .unwrap()
            .ends_with("Usare propulsori gialli."));
        assert_eq!(body["attachments"][0]["label"], "Scheda P560");
        assert!(body.get("meta").is_none());
    }

    #[tokio::test]
    async fn test_post_ctf_params_produce_meta() {
        let (status, body) = send(
            app(vec![]),
            post_json(
                r#"{"question": "Quanti connettori?", "mode": "CTF",
                    "params": {"h_lamiera": "55", "s_soletta": 60, "vled": "150"}}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["answer"], FALLBACK_MESSAGE);
        assert_eq!(body["meta"]["needs_params"], true);
        assert_eq!(
            body["meta"]["required_keys"],
            serde_json::json!(["cls", "passo_gola", "dir_lamiera", "s_long"])
        );
    }

    #[tokio::test]
    async fn test_get_with_empty_query() {
        let request = Request::builder().uri("/api/ask?q=").body(Body::empty()).unwrap();
        let (status, body) = send(app(vec![]), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["answer"], EMPTY_QUESTION_MESSAGE);
        assert!(body.get("attachments").is_none());
    }
}
