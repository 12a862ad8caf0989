//! HTTP surface: webhook verification and delivery, manual send, health.

use crate::ai::CompletionClient;
use crate::config::Config;
use crate::courier::{self, Dispatch};
use crate::payload::OutboundPayload;
use crate::types::WebhookEvent;
use crate::whatsapp::WhatsAppClient;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::Sha256;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

pub struct AppState {
    pub config: Config,
    pub whatsapp: WhatsAppClient,
    pub ai: CompletionClient,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let whatsapp = WhatsAppClient::new(
            &config.graph_api_base,
            &config.phone_number_id,
            &config.whatsapp_token,
        );
        let ai = CompletionClient::new(
            &config.azure_endpoint,
            &config.azure_api_key,
            &config.azure_deployment,
            &config.azure_api_version,
        );
        Self {
            config,
            whatsapp,
            ai,
        }
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/webhook", get(verify_webhook).post(webhook))
        .route("/test", post(test_send))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", config.port);
    let state = Arc::new(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);
    axum::serve(listener, app(state)).await?;
    Ok(())
}

#[derive(Debug, Deserialize)]
struct VerifyParams {
    #[serde(rename = "hub.mode", default)]
    mode: String,
    #[serde(rename = "hub.verify_token", default)]
    verify_token: String,
    #[serde(rename = "hub.challenge", default)]
    challenge: String,
}

async fn verify_webhook(
    State(state): State<Arc<AppState>>,
    Query(params): Query<VerifyParams>,
) -> Response {
    match courier::verify_handshake(
        &params.mode,
        &params.verify_token,
        &params.challenge,
        &state.config.verify_token,
    ) {
        Ok(challenge) => {
            info!("Webhook verified successfully");
            (StatusCode::OK, challenge).into_response()
        }
        Err(_) => {
            warn!("Webhook verification failed");
            (
                StatusCode::FORBIDDEN,
                Json(json!({"error": "Verification failed"})),
            )
                .into_response()
        }
    }
}

async fn webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(secret) = &state.config.app_secret {
        let signature = headers
            .get("x-hub-signature-256")
            .and_then(|value| value.to_str().ok());
        let valid = signature
            .map(|sig| verify_signature(&body, sig, secret))
            .unwrap_or(false);
        if !valid {
            warn!("Invalid or missing webhook signature");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Invalid signature"})),
            )
                .into_response();
        }
    }

    let event: WebhookEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            error!("Error processing webhook: {}", e);
            return webhook_error(e.to_string());
        }
    };

    match courier::process_event(&state.whatsapp, &state.ai, &event).await {
        Ok(Dispatch::Ignored) => (StatusCode::OK, Json(json!({"status": "ignored"}))).into_response(),
        Ok(Dispatch::Handled) => (StatusCode::OK, Json(json!({"status": "success"}))).into_response(),
        Err(e) => {
            error!("Error processing webhook: {}", e);
            webhook_error(e.to_string())
        }
    }
}

fn webhook_error(message: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"status": "error", "message": message})),
    )
        .into_response()
}

/// Check X-Hub-Signature-256 ("sha256=<hex>") against the raw body.
fn verify_signature(body: &[u8], signature: &str, app_secret: &str) -> bool {
    let Some(hex_digest) = signature.strip_prefix("sha256=") else {
        return false;
    };

    let mut mac = Hmac::<Sha256>::new_from_slice(app_secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(body);
    let expected = hex::encode(mac.finalize().into_bytes());

    hex_digest == expected
}

#[derive(Debug, Deserialize)]
struct TestSendRequest {
    phone_number: Option<String>,
    message: Option<String>,
}

async fn test_send(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TestSendRequest>,
) -> Response {
    let (Some(phone_number), Some(message)) = (request.phone_number, request.message) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "phone_number and message are required"})),
        )
            .into_response();
    };

    match state
        .whatsapp
        .send(&phone_number, OutboundPayload::text(&message))
        .await
    {
        Ok(result) => (
            StatusCode::OK,
            Json(json!({"status": "success", "result": result})),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    service: String,
    version: String,
}

async fn health_check() -> Response {
    let health = HealthResponse {
        status: "healthy".to_string(),
        service: "WhatsApp AI Bot".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    (StatusCode::OK, Json(health)).into_response()
}
