//! HTTP surface: REST endpoints over the JSON store plus the `/generate`
//! proxy to the generative-content API.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::entity::{EntryUpdate, LogEntry, NewEntry};
use crate::error::{Result, WeeklogError};
use crate::generate::GeminiClient;
use crate::storage::JsonStore;

pub struct AppState {
    pub store: JsonStore,
    /// Present only when an API key is configured.
    pub client: Option<GeminiClient>,
}

type SharedState = Arc<AppState>;

/// Error envelope matching the original wire format.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug)]
struct ApiError(WeeklogError);

impl From<WeeklogError> for ApiError {
    fn from(err: WeeklogError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            WeeklogError::EntryNotFound(_) => StatusCode::NOT_FOUND,
            WeeklogError::InvalidEntry(_) => StatusCode::BAD_REQUEST,
            WeeklogError::Http(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(status = %status, "request failed: {}", self.0);
        }
        let body = ErrorBody {
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

async fn list_logs(State(state): State<SharedState>) -> std::result::Result<Json<Vec<LogEntry>>, ApiError> {
    let logs = state.store.list()?;
    info!(count = logs.len(), "GET /api/logs");
    Ok(Json(logs))
}

async fn create_log(
    State(state): State<SharedState>,
    Json(payload): Json<NewEntry>,
) -> std::result::Result<(StatusCode, Json<LogEntry>), ApiError> {
    let entry = state.store.create(payload)?;
    info!(id = %entry.id, "POST /api/logs created entry");
    Ok((StatusCode::CREATED, Json(entry)))
}

fn parse_id(id: &str) -> std::result::Result<Uuid, ApiError> {
    id.parse()
        .map_err(|_| ApiError(WeeklogError::EntryNotFound(id.to_string())))
}

async fn update_log(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(payload): Json<EntryUpdate>,
) -> std::result::Result<Json<LogEntry>, ApiError> {
    let id = parse_id(&id)?;
    let entry = state.store.update(&id, payload)?;
    info!(id = %id, "POST /api/logs/{{id}} updated entry");
    Ok(Json(entry))
}

async fn delete_log(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> std::result::Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.store.delete(&id)?;
    info!(id = %id, "DELETE /api/logs/{{id}} removed entry");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct GeneratePayload {
    #[serde(default)]
    prompt: Option<String>,
}

/// Forward the prompt upstream and relay the reply. Success bodies pass
/// through verbatim; upstream failures are wrapped in a message envelope.
async fn generate(
    State(state): State<SharedState>,
    Json(payload): Json<GeneratePayload>,
) -> Response {
    let Some(prompt) = payload.prompt.filter(|p| !p.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                message: "Prompt is required".to_string(),
            }),
        )
            .into_response();
    };

    let Some(client) = &state.client else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                message: format!(
                    "API key is not set. Export {} to enable generation.",
                    crate::generate::API_KEY_ENV
                ),
            }),
        )
            .into_response();
    };

    match client.proxy(&prompt).await {
        Ok(reply) => {
            let status = StatusCode::from_u16(reply.status)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            if reply.is_success() {
                info!("POST /generate relayed upstream reply");
                (status, Json(reply.body)).into_response()
            } else {
                error!(status = reply.status, "upstream API returned an error");
                (
                    status,
                    Json(json!({
                        "message": "Error from external API.",
                        "error": reply.body,
                    })),
                )
                    .into_response()
            }
        }
        Err(e) => {
            error!("error calling external API: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorBody {
                    message: "Error calling external API".to_string(),
                }),
            )
                .into_response()
        }
    }
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/logs", get(list_logs).post(create_log))
        .route("/api/logs/{id}", post(update_log).delete(delete_log))
        .route("/generate", post(generate))
        .with_state(state)
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}

/// Serve until ctrl-c.
pub async fn run(store: JsonStore, client: Option<GeminiClient>, addr: SocketAddr) -> Result<()> {
    let state = Arc::new(AppState { store, client });
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
