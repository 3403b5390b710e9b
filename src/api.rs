//! REST API Server for the preference memory
//!
//! Exposes the preference service and tool registry over HTTP.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::error::MemoryError;
use crate::models::{ToolInput, UserContext};
use crate::service::PreferenceService;
use crate::tools::ToolRegistry;

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AddPreferenceRequest {
    pub category: String,
    pub preference: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FlightSearchRequest {
    pub destination: String,
    pub departure_date: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToolRequest {
    pub user_id: Option<String>,
    #[serde(default)]
    pub parameters: Value,
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<PreferenceService>,
    pub tools: Arc<ToolRegistry>,
    pub default_user_id: String,
}

type ApiReply = (StatusCode, Json<Value>);

fn ok<T: Serialize>(body: &T) -> ApiReply {
    match serde_json::to_value(body) {
        Ok(value) => (StatusCode::OK, Json(value)),
        Err(e) => error_reply(MemoryError::from(e)),
    }
}

fn error_reply(err: MemoryError) -> ApiReply {
    let status = match &err {
        MemoryError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        MemoryError::InvalidToolInput(_) => StatusCode::BAD_REQUEST,
        MemoryError::ToolNotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        error!("Request failed: {}", err);
    }

    (
        status,
        Json(json!({
            "status": "error",
            "message": err.to_string(),
        })),
    )
}

/// =============================
/// Health Endpoint
/// =============================

async fn health(State(state): State<ApiState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "backend": state.service.backend_name(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Preference Endpoints
/// =============================

async fn add_preference(
    State(state): State<ApiState>,
    Path(user_id): Path<String>,
    Json(req): Json<AddPreferenceRequest>,
) -> ApiReply {
    let ctx = UserContext::new(user_id);

    match state
        .service
        .add_preference(&ctx, &req.category, &req.preference)
        .await
    {
        Ok(response) => ok(&response),
        Err(e) => error_reply(e),
    }
}

async fn list_preferences(
    State(state): State<ApiState>,
    Path((user_id, category)): Path<(String, String)>,
) -> ApiReply {
    let ctx = UserContext::new(user_id);

    match state.service.list_preferences(&ctx, &category).await {
        Ok(response) => ok(&response),
        Err(e) => error_reply(e),
    }
}

async fn find_flights(
    State(state): State<ApiState>,
    Path(user_id): Path<String>,
    Json(req): Json<FlightSearchRequest>,
) -> ApiReply {
    let ctx = UserContext::new(user_id);
    info!(user = %ctx, destination = %req.destination, "Received flight request");

    match state
        .service
        .recommend_flight(&ctx, &req.destination, &req.departure_date)
        .await
    {
        Ok(response) => ok(&response),
        Err(e) => error_reply(e),
    }
}

/// =============================
/// Tool Endpoints
/// =============================

async fn list_tools(State(state): State<ApiState>) -> Json<Value> {
    let tools: Vec<Value> = state
        .tools
        .list()
        .into_iter()
        .filter_map(|name| state.tools.get(name))
        .map(|tool| json!({"name": tool.name(), "description": tool.description()}))
        .collect();

    Json(json!({ "tools": tools }))
}

async fn invoke_tool(
    State(state): State<ApiState>,
    Path(tool_name): Path<String>,
    Json(req): Json<ToolRequest>,
) -> ApiReply {
    let user_id = req
        .user_id
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| state.default_user_id.clone());
    let ctx = UserContext::new(user_id);

    let input = ToolInput {
        tool_name,
        parameters: req.parameters,
    };
    info!(user = %ctx, tool = %input.tool_name, "Invoking tool");

    match state.tools.execute(&ctx, &input).await {
        Ok(output) => ok(&output),
        Err(e) => error_reply(e),
    }
}

/// =============================
/// Router
/// =============================

pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/users/:user_id/preferences", post(add_preference))
        .route(
            "/api/users/:user_id/preferences/:category",
            get(list_preferences),
        )
        .route("/api/users/:user_id/flights", post(find_flights))
        .route("/api/tools", get(list_tools))
        .route("/api/tools/:tool_name", post(invoke_tool))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(state: ApiState, port: u16) -> crate::Result<()> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
