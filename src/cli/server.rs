//! HTTP server mode for driving a follow-back session over REST

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::analyzer::{AnalysisPhase, AnalysisRequest, FollowBackAnalyzer};
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::pagination::FollowGraph;
use crate::session::Session;
use crate::types::{Fid, Threshold};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Validated application config
    pub app: AppConfig,
}

/// App state shared across handlers
struct AppState {
    graph: Arc<dyn FollowGraph>,
    acting_fid: Fid,
    gate_fid: Fid,
    session: Mutex<Session>,
    phase: Mutex<watch::Receiver<AnalysisPhase>>,
}

impl AppState {
    fn new(graph: Arc<dyn FollowGraph>, acting_fid: Fid, gate_fid: Fid) -> Self {
        let (_, idle) = watch::channel(AnalysisPhase::Idle);
        Self {
            graph,
            acting_fid,
            gate_fid,
            session: Mutex::new(Session::new()),
            phase: Mutex::new(idle),
        }
    }

    fn from_config(config: &AppConfig) -> Result<Self> {
        let fetcher = config.build_fetcher()?;
        Ok(Self::new(
            Arc::new(fetcher),
            config.client_fid()?,
            config.required_fid,
        ))
    }
}

/// Request body for starting an analysis
#[derive(Debug, Deserialize)]
struct AnalysisBody {
    /// `under` or `above`
    mode: Threshold,
}

/// Request body for moving through the result list
#[derive(Debug, Deserialize)]
struct PageBody {
    page: usize,
}

/// Response wrapper
#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn error(msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

/// Start the HTTP server
pub async fn serve(config: ServerConfig, port: u16) -> Result<()> {
    let state = AppState::from_config(&config.app)?;
    let app = router(Arc::new(state));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {port}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/state", get(get_state))
        .route("/page", post(set_page))
        .route("/phase", get(get_phase))
        .route("/analysis", post(start_analysis))
        .route("/analysis/cancel", post(cancel_analysis))
        .route("/back", post(back))
        .route("/share", post(share))
        .route("/unfollow/:fid", post(unfollow))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Current view
async fn get_state(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = state.session.lock().await;
    (StatusCode::OK, Json(ApiResponse::success(session.snapshot()))).into_response()
}

/// Jump to a list page, clamped to the valid range
async fn set_page(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PageBody>,
) -> impl IntoResponse {
    let mut session = state.session.lock().await;
    session.set_page(body.page);
    (StatusCode::OK, Json(ApiResponse::success(session.snapshot()))).into_response()
}

/// Phase of the latest analysis
async fn get_phase(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let phase = *state.phase.lock().await.borrow();
    (
        StatusCode::OK,
        Json(ApiResponse::success(json!({ "phase": phase }))),
    )
        .into_response()
}

/// Start an analysis in the background
async fn start_analysis(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AnalysisBody>,
) -> impl IntoResponse {
    let analyzer = FollowBackAnalyzer::new(Arc::clone(&state.graph));
    let request = AnalysisRequest::new(body.mode, state.acting_fid, state.gate_fid);

    let (ticket, view) = {
        let mut session = state.session.lock().await;
        let ticket = session.begin_analysis(body.mode);
        *state.phase.lock().await = analyzer.subscribe();
        (ticket, session.snapshot())
    };
    debug!("Run {} started ({})", ticket.id, body.mode.title());

    let run_state = Arc::clone(&state);
    let run_id = ticket.id;
    tokio::spawn(async move {
        let outcome = analyzer.analyze(&request, &ticket.cancel).await;
        run_state
            .session
            .lock()
            .await
            .finish_analysis(ticket.id, outcome);
    });

    (
        StatusCode::ACCEPTED,
        Json(ApiResponse::success(json!({ "run": run_id, "view": view }))),
    )
        .into_response()
}

/// Cancel the active analysis and return to the menu
async fn cancel_analysis(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut session = state.session.lock().await;
    let cancelled = session.cancel();
    (
        StatusCode::OK,
        Json(ApiResponse::success(
            json!({ "cancelled": cancelled, "view": session.snapshot() }),
        )),
    )
        .into_response()
}

/// Return to the main menu
async fn back(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut session = state.session.lock().await;
    if !session.back() {
        return (
            StatusCode::CONFLICT,
            Json(ApiResponse::<()>::error(
                Error::AnalysisInProgress.user_message(),
            )),
        )
            .into_response();
    }
    (StatusCode::OK, Json(ApiResponse::success(session.snapshot()))).into_response()
}

/// Switch to the share view
async fn share(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut session = state.session.lock().await;
    if let Err(e) = session.share() {
        return (
            StatusCode::CONFLICT,
            Json(ApiResponse::<()>::error(e.user_message())),
        )
            .into_response();
    }
    (StatusCode::OK, Json(ApiResponse::success(session.snapshot()))).into_response()
}

/// Unfollow stub
async fn unfollow(State(state): State<Arc<AppState>>, Path(fid): Path<Fid>) -> impl IntoResponse {
    let message = state.session.lock().await.unfollow(fid);
    (
        StatusCode::OK,
        Json(ApiResponse::success(json!({ "message": message }))),
    )
        .into_response()
}
