use std::{path::Path, sync::Arc};

use anyhow::Result;
use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::{
    services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::info;

use crate::{
    form::UrlCheckForm,
    panels,
    types::CheckStatus,
};

#[derive(Clone)]
pub struct AppState {
    form: Arc<UrlCheckForm>,
}

impl AppState {
    pub fn new(form: UrlCheckForm) -> Self {
        Self { form: Arc::new(form) }
    }
}

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    #[serde(default)]
    pub url: String,
}

/// API routes only; the static UI is attached by [`build_app`].
pub fn build_router(state: AppState) -> Router {
    // The panel data never changes for the life of the process.
    let panels = Router::new()
        .route("/map", get(get_map))
        .route("/chart", get(get_chart))
        .route("/chart.svg", get(get_chart_svg))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=3600"),
        ));

    let api = Router::new()
        .route("/health", get(get_health))
        .route("/check", post(post_check))
        .route("/result", get(get_result))
        .merge(panels)
        .with_state(state);

    Router::new().nest("/api", api)
}

pub fn build_app(state: AppState, ui_dir: impl AsRef<Path>) -> Router {
    let static_svc = ServeDir::new(ui_dir.as_ref()).append_index_html_on_directories(true);
    build_router(state)
        .fallback_service(static_svc)
        .layer(TraceLayer::new_for_http())
}

pub async fn spawn_server(bind: &str, state: AppState, ui_dir: impl AsRef<Path>) -> Result<()> {
    let app = build_app(state, ui_dir);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("serving UI on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn get_health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn post_check(State(app): State<AppState>, Json(req): Json<CheckRequest>) -> impl IntoResponse {
    let reply = app.form.submit(&req.url).await;
    let code = match reply.status {
        CheckStatus::Failed => StatusCode::BAD_GATEWAY,
        _ => StatusCode::OK,
    };
    (code, Json(reply))
}

async fn get_result(State(app): State<AppState>) -> impl IntoResponse {
    match app.form.display().await {
        Some(reply) => (StatusCode::OK, Json(reply)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn get_map() -> impl IntoResponse {
    Json(panels::map_geojson())
}

async fn get_chart() -> impl IntoResponse {
    Json(panels::scam_categories())
}

async fn get_chart_svg() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "image/svg+xml")],
        panels::bar_chart_svg(),
    )
}
