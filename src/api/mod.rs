//! Read API over the snapshot history, plus the run trigger.

use crate::domain::{
    History, PageKind, PageResult, ProfileRecord, ProjectRecord, TimeSeriesPoint,
};
use crate::error::HarvestError;
use crate::services::HarvestService;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<HarvestService>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    success: bool,
    error: String,
    timestamp: DateTime<Utc>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            success: false,
            error: error.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<HarvestError> for ApiError {
    fn from(error: HarvestError) -> Self {
        let status = match &error {
            HarvestError::RunInProgress => StatusCode::CONFLICT,
            HarvestError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            HarvestError::Network(_) | HarvestError::UnexpectedStatus { .. } => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NoData {
    success: bool,
    message: &'static str,
    time_series_data: Vec<TimeSeriesPoint>,
}

impl IntoResponse for NoData {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::NOT_FOUND, Json(self)).into_response()
    }
}

fn no_data() -> NoData {
    NoData {
        success: false,
        message: "No snapshots stored yet",
        time_series_data: Vec::new(),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunSummary {
    profile_count: usize,
    project_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LatestSummary {
    profile_count: usize,
    project_count: usize,
    data_point_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LatestResponse {
    success: bool,
    latest_timestamp: DateTime<Utc>,
    summary: LatestSummary,
    time_series_data: Vec<TimeSeriesPoint>,
    projects_data: Vec<ProjectRecord>,
    profiles_data: Vec<ProfileRecord>,
    raw_data: History,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LatestQuery {
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScrapeQuery {
    url: Option<String>,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/run", get(trigger_run))
        .route("/runs/latest", get(latest))
        .route("/runs/latest/raw", get(latest_raw))
        .route("/scrape", get(scrape_page))
        .layer(build_cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn trigger_run(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state.service.run().await.map_err(|e| {
        tracing::error!("Triggered run failed: {}", e);
        ApiError::from(e)
    })?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Harvest run completed and stored",
        "timestamp": snapshot.timestamp,
        "summary": RunSummary {
            profile_count: snapshot.profile_count,
            project_count: snapshot.project_count,
        },
    })))
}

async fn latest(
    State(state): State<AppState>,
    query: Result<Query<LatestQuery>, QueryRejection>,
) -> Result<axum::response::Response, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    if query.limit == Some(0) {
        return Err(ApiError::bad_request("limit must be at least 1"));
    }

    let history = state.service.store().read_all();
    let Some(latest) = history.last().cloned() else {
        return Ok(no_data().into_response());
    };

    let skip = query
        .limit
        .map_or(0, |limit| history.len().saturating_sub(limit));
    let time_series_data = history.iter().skip(skip).map(|s| s.point()).collect();

    Ok(Json(LatestResponse {
        success: true,
        latest_timestamp: latest.timestamp,
        summary: LatestSummary {
            profile_count: latest.profile_count,
            project_count: latest.project_count,
            data_point_count: history.len(),
        },
        time_series_data,
        projects_data: latest.projects,
        profiles_data: latest.profiles,
        raw_data: history,
    })
    .into_response())
}

async fn latest_raw(State(state): State<AppState>) -> axum::response::Response {
    match state.service.store().read_latest() {
        Some(snapshot) => Json(serde_json::json!({
            "success": true,
            "timestamp": snapshot.timestamp,
            "data": snapshot,
        }))
        .into_response(),
        None => no_data().into_response(),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScrapeResponse {
    success: bool,
    page: String,
    url: String,
    timestamp: DateTime<Utc>,
    data: PageResult,
}

async fn scrape_page(
    State(state): State<AppState>,
    query: Result<Query<ScrapeQuery>, QueryRejection>,
) -> Result<Json<ScrapeResponse>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let raw = query
        .url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("url parameter is required"))?;

    let scraping = state.service.scraping();
    let url = Url::parse(raw.trim())
        .map_err(|e| ApiError::bad_request(format!("invalid url {}: {}", raw, e)))?;
    if !scraping.client().is_same_site(&url) {
        return Err(ApiError::bad_request(format!(
            "only {} can be scraped",
            scraping.client().base_url()
        )));
    }

    let kind = if url.path().starts_with(&scraping.site().projects_path) {
        PageKind::Projects
    } else {
        PageKind::Profiles
    };
    let data = scraping.try_scrape_page(&url, kind).await?;

    Ok(Json(ScrapeResponse {
        success: true,
        page: url.path().to_string(),
        url: url.to_string(),
        timestamp: Utc::now(),
        data,
    }))
}
