use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::Config;
use crate::engine::{
    compute_budget, suggest_alternatives, AlternativeList, BudgetInput, BudgetResult,
};
use crate::error::EngineError;
use crate::reference::{CropProfile, IrrigationMethod, LocationProfile, ReferenceStore};

#[derive(Clone)]
struct ApiState {
    config: Arc<Config>,
    store: Arc<ReferenceStore>,
}

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    ok: bool,
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(error: EngineError) -> Self {
        match &error {
            EngineError::UnknownReference { .. } => Self::not_found(error.to_string()),
            EngineError::InvalidInput(_) | EngineError::DegenerateInput(_) => {
                Self::bad_request(error.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorBody {
            ok: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Clone, Deserialize)]
struct BudgetRequest {
    location: String,
    crop: String,
    area_ha: f64,
    method: String,
    #[serde(default)]
    groundwater_override_m3_per_ha: Option<f64>,
    /// Attach the ranked shortlist when the outcome is not Safe.
    #[serde(default = "default_true")]
    include_alternatives: bool,
}

impl From<&BudgetRequest> for BudgetInput {
    fn from(request: &BudgetRequest) -> Self {
        Self {
            location: request.location.clone(),
            crop: request.crop.clone(),
            area_ha: request.area_ha,
            method: request.method.clone(),
            groundwater_override_m3_per_ha: request.groundwater_override_m3_per_ha,
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct BudgetResponse {
    result: BudgetResult,
    alternatives: Option<AlternativeList>,
}

#[derive(Debug, Serialize)]
struct DatasetResponse {
    crops: usize,
    locations: usize,
    methods: usize,
    fingerprint: String,
}

pub async fn run_server(config: Config, store: ReferenceStore, bind: SocketAddr) -> Result<()> {
    let state = ApiState {
        config: Arc::new(config),
        store: Arc::new(store),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/v1/budget", post(budget))
        .route("/v1/alternatives", post(alternatives))
        .route("/v1/crops", get(crops))
        .route("/v1/locations", get(locations))
        .route("/v1/methods", get(methods))
        .route("/v1/dataset", get(dataset))
        .route("/v1/config", get(show_config))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("REST API listening on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<ApiResponse<HealthResponse>> {
    ok(HealthResponse { status: "ok" })
}

async fn show_config(State(state): State<ApiState>) -> Json<ApiResponse<Config>> {
    ok(state.config.as_ref().clone())
}

async fn budget(
    State(state): State<ApiState>,
    Json(request): Json<BudgetRequest>,
) -> ApiResult<BudgetResponse> {
    let input = BudgetInput::from(&request);
    let result = compute_budget(&state.store, &state.config.engine, &input)?;
    let alternatives = if request.include_alternatives && !result.classification.is_safe() {
        Some(suggest_alternatives(
            &state.store,
            &state.config.engine,
            &result,
            &input,
        )?)
    } else {
        None
    };
    Ok(ok(BudgetResponse {
        result,
        alternatives,
    }))
}

async fn alternatives(
    State(state): State<ApiState>,
    Json(request): Json<BudgetRequest>,
) -> ApiResult<AlternativeList> {
    let input = BudgetInput::from(&request);
    let result = compute_budget(&state.store, &state.config.engine, &input)?;
    let list = suggest_alternatives(&state.store, &state.config.engine, &result, &input)?;
    Ok(ok(list))
}

async fn crops(State(state): State<ApiState>) -> Json<ApiResponse<Vec<CropProfile>>> {
    ok(state.store.all_crops().to_vec())
}

async fn locations(State(state): State<ApiState>) -> Json<ApiResponse<Vec<LocationProfile>>> {
    ok(state.store.all_locations().to_vec())
}

async fn methods(State(state): State<ApiState>) -> Json<ApiResponse<Vec<IrrigationMethod>>> {
    ok(state.store.all_methods().to_vec())
}

async fn dataset(State(state): State<ApiState>) -> Json<ApiResponse<DatasetResponse>> {
    ok(DatasetResponse {
        crops: state.store.all_crops().len(),
        locations: state.store.all_locations().len(),
        methods: state.store.all_methods().len(),
        fingerprint: state.store.fingerprint().to_string(),
    })
}

fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { ok: true, data })
}

fn default_true() -> bool {
    true
}
