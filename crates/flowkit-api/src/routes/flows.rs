use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use flowkit::ModelReference;
use flowkit::flows::FlowInfo;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{ApiError, AppState};

/// API representation of a registered flow
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FlowDto {
    pub name: String,
    pub description: Option<String>,
    pub model: Option<String>,
}

impl From<FlowInfo> for FlowDto {
    fn from(info: FlowInfo) -> Self {
        Self {
            name: info.name,
            description: info.description,
            model: info.model,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListFlowsResponse {
    pub flows: Vec<FlowDto>,
    pub total: usize,
}

/// API representation of a registered model
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModelDto {
    pub name: String,
    /// "chat" or "generate"
    #[serde(rename = "type")]
    pub model_type: String,
}

impl From<ModelReference> for ModelDto {
    fn from(model: ModelReference) -> Self {
        Self {
            name: model.name().to_string(),
            model_type: model.model_type().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListModelsResponse {
    pub models: Vec<ModelDto>,
    pub total: usize,
}

/// Flow input envelope
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RunFlowRequest {
    pub data: String,
}

/// Flow output envelope
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RunFlowResponse {
    pub result: String,
}

/// List registered flows
#[utoipa::path(
    get,
    path = "/flows",
    responses(
        (status = 200, description = "List of flows", body = ListFlowsResponse)
    ),
    tag = "flows"
)]
pub async fn list_flows(State(state): State<AppState>) -> Json<ListFlowsResponse> {
    let flows: Vec<FlowDto> = state
        .app
        .flows()
        .list()
        .into_iter()
        .map(FlowDto::from)
        .collect();
    let total = flows.len();

    Json(ListFlowsResponse { flows, total })
}

/// List registered models
#[utoipa::path(
    get,
    path = "/models",
    responses(
        (status = 200, description = "List of models", body = ListModelsResponse)
    ),
    tag = "flows"
)]
pub async fn list_models(State(state): State<AppState>) -> Json<ListModelsResponse> {
    let models: Vec<ModelDto> = state
        .app
        .gateway()
        .list_models()
        .into_iter()
        .map(ModelDto::from)
        .collect();
    let total = models.len();

    Json(ListModelsResponse { models, total })
}

/// Invoke a flow by name
#[utoipa::path(
    post,
    path = "/{flow_name}",
    params(
        ("flow_name" = String, Path, description = "Flow name, e.g. menuSuggestionFlow")
    ),
    request_body = RunFlowRequest,
    responses(
        (status = 200, description = "Flow result", body = RunFlowResponse),
        (status = 400, description = "Malformed request body", body = crate::error::ErrorBody),
        (status = 404, description = "Flow or model not found", body = crate::error::ErrorBody),
        (status = 502, description = "Generation backend failed", body = crate::error::ErrorBody),
        (status = 504, description = "Generation backend timed out", body = crate::error::ErrorBody)
    ),
    tag = "flows"
)]
pub async fn run_flow(
    State(state): State<AppState>,
    Path(flow_name): Path<String>,
    payload: Result<Json<RunFlowRequest>, JsonRejection>,
) -> Result<Json<RunFlowResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::invalid_argument(e.body_text()))?;

    let result = state.app.run_flow(&flow_name, request.data).await?;

    Ok(Json(RunFlowResponse { result }))
}

/// Routes for flow endpoints
pub fn routes() -> axum::Router<AppState> {
    use axum::routing::{get, post};

    axum::Router::new()
        .route("/flows", get(list_flows))
        .route("/models", get(list_models))
        .route("/{flow_name}", post(run_flow))
}
