use axum::Router;
use axum::http::HeaderValue;
use flowkit::FlowkitApp;
use flowkit::config::{CorsConfig, ServerConfig};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod error;
pub mod routes;

pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub app: Arc<FlowkitApp>,
    pub server: ServerConfig,
}

impl AppState {
    pub fn new(app: Arc<FlowkitApp>, server: ServerConfig) -> Self {
        Self { app, server }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health_check,
        crate::routes::flows::list_flows,
        crate::routes::flows::list_models,
        crate::routes::flows::run_flow,
    ),
    components(
        schemas(
            crate::routes::health::HealthResponse,
            crate::routes::flows::FlowDto,
            crate::routes::flows::ListFlowsResponse,
            crate::routes::flows::ModelDto,
            crate::routes::flows::ListModelsResponse,
            crate::routes::flows::RunFlowRequest,
            crate::routes::flows::RunFlowResponse,
            crate::error::ErrorBody,
            crate::error::ErrorDetail,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "flows", description = "Flow invocation and introspection")
    )
)]
pub struct ApiDoc;

fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    if cors.allow_any_origin {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build API application
pub fn build_app(state: AppState) -> Router {
    let mut router = Router::new().merge(routes::routes());

    if state.server.enable_swagger {
        router = router
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    let cors = cors_layer(&state.server.cors);

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
