use crate::AppState;
use axum::Router;

pub mod flows;
pub mod health;

/// Merge all routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(flows::routes())
}
