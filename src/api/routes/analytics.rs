use axum::extract::State;
use axum::routing::get;
use axum::Router;

use crate::api::{ApiResponse, AppState, AuthUser};
use crate::models::{DashboardStats, InventoryAnalytics};

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/inventory", get(inventory))
        .route("/dashboard", get(dashboard))
}

async fn inventory(State(state): State<AppState>, user: AuthUser) -> ApiResponse<InventoryAnalytics> {
    ApiResponse::from_result(
        state.analytics.inventory(&user.id).await,
        "Failed to build inventory analytics",
    )
}

async fn dashboard(State(state): State<AppState>, user: AuthUser) -> ApiResponse<DashboardStats> {
    ApiResponse::from_result(
        state.analytics.dashboard(&user.id).await,
        "Failed to fetch dashboard stats",
    )
}
