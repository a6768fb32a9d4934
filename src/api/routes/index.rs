use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::api::AppState;

pub(crate) fn routes() -> Router<AppState> {
    Router::new().route("/", get(index))
}

async fn index() -> Json<Value> {
    Json(json!({
        "message": "StockHome API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "auth": "/auth",
            "items": "/items",
            "shopping_list": "/shopping-list",
            "analytics": "/analytics",
        },
    }))
}
