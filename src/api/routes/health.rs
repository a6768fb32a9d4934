use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::api::{ApiResponse, AppState};
use crate::error::Result;

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(liveness))
        .route("/db", get(database))
}

async fn liveness() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

/// Issue a one-row read against the items table
async fn database(State(state): State<AppState>) -> ApiResponse<()> {
    ApiResponse::done(
        probe(&state).await,
        "Supabase connection established",
        "Failed to connect to Supabase",
    )
}

async fn probe(state: &AppState) -> Result<()> {
    state
        .supabase
        .from("items")
        .select("id")
        .limit(1)
        .execute::<Value>()
        .await?;
    Ok(())
}
