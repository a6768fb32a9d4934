use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

use super::ITEMS_PAGE_SIZE;
use crate::api::{ApiResponse, AppState, AuthUser, ExpiringQuery, JsonBody, PageQuery};
use crate::models::{CreateItem, Item, Paginated, UpdateItem};
use crate::repository::DEFAULT_EXPIRY_WINDOW_DAYS;

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/low-stock", get(low_stock))
        .route("/expiring", get(expiring))
        .route("/category/:categoria", get(by_category))
        .route("/:id", get(fetch).put(update).patch(update).delete(remove))
        .route("/:id/purchase", post(purchase))
}

#[derive(Debug, Deserialize)]
struct PurchaseRequest {
    quantity: f64,
    #[serde(default)]
    price: Option<f64>,
}

async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<PageQuery>,
) -> ApiResponse<Paginated<Item>> {
    let page = query.resolve(ITEMS_PAGE_SIZE);
    ApiResponse::from_result(state.items.list(&user.id, page).await, "Failed to fetch items")
}

async fn fetch(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResponse<Item> {
    ApiResponse::from_result(state.items.get(&user.id, &id).await, "Failed to fetch item")
}

async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(item): JsonBody<CreateItem>,
) -> ApiResponse<Item> {
    ApiResponse::from_result(state.items.create(&user.id, &item).await, "Failed to create item")
        .with_success_message("Item created")
}

async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(changes): JsonBody<UpdateItem>,
) -> ApiResponse<Item> {
    ApiResponse::from_result(
        state.items.update(&user.id, &id, &changes).await,
        "Failed to update item",
    )
    .with_success_message("Item updated")
}

async fn remove(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResponse<()> {
    ApiResponse::done(
        state.items.delete(&user.id, &id).await,
        "Item deleted",
        "Failed to delete item",
    )
}

async fn by_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(category): Path<String>,
) -> ApiResponse<Vec<Item>> {
    ApiResponse::from_result(
        state.items.by_category(&user.id, &category).await,
        "Failed to fetch items by category",
    )
}

async fn low_stock(State(state): State<AppState>, user: AuthUser) -> ApiResponse<Vec<Item>> {
    match state.items.low_stock(&user.id).await {
        Ok(items) => {
            let message = format!("{} items below minimum stock", items.len());
            ApiResponse::ok(items).with_success_message(message)
        }
        Err(err) => ApiResponse::failure(&err, "Failed to fetch low-stock items"),
    }
}

async fn expiring(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ExpiringQuery>,
) -> ApiResponse<Vec<Item>> {
    let days = query.days_or(DEFAULT_EXPIRY_WINDOW_DAYS);
    match state.items.expiring(&user.id, days).await {
        Ok(items) => {
            let message = format!("{} items expiring soon", items.len());
            ApiResponse::ok(items).with_success_message(message)
        }
        Err(err) => ApiResponse::failure(&err, "Failed to fetch expiring items"),
    }
}

async fn purchase(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<PurchaseRequest>,
) -> ApiResponse<Item> {
    ApiResponse::from_result(
        state
            .items
            .register_purchase(&user.id, &id, body.quantity, body.price)
            .await,
        "Failed to register purchase",
    )
    .with_success_message("Purchase registered")
}
