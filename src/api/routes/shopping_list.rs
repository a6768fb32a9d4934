use axum::extract::{Path, Query, State};
use axum::routing::{delete, get, patch};
use axum::Router;
use serde::Deserialize;

use super::SHOPPING_LIST_PAGE_SIZE;
use crate::api::{ApiResponse, AppState, AuthUser, JsonBody, PageQuery};
use crate::models::{
    CreateShoppingListItem, Paginated, ShoppingListItem, UpdateShoppingListItem,
};

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(add))
        .route("/incomplete", get(incomplete))
        .route("/completed/clear", delete(clear_completed))
        .route("/:id", get(fetch).put(update).delete(remove))
        .route("/:id/toggle", patch(toggle))
}

#[derive(Debug, Deserialize)]
struct ToggleRequest {
    is_completed: bool,
}

async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<PageQuery>,
) -> ApiResponse<Paginated<ShoppingListItem>> {
    let page = query.resolve(SHOPPING_LIST_PAGE_SIZE);
    ApiResponse::from_result(
        state.shopping_list.list(&user.id, page).await,
        "Failed to fetch shopping list",
    )
}

async fn incomplete(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResponse<Vec<ShoppingListItem>> {
    ApiResponse::from_result(
        state.shopping_list.incomplete(&user.id).await,
        "Failed to fetch incomplete items",
    )
}

async fn fetch(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResponse<ShoppingListItem> {
    ApiResponse::from_result(
        state.shopping_list.get(&user.id, &id).await,
        "Failed to fetch shopping-list item",
    )
}

async fn add(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(item): JsonBody<CreateShoppingListItem>,
) -> ApiResponse<ShoppingListItem> {
    ApiResponse::from_result(
        state.shopping_list.add(&user.id, &item).await,
        "Failed to add item",
    )
    .with_success_message("Item added to the list")
}

async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(changes): JsonBody<UpdateShoppingListItem>,
) -> ApiResponse<ShoppingListItem> {
    ApiResponse::from_result(
        state.shopping_list.update(&user.id, &id, &changes).await,
        "Failed to update item",
    )
    .with_success_message("Item updated")
}

async fn toggle(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<ToggleRequest>,
) -> ApiResponse<ShoppingListItem> {
    let message = if body.is_completed {
        "Item marked as completed"
    } else {
        "Item marked as incomplete"
    };
    ApiResponse::from_result(
        state
            .shopping_list
            .set_completed(&user.id, &id, body.is_completed)
            .await,
        "Failed to update item",
    )
    .with_success_message(message)
}

async fn remove(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResponse<()> {
    ApiResponse::done(
        state.shopping_list.delete(&user.id, &id).await,
        "Item removed from the list",
        "Failed to remove item",
    )
}

async fn clear_completed(State(state): State<AppState>, user: AuthUser) -> ApiResponse<()> {
    ApiResponse::done(
        state.shopping_list.clear_completed(&user.id).await,
        "Completed items removed",
        "Failed to clear completed items",
    )
}
