// Item read handlers
//
// - GET /items - list items, sortable by name or availableQty
// - GET /items/{id} - single item
//
// Both are served through the TTL cache; the mutation paths invalidate it
// synchronously, so a read after a mutation's response always observes the
// new stock level.

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use common::ApiSuccess;
use reservations::{GetItemUseCase, ItemResponse, ListItemsUseCase, SortBy, SortOrder};
use serde::Deserialize;

use crate::error::AppError;
use crate::middleware::request_id::RequestId;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItemsParams {
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Handler for GET /items
pub async fn list_items_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<ListItemsParams>,
) -> Result<Json<ApiSuccess<Vec<ItemResponse>>>, AppError> {
    let sort_by: SortBy = match params.sort_by.as_deref() {
        None => SortBy::default(),
        Some(raw) => raw.parse().map_err(|()| {
            AppError::validation("sortBy must be one of: name, availableQty")
                .with_request_id(&request_id)
        })?,
    };
    let sort_order: SortOrder = match params.sort_order.as_deref() {
        None => SortOrder::default(),
        Some(raw) => raw.parse().map_err(|()| {
            AppError::validation("sortOrder must be one of: asc, desc").with_request_id(&request_id)
        })?,
    };

    let use_case = ListItemsUseCase::new(state.store(), state.cache());
    let items = use_case
        .execute(sort_by, sort_order)
        .await
        .map_err(|e| AppError::from(e).with_request_id(&request_id))?;

    Ok(Json(ApiSuccess::new(items)))
}

/// Handler for GET /items/{id}
pub async fn get_item_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiSuccess<ItemResponse>>, AppError> {
    let use_case = GetItemUseCase::new(state.store(), state.cache());
    let item = use_case
        .execute(&id)
        .await
        .map_err(|e| AppError::from(e).with_request_id(&request_id))?
        .ok_or_else(|| AppError::item_not_found().with_request_id(&request_id))?;

    Ok(Json(ApiSuccess::new(item)))
}
