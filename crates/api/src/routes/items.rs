//! Menu item endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use persistence::repositories::ItemRepository;
use shared::patch::as_deref_patch;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::owned_category;
use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use domain::models::{
    CreateItemRequest, Item, ItemResponse, ListItemsResponse, ReorderRequest, UpdateItemRequest,
};

async fn owned_item(state: &AppState, item_id: Uuid, owner_id: Uuid) -> Result<Item, ApiError> {
    ItemRepository::new(state.pool.clone())
        .find_for_owner(item_id, owner_id)
        .await?
        .map(Into::into)
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))
}

/// POST /api/v1/categories/:category_id/items
pub async fn create_item(
    State(state): State<AppState>,
    user: UserAuth,
    Path(category_id): Path<Uuid>,
    Json(request): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<ItemResponse>), ApiError> {
    request.validate()?;

    let category = owned_category(&state, category_id, user.user_id).await?;

    let repo = ItemRepository::new(state.pool.clone());
    let entity = repo
        .create(
            category.id,
            request.name.trim(),
            request.description.as_deref(),
            request.price_cents,
            request.image_url.as_deref(),
            request.is_available,
            request.is_featured,
            &request.dietary_tags,
            request.sort_order,
        )
        .await?;

    let item: Item = entity.into();
    info!(
        item_id = %item.id,
        category_id = %category.id,
        price_cents = item.price_cents,
        "Item created"
    );

    Ok((StatusCode::CREATED, Json(item.into())))
}

/// GET /api/v1/categories/:category_id/items
pub async fn list_items(
    State(state): State<AppState>,
    user: UserAuth,
    Path(category_id): Path<Uuid>,
) -> Result<Json<ListItemsResponse>, ApiError> {
    let category = owned_category(&state, category_id, user.user_id).await?;

    let repo = ItemRepository::new(state.pool.clone());
    let items: Vec<ItemResponse> = repo
        .find_by_category(category.id)
        .await?
        .into_iter()
        .map(|e| Item::from(e).into())
        .collect();

    let total = items.len();
    Ok(Json(ListItemsResponse { items, total }))
}

/// PUT /api/v1/categories/:category_id/items/order
pub async fn reorder_items(
    State(state): State<AppState>,
    user: UserAuth,
    Path(category_id): Path<Uuid>,
    Json(request): Json<ReorderRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate()?;
    if request.has_duplicates() {
        return Err(ApiError::Validation("ids must not repeat".to_string()));
    }

    let category = owned_category(&state, category_id, user.user_id).await?;

    let repo = ItemRepository::new(state.pool.clone());
    if !repo.reorder(category.id, &request.positions()).await? {
        return Err(ApiError::NotFound(
            "One or more items do not belong to this category".to_string(),
        ));
    }

    info!(category_id = %category.id, count = request.ids.len(), "Items reordered");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/items/:item_id
pub async fn get_item(
    State(state): State<AppState>,
    user: UserAuth,
    Path(item_id): Path<Uuid>,
) -> Result<Json<ItemResponse>, ApiError> {
    let item = owned_item(&state, item_id, user.user_id).await?;
    Ok(Json(item.into()))
}

/// Partially update an item. A `category_id` moves the item, but only
/// into another category of the same owner.
///
/// PATCH /api/v1/items/:item_id
pub async fn update_item(
    State(state): State<AppState>,
    user: UserAuth,
    Path(item_id): Path<Uuid>,
    Json(request): Json<UpdateItemRequest>,
) -> Result<Json<ItemResponse>, ApiError> {
    request.validate()?;

    let item = owned_item(&state, item_id, user.user_id).await?;

    let target_category = match request.category_id {
        Some(id) if id != item.category_id => Some(owned_category(&state, id, user.user_id).await?.id),
        _ => None,
    };

    let repo = ItemRepository::new(state.pool.clone());
    let entity = repo
        .update(
            item.id,
            target_category,
            request.name.as_deref().map(str::trim),
            as_deref_patch(&request.description),
            request.price_cents,
            as_deref_patch(&request.image_url),
            request.is_available,
            request.is_featured,
            request.dietary_tags.as_deref(),
            request.sort_order,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    info!(item_id = %item_id, moved = target_category.is_some(), "Item updated");
    Ok(Json(Item::from(entity).into()))
}

/// DELETE /api/v1/items/:item_id
pub async fn delete_item(
    State(state): State<AppState>,
    user: UserAuth,
    Path(item_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let item = owned_item(&state, item_id, user.user_id).await?;

    let repo = ItemRepository::new(state.pool.clone());
    if repo.delete(item.id).await? == 0 {
        return Err(ApiError::NotFound("Item not found".to_string()));
    }

    info!(item_id = %item_id, category_id = %item.category_id, "Item deleted");
    Ok(StatusCode::NO_CONTENT)
}
