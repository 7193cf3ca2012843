//! Menu endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use persistence::repositories::MenuRepository;
use shared::patch::as_deref_patch;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{owned_menu, owned_restaurant};
use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use domain::models::{CreateMenuRequest, ListMenusResponse, Menu, MenuResponse, UpdateMenuRequest};

/// Create a menu in one of the owner's restaurants.
///
/// POST /api/v1/restaurants/:restaurant_id/menus
pub async fn create_menu(
    State(state): State<AppState>,
    user: UserAuth,
    Path(restaurant_id): Path<Uuid>,
    Json(request): Json<CreateMenuRequest>,
) -> Result<(StatusCode, Json<MenuResponse>), ApiError> {
    request.validate()?;

    let restaurant = owned_restaurant(&state, restaurant_id, user.user_id).await?;

    let repo = MenuRepository::new(state.pool.clone());
    let entity = repo
        .create(
            restaurant.id,
            request.name.trim(),
            request.description.as_deref(),
            request.is_active,
            request.sort_order,
        )
        .await?;

    let menu: Menu = entity.into();
    info!(menu_id = %menu.id, restaurant_id = %restaurant.id, "Menu created");

    Ok((StatusCode::CREATED, Json(menu.into())))
}

/// GET /api/v1/restaurants/:restaurant_id/menus
pub async fn list_menus(
    State(state): State<AppState>,
    user: UserAuth,
    Path(restaurant_id): Path<Uuid>,
) -> Result<Json<ListMenusResponse>, ApiError> {
    let restaurant = owned_restaurant(&state, restaurant_id, user.user_id).await?;

    let repo = MenuRepository::new(state.pool.clone());
    let menus: Vec<MenuResponse> = repo
        .find_by_restaurant(restaurant.id)
        .await?
        .into_iter()
        .map(|e| Menu::from(e).into())
        .collect();

    let total = menus.len();
    Ok(Json(ListMenusResponse { menus, total }))
}

/// GET /api/v1/menus/:menu_id
pub async fn get_menu(
    State(state): State<AppState>,
    user: UserAuth,
    Path(menu_id): Path<Uuid>,
) -> Result<Json<MenuResponse>, ApiError> {
    let menu = owned_menu(&state, menu_id, user.user_id).await?;
    Ok(Json(menu.into()))
}

/// PATCH /api/v1/menus/:menu_id
pub async fn update_menu(
    State(state): State<AppState>,
    user: UserAuth,
    Path(menu_id): Path<Uuid>,
    Json(request): Json<UpdateMenuRequest>,
) -> Result<Json<MenuResponse>, ApiError> {
    request.validate()?;

    let repo = MenuRepository::new(state.pool.clone());
    let entity = repo
        .update(
            menu_id,
            user.user_id,
            request.name.as_deref().map(str::trim),
            as_deref_patch(&request.description),
            request.is_active,
            request.sort_order,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Menu not found".to_string()))?;

    info!(menu_id = %menu_id, "Menu updated");
    Ok(Json(Menu::from(entity).into()))
}

/// DELETE /api/v1/menus/:menu_id
pub async fn delete_menu(
    State(state): State<AppState>,
    user: UserAuth,
    Path(menu_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = MenuRepository::new(state.pool.clone());
    if repo.delete(menu_id, user.user_id).await? == 0 {
        return Err(ApiError::NotFound("Menu not found".to_string()));
    }

    info!(menu_id = %menu_id, "Menu deleted");
    Ok(StatusCode::NO_CONTENT)
}
