//! HTTP route handlers.

pub mod analytics;
pub mod categories;
pub mod health;
pub mod items;
pub mod menus;
pub mod public_menu;
pub mod qr_codes;
pub mod restaurants;

use persistence::repositories::{CategoryRepository, MenuRepository, RestaurantRepository};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::{Category, Menu, Restaurant};

/// Loads a restaurant of `owner_id`; any other restaurant is reported missing.
pub(crate) async fn owned_restaurant(
    state: &AppState,
    restaurant_id: Uuid,
    owner_id: Uuid,
) -> Result<Restaurant, ApiError> {
    RestaurantRepository::new(state.pool.clone())
        .find_for_owner(restaurant_id, owner_id)
        .await?
        .map(Into::into)
        .ok_or_else(|| ApiError::NotFound("Restaurant not found".to_string()))
}

/// Loads a menu under one of `owner_id`'s restaurants.
pub(crate) async fn owned_menu(
    state: &AppState,
    menu_id: Uuid,
    owner_id: Uuid,
) -> Result<Menu, ApiError> {
    MenuRepository::new(state.pool.clone())
        .find_for_owner(menu_id, owner_id)
        .await?
        .map(Into::into)
        .ok_or_else(|| ApiError::NotFound("Menu not found".to_string()))
}

/// Loads a category under one of `owner_id`'s menus.
pub(crate) async fn owned_category(
    state: &AppState,
    category_id: Uuid,
    owner_id: Uuid,
) -> Result<Category, ApiError> {
    CategoryRepository::new(state.pool.clone())
        .find_for_owner(category_id, owner_id)
        .await?
        .map(Into::into)
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))
}
