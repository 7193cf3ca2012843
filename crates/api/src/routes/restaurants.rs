//! Restaurant endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use persistence::repositories::RestaurantRepository;
use shared::patch::as_deref_patch;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use domain::models::{
    CreateRestaurantRequest, ListRestaurantsResponse, Restaurant, RestaurantResponse,
    UpdateRestaurantRequest,
};

/// Create a restaurant for the calling owner.
///
/// POST /api/v1/restaurants
pub async fn create_restaurant(
    State(state): State<AppState>,
    user: UserAuth,
    Json(request): Json<CreateRestaurantRequest>,
) -> Result<(StatusCode, Json<RestaurantResponse>), ApiError> {
    request.validate()?;

    let repo = RestaurantRepository::new(state.pool.clone());

    // Soft cap; concurrent creates may overshoot by a few rows.
    let limit = state.config.limits.max_restaurants_per_owner;
    if repo.count_by_owner(user.user_id).await? >= limit {
        return Err(ApiError::Conflict(format!(
            "Owner has reached the maximum number of restaurants ({})",
            limit
        )));
    }

    let entity = repo
        .create(
            user.user_id,
            request.name.trim(),
            request.description.as_deref(),
            request.address.as_deref(),
            request.phone.as_deref(),
            request.logo_url.as_deref(),
            &request.currency,
            request.is_active,
        )
        .await?;

    let restaurant: Restaurant = entity.into();
    info!(
        restaurant_id = %restaurant.id,
        owner_id = %user.user_id,
        "Restaurant created"
    );

    Ok((StatusCode::CREATED, Json(restaurant.into())))
}

/// List the calling owner's restaurants.
///
/// GET /api/v1/restaurants
pub async fn list_restaurants(
    State(state): State<AppState>,
    user: UserAuth,
) -> Result<Json<ListRestaurantsResponse>, ApiError> {
    let repo = RestaurantRepository::new(state.pool.clone());
    let restaurants: Vec<RestaurantResponse> = repo
        .find_by_owner(user.user_id)
        .await?
        .into_iter()
        .map(|e| Restaurant::from(e).into())
        .collect();

    let total = restaurants.len();
    Ok(Json(ListRestaurantsResponse { restaurants, total }))
}

/// GET /api/v1/restaurants/:restaurant_id
pub async fn get_restaurant(
    State(state): State<AppState>,
    user: UserAuth,
    Path(restaurant_id): Path<Uuid>,
) -> Result<Json<RestaurantResponse>, ApiError> {
    let repo = RestaurantRepository::new(state.pool.clone());
    let entity = repo
        .find_for_owner(restaurant_id, user.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Restaurant not found".to_string()))?;

    Ok(Json(Restaurant::from(entity).into()))
}

/// Partially update a restaurant.
///
/// PATCH /api/v1/restaurants/:restaurant_id
pub async fn update_restaurant(
    State(state): State<AppState>,
    user: UserAuth,
    Path(restaurant_id): Path<Uuid>,
    Json(request): Json<UpdateRestaurantRequest>,
) -> Result<Json<RestaurantResponse>, ApiError> {
    request.validate()?;

    let repo = RestaurantRepository::new(state.pool.clone());
    let entity = repo
        .update(
            restaurant_id,
            user.user_id,
            request.name.as_deref().map(str::trim),
            as_deref_patch(&request.description),
            as_deref_patch(&request.address),
            as_deref_patch(&request.phone),
            as_deref_patch(&request.logo_url),
            request.currency.as_deref(),
            request.is_active,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Restaurant not found".to_string()))?;

    info!(restaurant_id = %restaurant_id, "Restaurant updated");
    Ok(Json(Restaurant::from(entity).into()))
}

/// Delete a restaurant with its menus, QR codes and events.
///
/// DELETE /api/v1/restaurants/:restaurant_id
pub async fn delete_restaurant(
    State(state): State<AppState>,
    user: UserAuth,
    Path(restaurant_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = RestaurantRepository::new(state.pool.clone());
    if repo.delete(restaurant_id, user.user_id).await? == 0 {
        return Err(ApiError::NotFound("Restaurant not found".to_string()));
    }

    info!(restaurant_id = %restaurant_id, owner_id = %user.user_id, "Restaurant deleted");
    Ok(StatusCode::NO_CONTENT)
}
