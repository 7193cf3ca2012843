//! Menu category endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use persistence::repositories::CategoryRepository;
use shared::patch::as_deref_patch;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{owned_category, owned_menu};
use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use domain::models::{
    Category, CategoryResponse, CreateCategoryRequest, ListCategoriesResponse, ReorderRequest,
    UpdateCategoryRequest,
};

/// POST /api/v1/menus/:menu_id/categories
pub async fn create_category(
    State(state): State<AppState>,
    user: UserAuth,
    Path(menu_id): Path<Uuid>,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiError> {
    request.validate()?;

    let menu = owned_menu(&state, menu_id, user.user_id).await?;

    let repo = CategoryRepository::new(state.pool.clone());
    let entity = repo
        .create(
            menu.id,
            request.name.trim(),
            request.description.as_deref(),
            request.is_active,
            request.sort_order,
        )
        .await?;

    let category: Category = entity.into();
    info!(category_id = %category.id, menu_id = %menu.id, "Category created");

    Ok((StatusCode::CREATED, Json(category.into())))
}

/// List a menu's categories, inactive ones included.
///
/// GET /api/v1/menus/:menu_id/categories
pub async fn list_categories(
    State(state): State<AppState>,
    user: UserAuth,
    Path(menu_id): Path<Uuid>,
) -> Result<Json<ListCategoriesResponse>, ApiError> {
    let menu = owned_menu(&state, menu_id, user.user_id).await?;

    let repo = CategoryRepository::new(state.pool.clone());
    let categories: Vec<CategoryResponse> = repo
        .find_by_menu(menu.id)
        .await?
        .into_iter()
        .map(|e| Category::from(e).into())
        .collect();

    let total = categories.len();
    Ok(Json(ListCategoriesResponse { categories, total }))
}

/// Set category positions from the order of the submitted ids.
///
/// PUT /api/v1/menus/:menu_id/categories/order
pub async fn reorder_categories(
    State(state): State<AppState>,
    user: UserAuth,
    Path(menu_id): Path<Uuid>,
    Json(request): Json<ReorderRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate()?;
    if request.has_duplicates() {
        return Err(ApiError::Validation("ids must not repeat".to_string()));
    }

    let menu = owned_menu(&state, menu_id, user.user_id).await?;

    let repo = CategoryRepository::new(state.pool.clone());
    if !repo.reorder(menu.id, &request.positions()).await? {
        return Err(ApiError::NotFound(
            "One or more categories do not belong to this menu".to_string(),
        ));
    }

    info!(menu_id = %menu.id, count = request.ids.len(), "Categories reordered");
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/categories/:category_id
pub async fn update_category(
    State(state): State<AppState>,
    user: UserAuth,
    Path(category_id): Path<Uuid>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<Json<CategoryResponse>, ApiError> {
    request.validate()?;

    let category = owned_category(&state, category_id, user.user_id).await?;

    let repo = CategoryRepository::new(state.pool.clone());
    let entity = repo
        .update(
            category.id,
            request.name.as_deref().map(str::trim),
            as_deref_patch(&request.description),
            request.is_active,
            request.sort_order,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    info!(category_id = %category_id, "Category updated");
    Ok(Json(Category::from(entity).into()))
}

/// Delete a category and its items.
///
/// DELETE /api/v1/categories/:category_id
pub async fn delete_category(
    State(state): State<AppState>,
    user: UserAuth,
    Path(category_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let category = owned_category(&state, category_id, user.user_id).await?;

    let repo = CategoryRepository::new(state.pool.clone());
    if repo.delete(category.id).await? == 0 {
        return Err(ApiError::NotFound("Category not found".to_string()));
    }

    info!(category_id = %category_id, menu_id = %category.menu_id, "Category deleted");
    Ok(StatusCode::NO_CONTENT)
}
