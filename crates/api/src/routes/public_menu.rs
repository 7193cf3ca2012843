//! Public menu endpoints, reached by scanning a QR code or following a link.
//!
//! No authentication. Every menu view is logged as an analytics event;
//! logging is best-effort and never fails the page.

use axum::{
    extract::{Path, Query, State},
    http::{header::USER_AGENT, HeaderMap, StatusCode},
    Json,
};
use persistence::repositories::{
    AnalyticsRepository, CategoryRepository, ItemRepository, MenuRepository, NewAnalyticsEvent,
    QrCodeRepository, RestaurantRepository,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_menu_scan;
use domain::models::{
    Category, Item, Menu, PublicMenuQuery, PublicMenuResponse, Restaurant,
};
use domain::services::{classify_device, resolve_source};

/// Active menu with its active restaurant.
///
/// GET /api/v1/public/menus/:menu_id?qr=&source=
pub async fn get_public_menu(
    State(state): State<AppState>,
    Path(menu_id): Path<Uuid>,
    Query(query): Query<PublicMenuQuery>,
    headers: HeaderMap,
) -> Result<Json<PublicMenuResponse>, ApiError> {
    let menu: Menu = MenuRepository::new(state.pool.clone())
        .find_by_id(menu_id)
        .await?
        .map(Menu::from)
        .filter(|m| m.is_active)
        .ok_or_else(|| ApiError::NotFound("Menu not found".to_string()))?;

    let restaurant: Restaurant = RestaurantRepository::new(state.pool.clone())
        .find_by_id(menu.restaurant_id)
        .await?
        .map(Restaurant::from)
        .filter(|r| r.is_active)
        .ok_or_else(|| ApiError::NotFound("Menu not found".to_string()))?;

    let category_repo = CategoryRepository::new(state.pool.clone());
    let item_repo = ItemRepository::new(state.pool.clone());
    let (categories, items) = tokio::try_join!(
        category_repo.find_by_menu(menu.id),
        item_repo.find_by_menu(menu.id)
    )?;

    let user_agent = headers.get(USER_AGENT).and_then(|v| v.to_str().ok());
    record_visit(&state, &menu, &query, user_agent).await;

    Ok(Json(PublicMenuResponse::assemble(
        restaurant,
        menu,
        categories.into_iter().map(Category::from).collect(),
        items.into_iter().map(Item::from).collect(),
    )))
}

/// Logs one menu view and, for a known QR code, bumps its scan count.
async fn record_visit(
    state: &AppState,
    menu: &Menu,
    query: &PublicMenuQuery,
    user_agent: Option<&str>,
) {
    let qr = query.qr.as_deref().map(str::trim).filter(|q| !q.is_empty());
    let source = resolve_source(qr, query.source.as_deref());
    let device_type = classify_device(user_agent);

    let qr_code_id = match qr {
        Some(code) => match QrCodeRepository::new(state.pool.clone())
            .record_scan(menu.id, code)
            .await
        {
            Ok(Some(id)) => Some(id),
            Ok(None) => {
                debug!(menu_id = %menu.id, code, "Scan of unknown QR code");
                None
            }
            Err(e) => {
                warn!(menu_id = %menu.id, error = %e, "Failed to count QR scan");
                None
            }
        },
        None => None,
    };

    let event = NewAnalyticsEvent {
        restaurant_id: menu.restaurant_id,
        menu_id: menu.id,
        qr_code_id,
        device_type,
        source,
        user_agent,
    };
    if let Err(e) = AnalyticsRepository::new(state.pool.clone())
        .insert_event(&event)
        .await
    {
        warn!(menu_id = %menu.id, error = %e, "Failed to log menu view");
    }

    record_menu_scan(source.as_str());
}

/// POST /api/v1/public/items/:item_id/view
pub async fn record_item_view(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = ItemRepository::new(state.pool.clone());
    if repo.increment_view(item_id).await? == 0 {
        return Err(ApiError::NotFound("Item not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/public/categories/:category_id/view
pub async fn record_category_view(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = CategoryRepository::new(state.pool.clone());
    if repo.increment_view(category_id).await? == 0 {
        return Err(ApiError::NotFound("Category not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
