//! Analytics dashboard handler.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{NaiveTime, Utc};
use persistence::entities::PopularEntryRow;
use persistence::repositories::{AnalyticsRepository, AnalyticsScope};
use tracing::{debug, error};
use validator::Validate;

use super::{owned_menu, owned_restaurant};
use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use domain::models::{AnalyticsEvent, AnalyticsQuery, AnalyticsResponse, AnalyticsSummary, PopularEntry};
use domain::services::{aggregate_events, period_for, rank_popular};

/// Scan analytics for the owner, optionally narrowed to a restaurant or menu.
///
/// GET /api/v1/analytics?range=week|month|year&restaurant_id=&menu_id=&limit=
pub async fn get_analytics(
    State(state): State<AppState>,
    user: UserAuth,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsResponse>, ApiError> {
    query.validate()?;

    // Filters naming another owner's resources answer 404
    if let Some(restaurant_id) = query.restaurant_id {
        owned_restaurant(&state, restaurant_id, user.user_id).await?;
    }
    if let Some(menu_id) = query.menu_id {
        owned_menu(&state, menu_id, user.user_id).await?;
    }

    let scope = AnalyticsScope {
        owner_id: user.user_id,
        restaurant_id: query.restaurant_id,
        menu_id: query.menu_id,
    };
    let period = period_for(query.range, Utc::now().date_naive());
    let since = period.start.and_time(NaiveTime::MIN).and_utc();

    let repo = AnalyticsRepository::new(state.pool.clone());
    let (events, item_views, category_views, qr_totals, top_qr_codes) = tokio::try_join!(
        repo.events_since(scope, since),
        repo.item_views(scope),
        repo.category_views(scope),
        repo.qr_totals(scope),
        repo.top_qr_codes(scope, query.limit as i64)
    )
    .map_err(|e| {
        error!(owner_id = %user.user_id, error = %e, "Analytics query failed");
        ApiError::from(e)
    })?;

    let events: Vec<AnalyticsEvent> = events.into_iter().map(Into::into).collect();
    let aggregate = aggregate_events(&events, &period);
    debug!(
        owner_id = %user.user_id,
        events = events.len(),
        range = ?query.range,
        "Analytics aggregated"
    );

    let ranked = |rows: Vec<PopularEntryRow>| {
        rank_popular(rows.into_iter().map(PopularEntry::from).collect(), query.limit)
    };

    Ok(Json(AnalyticsResponse {
        range: query.range,
        period,
        summary: AnalyticsSummary {
            total_scans: aggregate.total_scans,
            qr_scans: aggregate.qr_scans,
            total_qr_codes: qr_totals.total_qr_codes,
            lifetime_qr_scans: qr_totals.lifetime_qr_scans,
        },
        daily: aggregate.daily,
        by_device: aggregate.by_device,
        by_source: aggregate.by_source,
        popular_items: ranked(item_views),
        popular_categories: ranked(category_views),
        top_qr_codes: top_qr_codes.into_iter().map(PopularEntry::from).collect(),
    }))
}
