//! Analytics repository: scan event log and dashboard reads.
//!
//! Every read is restricted to one owner and optionally narrowed to a
//! restaurant and/or a menu.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{DeviceType, ScanSource};

use crate::entities::{AnalyticsEventEntity, PopularEntryRow, QrTotalsRow};
use crate::metrics::QueryTimer;

/// Longest User-Agent stored with an event.
const MAX_USER_AGENT_LEN: usize = 512;

/// Owner plus optional narrowing filters.
#[derive(Debug, Clone, Copy)]
pub struct AnalyticsScope {
    pub owner_id: Uuid,
    pub restaurant_id: Option<Uuid>,
    pub menu_id: Option<Uuid>,
}

/// One public menu view to log.
#[derive(Debug, Clone)]
pub struct NewAnalyticsEvent<'a> {
    pub restaurant_id: Uuid,
    pub menu_id: Uuid,
    pub qr_code_id: Option<Uuid>,
    pub device_type: DeviceType,
    pub source: ScanSource,
    pub user_agent: Option<&'a str>,
}

fn truncate_user_agent(ua: &str) -> &str {
    if ua.len() <= MAX_USER_AGENT_LEN {
        return ua;
    }
    let mut end = MAX_USER_AGENT_LEN;
    while !ua.is_char_boundary(end) {
        end -= 1;
    }
    &ua[..end]
}

/// Repository for analytics database operations.
#[derive(Clone)]
pub struct AnalyticsRepository {
    pool: PgPool,
}

impl AnalyticsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append one event.
    pub async fn insert_event(&self, event: &NewAnalyticsEvent<'_>) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("insert_analytics_event");
        let result = sqlx::query(
            r#"
            INSERT INTO analytics_events (restaurant_id, menu_id, qr_code_id, device_type,
                                          source, user_agent)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(event.restaurant_id)
        .bind(event.menu_id)
        .bind(event.qr_code_id)
        .bind(event.device_type.as_str())
        .bind(event.source.as_str())
        .bind(event.user_agent.map(truncate_user_agent))
        .execute(&self.pool)
        .await;
        timer.finish(&result);
        result.map(|_| ())
    }

    /// Events in scope created at or after `since`.
    pub async fn events_since(
        &self,
        scope: AnalyticsScope,
        since: DateTime<Utc>,
    ) -> Result<Vec<AnalyticsEventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_analytics_events_since");
        let result = sqlx::query_as::<_, AnalyticsEventEntity>(
            r#"
            SELECT e.id, e.restaurant_id, e.menu_id, e.qr_code_id, e.device_type,
                   e.source, e.created_at
            FROM analytics_events e
            JOIN restaurants r ON r.id = e.restaurant_id
            WHERE r.owner_id = $1
              AND ($2::uuid IS NULL OR e.restaurant_id = $2)
              AND ($3::uuid IS NULL OR e.menu_id = $3)
              AND e.created_at >= $4
            ORDER BY e.created_at
            "#,
        )
        .bind(scope.owner_id)
        .bind(scope.restaurant_id)
        .bind(scope.menu_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Item view counters in scope, ordered by name.
    pub async fn item_views(&self, scope: AnalyticsScope) -> Result<Vec<PopularEntryRow>, sqlx::Error> {
        let timer = QueryTimer::new("find_item_views");
        let result = sqlx::query_as::<_, PopularEntryRow>(
            r#"
            SELECT i.id, i.name, i.view_count AS views
            FROM items i
            JOIN categories c ON c.id = i.category_id
            JOIN menus m ON m.id = c.menu_id
            JOIN restaurants r ON r.id = m.restaurant_id
            WHERE r.owner_id = $1
              AND ($2::uuid IS NULL OR r.id = $2)
              AND ($3::uuid IS NULL OR m.id = $3)
            ORDER BY i.name, i.id
            "#,
        )
        .bind(scope.owner_id)
        .bind(scope.restaurant_id)
        .bind(scope.menu_id)
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Category view counters in scope, ordered by name.
    pub async fn category_views(&self, scope: AnalyticsScope) -> Result<Vec<PopularEntryRow>, sqlx::Error> {
        let timer = QueryTimer::new("find_category_views");
        let result = sqlx::query_as::<_, PopularEntryRow>(
            r#"
            SELECT c.id, c.name, c.view_count AS views
            FROM categories c
            JOIN menus m ON m.id = c.menu_id
            JOIN restaurants r ON r.id = m.restaurant_id
            WHERE r.owner_id = $1
              AND ($2::uuid IS NULL OR r.id = $2)
              AND ($3::uuid IS NULL OR m.id = $3)
            ORDER BY c.name, c.id
            "#,
        )
        .bind(scope.owner_id)
        .bind(scope.restaurant_id)
        .bind(scope.menu_id)
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Number of QR codes in scope and the sum of their scan counters.
    pub async fn qr_totals(&self, scope: AnalyticsScope) -> Result<QrTotalsRow, sqlx::Error> {
        let timer = QueryTimer::new("find_qr_totals");
        let result = sqlx::query_as::<_, QrTotalsRow>(
            r#"
            SELECT COUNT(*)::bigint AS total_qr_codes,
                   COALESCE(SUM(q.scan_count), 0)::bigint AS lifetime_qr_scans
            FROM qr_codes q
            JOIN restaurants r ON r.id = q.restaurant_id
            WHERE r.owner_id = $1
              AND ($2::uuid IS NULL OR q.restaurant_id = $2)
              AND ($3::uuid IS NULL OR q.menu_id = $3)
            "#,
        )
        .bind(scope.owner_id)
        .bind(scope.restaurant_id)
        .bind(scope.menu_id)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Most scanned QR codes in scope.
    pub async fn top_qr_codes(
        &self,
        scope: AnalyticsScope,
        limit: i64,
    ) -> Result<Vec<PopularEntryRow>, sqlx::Error> {
        let timer = QueryTimer::new("find_top_qr_codes");
        let result = sqlx::query_as::<_, PopularEntryRow>(
            r#"
            SELECT q.id, q.name, q.scan_count AS views
            FROM qr_codes q
            JOIN restaurants r ON r.id = q.restaurant_id
            WHERE r.owner_id = $1
              AND ($2::uuid IS NULL OR q.restaurant_id = $2)
              AND ($3::uuid IS NULL OR q.menu_id = $3)
            ORDER BY q.scan_count DESC, q.name, q.id
            LIMIT $4
            "#,
        )
        .bind(scope.owner_id)
        .bind(scope.restaurant_id)
        .bind(scope.menu_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_user_agent() {
        assert_eq!(truncate_user_agent("curl/8"), "curl/8");

        let long = "é".repeat(400);
        let cut = truncate_user_agent(&long);
        assert!(cut.len() <= MAX_USER_AGENT_LEN);
        assert_eq!(cut.chars().count(), 256);
    }
}
