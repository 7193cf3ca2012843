//! Database metrics collection.

use metrics::{counter, gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Records the duration of one query, labelled by outcome.
pub fn record_query_duration(query_name: &'static str, outcome: &'static str, duration_secs: f64) {
    histogram!(
        "database_query_duration_seconds",
        "query" => query_name,
        "outcome" => outcome
    )
    .record(duration_secs);

    if outcome == "error" {
        counter!("database_query_errors_total", "query" => query_name).increment(1);
    }
}

/// Records connection pool gauges.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();

    gauge!("database_connections_active").set(size.saturating_sub(idle) as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_total").set(size as f64);
}

/// Times a repository query.
///
/// ```ignore
/// let timer = QueryTimer::new("find_menu_for_owner");
/// let result = sqlx::query_as::<_, MenuEntity>(...).fetch_optional(&self.pool).await;
/// timer.finish(&result);
/// result
/// ```
pub struct QueryTimer {
    query_name: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query_name: &'static str) -> Self {
        Self {
            query_name,
            start: Instant::now(),
        }
    }

    /// Records the elapsed time and whether the query succeeded.
    pub fn finish<T>(self, result: &Result<T, sqlx::Error>) {
        let outcome = if result.is_ok() { "ok" } else { "error" };
        record_query_duration(self.query_name, outcome, self.start.elapsed().as_secs_f64());
    }
}
