use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use shared::jwt::{JwtConfig, JwtError};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, owner_rate_limit, public_rate_limit, require_user_auth,
    security_headers_middleware, trace_id, OwnerRateLimiter, PublicRateLimiter,
};
use crate::routes::{
    analytics, categories, health, items, menus, public_menu, qr_codes, restaurants,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
    pub rate_limiter: Option<Arc<OwnerRateLimiter>>,
    pub public_rate_limiter: Option<Arc<PublicRateLimiter>>,
}

pub fn create_app(config: Config, pool: PgPool) -> Result<Router, JwtError> {
    let config = Arc::new(config);

    let jwt = JwtConfig::new(
        &config.auth.jwt_secret,
        config.jwt_audience().map(str::to_string),
        config.auth.leeway_secs,
    )?;

    // A limit of 0 disables the corresponding limiter
    let state = AppState {
        pool,
        config: config.clone(),
        jwt: Arc::new(jwt),
        rate_limiter: OwnerRateLimiter::new(config.security.rate_limit_per_minute).map(Arc::new),
        public_rate_limiter: PublicRateLimiter::new(config.security.public_rate_limit_per_minute)
            .map(Arc::new),
    };

    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Owner routes: auth runs first, then the per-owner rate limit
    let owner_routes = Router::new()
        .route(
            "/api/v1/restaurants",
            post(restaurants::create_restaurant).get(restaurants::list_restaurants),
        )
        .route(
            "/api/v1/restaurants/:restaurant_id",
            get(restaurants::get_restaurant)
                .patch(restaurants::update_restaurant)
                .delete(restaurants::delete_restaurant),
        )
        .route(
            "/api/v1/restaurants/:restaurant_id/menus",
            post(menus::create_menu).get(menus::list_menus),
        )
        .route(
            "/api/v1/menus/:menu_id",
            get(menus::get_menu)
                .patch(menus::update_menu)
                .delete(menus::delete_menu),
        )
        .route(
            "/api/v1/menus/:menu_id/categories",
            post(categories::create_category).get(categories::list_categories),
        )
        .route(
            "/api/v1/menus/:menu_id/categories/order",
            put(categories::reorder_categories),
        )
        .route(
            "/api/v1/categories/:category_id",
            patch(categories::update_category).delete(categories::delete_category),
        )
        .route(
            "/api/v1/categories/:category_id/items",
            post(items::create_item).get(items::list_items),
        )
        .route(
            "/api/v1/categories/:category_id/items/order",
            put(items::reorder_items),
        )
        .route(
            "/api/v1/items/:item_id",
            get(items::get_item)
                .patch(items::update_item)
                .delete(items::delete_item),
        )
        .route(
            "/api/v1/menus/:menu_id/qr-codes",
            post(qr_codes::create_qr_code).get(qr_codes::list_qr_codes),
        )
        .route(
            "/api/v1/menus/:menu_id/qr-codes/batch",
            post(qr_codes::generate_batch),
        )
        .route(
            "/api/v1/qr-codes/:qr_code_id",
            get(qr_codes::get_qr_code)
                .patch(qr_codes::update_qr_code)
                .delete(qr_codes::delete_qr_code),
        )
        .route(
            "/api/v1/qr-codes/:qr_code_id/export",
            get(qr_codes::export_qr_code),
        )
        .route("/api/v1/analytics", get(analytics::get_analytics))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            owner_rate_limit,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Public menu routes (no authentication, limited per client address)
    let public_menu_routes = Router::new()
        .route("/api/v1/public/menus/:menu_id", get(public_menu::get_public_menu))
        .route(
            "/api/v1/public/items/:item_id/view",
            post(public_menu::record_item_view),
        )
        .route(
            "/api/v1/public/categories/:category_id/view",
            post(public_menu::record_category_view),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            public_rate_limit,
        ));

    let health_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Ok(Router::new()
        .merge(health_routes)
        .merge(public_menu_routes)
        .merge(owner_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state))
}
