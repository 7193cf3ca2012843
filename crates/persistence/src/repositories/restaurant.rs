//! Restaurant repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::RestaurantEntity;
use crate::metrics::QueryTimer;

/// Repository for restaurant-related database operations.
#[derive(Clone)]
pub struct RestaurantRepository {
    pool: PgPool,
}

impl RestaurantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a restaurant for an owner.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        owner_id: Uuid,
        name: &str,
        description: Option<&str>,
        address: Option<&str>,
        phone: Option<&str>,
        logo_url: Option<&str>,
        currency: &str,
        is_active: bool,
    ) -> Result<RestaurantEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_restaurant");
        let result = sqlx::query_as::<_, RestaurantEntity>(
            r#"
            INSERT INTO restaurants (owner_id, name, description, address, phone, logo_url,
                                     currency, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(name)
        .bind(description)
        .bind(address)
        .bind(phone)
        .bind(logo_url)
        .bind(currency)
        .bind(is_active)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// List an owner's restaurants, alphabetically.
    pub async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<RestaurantEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_restaurants_by_owner");
        let result = sqlx::query_as::<_, RestaurantEntity>(
            r#"
            SELECT * FROM restaurants
            WHERE owner_id = $1
            ORDER BY name, created_at
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Count an owner's restaurants.
    pub async fn count_by_owner(&self, owner_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_restaurants_by_owner");
        let result: Result<(i64,), sqlx::Error> =
            sqlx::query_as("SELECT COUNT(*) FROM restaurants WHERE owner_id = $1")
                .bind(owner_id)
                .fetch_one(&self.pool)
                .await;
        timer.finish(&result);
        Ok(result?.0)
    }

    /// Find a restaurant by id, only if it belongs to `owner_id`.
    pub async fn find_for_owner(
        &self,
        restaurant_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<RestaurantEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_restaurant_for_owner");
        let result = sqlx::query_as::<_, RestaurantEntity>(
            "SELECT * FROM restaurants WHERE id = $1 AND owner_id = $2",
        )
        .bind(restaurant_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Find a restaurant by id regardless of owner (public menu).
    pub async fn find_by_id(&self, restaurant_id: Uuid) -> Result<Option<RestaurantEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_restaurant_by_id");
        let result = sqlx::query_as::<_, RestaurantEntity>("SELECT * FROM restaurants WHERE id = $1")
            .bind(restaurant_id)
            .fetch_optional(&self.pool)
            .await;
        timer.finish(&result);
        result
    }

    /// Partial update; `None` keeps the stored value and `Some(None)` clears
    /// a nullable column.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        restaurant_id: Uuid,
        owner_id: Uuid,
        name: Option<&str>,
        description: Option<Option<&str>>,
        address: Option<Option<&str>>,
        phone: Option<Option<&str>>,
        logo_url: Option<Option<&str>>,
        currency: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<Option<RestaurantEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_restaurant");
        let result = sqlx::query_as::<_, RestaurantEntity>(
            r#"
            UPDATE restaurants SET
                name = COALESCE($3, name),
                description = CASE WHEN $4::boolean THEN $5 ELSE description END,
                address = CASE WHEN $6::boolean THEN $7 ELSE address END,
                phone = CASE WHEN $8::boolean THEN $9 ELSE phone END,
                logo_url = CASE WHEN $10::boolean THEN $11 ELSE logo_url END,
                currency = COALESCE($12, currency),
                is_active = COALESCE($13, is_active),
                updated_at = NOW()
            WHERE id = $1 AND owner_id = $2
            RETURNING *
            "#,
        )
        .bind(restaurant_id)
        .bind(owner_id)
        .bind(name)
        .bind(description.is_some())
        .bind(description.flatten())
        .bind(address.is_some())
        .bind(address.flatten())
        .bind(phone.is_some())
        .bind(phone.flatten())
        .bind(logo_url.is_some())
        .bind(logo_url.flatten())
        .bind(currency)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Delete a restaurant and, by cascade, everything under it.
    /// Returns the number of rows deleted (0 or 1).
    pub async fn delete(&self, restaurant_id: Uuid, owner_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_restaurant");
        let result = sqlx::query("DELETE FROM restaurants WHERE id = $1 AND owner_id = $2")
            .bind(restaurant_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await;
        timer.finish(&result);
        Ok(result?.rows_affected())
    }
}
