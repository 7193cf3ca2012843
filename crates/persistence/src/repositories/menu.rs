//! Menu repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::MenuEntity;
use crate::metrics::QueryTimer;

/// Repository for menu-related database operations.
#[derive(Clone)]
pub struct MenuRepository {
    pool: PgPool,
}

impl MenuRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a menu. Without an explicit position the menu is appended
    /// after the restaurant's existing menus.
    pub async fn create(
        &self,
        restaurant_id: Uuid,
        name: &str,
        description: Option<&str>,
        is_active: bool,
        sort_order: Option<i32>,
    ) -> Result<MenuEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_menu");
        let result = sqlx::query_as::<_, MenuEntity>(
            r#"
            INSERT INTO menus (restaurant_id, name, description, is_active, sort_order)
            VALUES ($1, $2, $3, $4,
                    COALESCE($5, (SELECT COALESCE(MAX(sort_order) + 1, 0)
                                  FROM menus WHERE restaurant_id = $1)))
            RETURNING *
            "#,
        )
        .bind(restaurant_id)
        .bind(name)
        .bind(description)
        .bind(is_active)
        .bind(sort_order)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Menus of a restaurant by position, then name.
    pub async fn find_by_restaurant(&self, restaurant_id: Uuid) -> Result<Vec<MenuEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_menus_by_restaurant");
        let result = sqlx::query_as::<_, MenuEntity>(
            r#"
            SELECT * FROM menus
            WHERE restaurant_id = $1
            ORDER BY sort_order, name
            "#,
        )
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Find a menu whose restaurant belongs to `owner_id`.
    pub async fn find_for_owner(
        &self,
        menu_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<MenuEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_menu_for_owner");
        let result = sqlx::query_as::<_, MenuEntity>(
            r#"
            SELECT m.* FROM menus m
            JOIN restaurants r ON r.id = m.restaurant_id
            WHERE m.id = $1 AND r.owner_id = $2
            "#,
        )
        .bind(menu_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Find a menu by id regardless of owner (public menu).
    pub async fn find_by_id(&self, menu_id: Uuid) -> Result<Option<MenuEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_menu_by_id");
        let result = sqlx::query_as::<_, MenuEntity>("SELECT * FROM menus WHERE id = $1")
            .bind(menu_id)
            .fetch_optional(&self.pool)
            .await;
        timer.finish(&result);
        result
    }

    /// Partial update scoped to the owner.
    pub async fn update(
        &self,
        menu_id: Uuid,
        owner_id: Uuid,
        name: Option<&str>,
        description: Option<Option<&str>>,
        is_active: Option<bool>,
        sort_order: Option<i32>,
    ) -> Result<Option<MenuEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_menu");
        let result = sqlx::query_as::<_, MenuEntity>(
            r#"
            UPDATE menus m SET
                name = COALESCE($3, m.name),
                description = CASE WHEN $4::boolean THEN $5 ELSE m.description END,
                is_active = COALESCE($6, m.is_active),
                sort_order = COALESCE($7, m.sort_order),
                updated_at = NOW()
            FROM restaurants r
            WHERE m.id = $1 AND r.id = m.restaurant_id AND r.owner_id = $2
            RETURNING m.*
            "#,
        )
        .bind(menu_id)
        .bind(owner_id)
        .bind(name)
        .bind(description.is_some())
        .bind(description.flatten())
        .bind(is_active)
        .bind(sort_order)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Delete a menu with its categories, items and QR codes.
    pub async fn delete(&self, menu_id: Uuid, owner_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_menu");
        let result = sqlx::query(
            r#"
            DELETE FROM menus m
            USING restaurants r
            WHERE m.id = $1 AND r.id = m.restaurant_id AND r.owner_id = $2
            "#,
        )
        .bind(menu_id)
        .bind(owner_id)
        .execute(&self.pool)
        .await;
        timer.finish(&result);
        Ok(result?.rows_affected())
    }
}
