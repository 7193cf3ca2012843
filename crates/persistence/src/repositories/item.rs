//! Menu item repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ItemEntity;
use crate::metrics::QueryTimer;

/// Repository for item-related database operations.
#[derive(Clone)]
pub struct ItemRepository {
    pool: PgPool,
}

impl ItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an item, appended last in its category unless a position is given.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        category_id: Uuid,
        name: &str,
        description: Option<&str>,
        price_cents: i32,
        image_url: Option<&str>,
        is_available: bool,
        is_featured: bool,
        dietary_tags: &[String],
        sort_order: Option<i32>,
    ) -> Result<ItemEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_item");
        let result = sqlx::query_as::<_, ItemEntity>(
            r#"
            INSERT INTO items (category_id, name, description, price_cents, image_url,
                               is_available, is_featured, dietary_tags, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8,
                    COALESCE($9, (SELECT COALESCE(MAX(sort_order) + 1, 0)
                                  FROM items WHERE category_id = $1)))
            RETURNING *
            "#,
        )
        .bind(category_id)
        .bind(name)
        .bind(description)
        .bind(price_cents)
        .bind(image_url)
        .bind(is_available)
        .bind(is_featured)
        .bind(dietary_tags)
        .bind(sort_order)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Items of a category by position, then name.
    pub async fn find_by_category(&self, category_id: Uuid) -> Result<Vec<ItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_items_by_category");
        let result = sqlx::query_as::<_, ItemEntity>(
            r#"
            SELECT * FROM items
            WHERE category_id = $1
            ORDER BY sort_order, name
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Every item of every category of a menu.
    pub async fn find_by_menu(&self, menu_id: Uuid) -> Result<Vec<ItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_items_by_menu");
        let result = sqlx::query_as::<_, ItemEntity>(
            r#"
            SELECT i.* FROM items i
            JOIN categories c ON c.id = i.category_id
            WHERE c.menu_id = $1
            ORDER BY i.sort_order, i.name
            "#,
        )
        .bind(menu_id)
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Find an item whose restaurant belongs to `owner_id`.
    pub async fn find_for_owner(
        &self,
        item_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<ItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_item_for_owner");
        let result = sqlx::query_as::<_, ItemEntity>(
            r#"
            SELECT i.* FROM items i
            JOIN categories c ON c.id = i.category_id
            JOIN menus m ON m.id = c.menu_id
            JOIN restaurants r ON r.id = m.restaurant_id
            WHERE i.id = $1 AND r.owner_id = $2
            "#,
        )
        .bind(item_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Partial update of an item already checked for ownership. A new
    /// `category_id` moves the item.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        item_id: Uuid,
        category_id: Option<Uuid>,
        name: Option<&str>,
        description: Option<Option<&str>>,
        price_cents: Option<i32>,
        image_url: Option<Option<&str>>,
        is_available: Option<bool>,
        is_featured: Option<bool>,
        dietary_tags: Option<&[String]>,
        sort_order: Option<i32>,
    ) -> Result<Option<ItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_item");
        let result = sqlx::query_as::<_, ItemEntity>(
            r#"
            UPDATE items SET
                category_id = COALESCE($2, category_id),
                name = COALESCE($3, name),
                description = CASE WHEN $4::boolean THEN $5 ELSE description END,
                price_cents = COALESCE($6, price_cents),
                image_url = CASE WHEN $7::boolean THEN $8 ELSE image_url END,
                is_available = COALESCE($9, is_available),
                is_featured = COALESCE($10, is_featured),
                dietary_tags = COALESCE($11, dietary_tags),
                sort_order = COALESCE($12, sort_order),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(item_id)
        .bind(category_id)
        .bind(name)
        .bind(description.is_some())
        .bind(description.flatten())
        .bind(price_cents)
        .bind(image_url.is_some())
        .bind(image_url.flatten())
        .bind(is_available)
        .bind(is_featured)
        .bind(dietary_tags)
        .bind(sort_order)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    pub async fn delete(&self, item_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_item");
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(item_id)
            .execute(&self.pool)
            .await;
        timer.finish(&result);
        Ok(result?.rows_affected())
    }

    /// Rewrites the positions of a category's items in one transaction.
    ///
    /// Returns `false`, leaving every position untouched, when any id is not
    /// an item of `category_id`.
    pub async fn reorder(&self, category_id: Uuid, positions: &[(Uuid, i32)]) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("reorder_items");
        let mut tx = self.pool.begin().await?;

        for (item_id, position) in positions {
            let updated = sqlx::query(
                r#"
                UPDATE items SET sort_order = $3, updated_at = NOW()
                WHERE id = $1 AND category_id = $2
                "#,
            )
            .bind(item_id)
            .bind(category_id)
            .bind(position)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                tx.rollback().await?;
                return Ok(false);
            }
        }

        let result = tx.commit().await;
        timer.finish(&result);
        result.map(|_| true)
    }

    /// Bumps the view counter of an item that is publicly visible: available,
    /// in an active category of an active menu and restaurant.
    pub async fn increment_view(&self, item_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("increment_item_view");
        let result = sqlx::query(
            r#"
            UPDATE items i SET view_count = i.view_count + 1
            FROM categories c, menus m, restaurants r
            WHERE i.id = $1 AND i.is_available = true
              AND c.id = i.category_id AND c.is_active = true
              AND m.id = c.menu_id AND m.is_active = true
              AND r.id = m.restaurant_id AND r.is_active = true
            "#,
        )
        .bind(item_id)
        .execute(&self.pool)
        .await;
        timer.finish(&result);
        Ok(result?.rows_affected())
    }
}
