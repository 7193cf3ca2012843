//! Category repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::CategoryEntity;
use crate::metrics::QueryTimer;

/// Repository for category-related database operations.
#[derive(Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a category, appended last unless a position is given.
    pub async fn create(
        &self,
        menu_id: Uuid,
        name: &str,
        description: Option<&str>,
        is_active: bool,
        sort_order: Option<i32>,
    ) -> Result<CategoryEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_category");
        let result = sqlx::query_as::<_, CategoryEntity>(
            r#"
            INSERT INTO categories (menu_id, name, description, is_active, sort_order)
            VALUES ($1, $2, $3, $4,
                    COALESCE($5, (SELECT COALESCE(MAX(sort_order) + 1, 0)
                                  FROM categories WHERE menu_id = $1)))
            RETURNING *
            "#,
        )
        .bind(menu_id)
        .bind(name)
        .bind(description)
        .bind(is_active)
        .bind(sort_order)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Categories of a menu by position, then name.
    pub async fn find_by_menu(&self, menu_id: Uuid) -> Result<Vec<CategoryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_categories_by_menu");
        let result = sqlx::query_as::<_, CategoryEntity>(
            r#"
            SELECT * FROM categories
            WHERE menu_id = $1
            ORDER BY sort_order, name
            "#,
        )
        .bind(menu_id)
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Find a category whose restaurant belongs to `owner_id`.
    pub async fn find_for_owner(
        &self,
        category_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<CategoryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_category_for_owner");
        let result = sqlx::query_as::<_, CategoryEntity>(
            r#"
            SELECT c.* FROM categories c
            JOIN menus m ON m.id = c.menu_id
            JOIN restaurants r ON r.id = m.restaurant_id
            WHERE c.id = $1 AND r.owner_id = $2
            "#,
        )
        .bind(category_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Partial update of a category already checked for ownership.
    pub async fn update(
        &self,
        category_id: Uuid,
        name: Option<&str>,
        description: Option<Option<&str>>,
        is_active: Option<bool>,
        sort_order: Option<i32>,
    ) -> Result<Option<CategoryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_category");
        let result = sqlx::query_as::<_, CategoryEntity>(
            r#"
            UPDATE categories SET
                name = COALESCE($2, name),
                description = CASE WHEN $3::boolean THEN $4 ELSE description END,
                is_active = COALESCE($5, is_active),
                sort_order = COALESCE($6, sort_order),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(category_id)
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

    /// Delete a category and its items.
    pub async fn delete(&self, category_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_category");
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(category_id)
            .execute(&self.pool)
            .await;
        timer.finish(&result);
        Ok(result?.rows_affected())
    }

    /// Rewrites the positions of a menu's categories in one transaction.
    ///
    /// Returns `false`, leaving every position untouched, when any id is not
    /// a category of `menu_id`.
    pub async fn reorder(&self, menu_id: Uuid, positions: &[(Uuid, i32)]) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("reorder_categories");
        let mut tx = self.pool.begin().await?;

        for (category_id, position) in positions {
            let updated = sqlx::query(
                r#"
                UPDATE categories SET sort_order = $3, updated_at = NOW()
                WHERE id = $1 AND menu_id = $2
                "#,
            )
            .bind(category_id)
            .bind(menu_id)
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

    /// Bumps the view counter of an active category whose menu and
    /// restaurant are active too.
    /// Returns the number of rows touched (0 or 1).
    pub async fn increment_view(&self, category_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("increment_category_view");
        let result = sqlx::query(
            r#"
            UPDATE categories c SET view_count = c.view_count + 1
            FROM menus m, restaurants r
            WHERE c.id = $1 AND c.is_active = true
              AND m.id = c.menu_id AND m.is_active = true
              AND r.id = m.restaurant_id AND r.is_active = true
            "#,
        )
        .bind(category_id)
        .execute(&self.pool)
        .await;
        timer.finish(&result);
        Ok(result?.rows_affected())
    }
}
