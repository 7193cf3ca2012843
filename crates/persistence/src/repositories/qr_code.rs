//! QR code repository for database operations.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use domain::models::QrDesign;

use crate::entities::QrCodeEntity;
use crate::metrics::QueryTimer;

/// Row values of a QR code about to be inserted.
#[derive(Debug, Clone)]
pub struct NewQrCode {
    pub name: String,
    pub code: String,
    pub target_url: String,
}

/// Repository for QR code database operations.
#[derive(Clone)]
pub struct QrCodeRepository {
    pool: PgPool,
}

impl QrCodeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert one QR code inside the caller's transaction.
    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        menu_id: Uuid,
        restaurant_id: Uuid,
        new_code: &NewQrCode,
        design: &QrDesign,
    ) -> Result<QrCodeEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_qr_code");
        let result = sqlx::query_as::<_, QrCodeEntity>(
            r#"
            INSERT INTO qr_codes (menu_id, restaurant_id, name, code, target_url,
                                  foreground_color, background_color, margin,
                                  corner_radius, logo_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(menu_id)
        .bind(restaurant_id)
        .bind(&new_code.name)
        .bind(&new_code.code)
        .bind(&new_code.target_url)
        .bind(&design.foreground_color)
        .bind(&design.background_color)
        .bind(design.margin)
        .bind(design.corner_radius)
        .bind(design.logo_url.as_deref())
        .fetch_one(&mut **tx)
        .await;
        timer.finish(&result);
        result
    }

    /// Insert many codes sharing one design inside the caller's transaction,
    /// in a single statement. Rows come back in input order.
    pub async fn insert_batch(
        tx: &mut Transaction<'_, Postgres>,
        menu_id: Uuid,
        restaurant_id: Uuid,
        new_codes: &[NewQrCode],
        design: &QrDesign,
    ) -> Result<Vec<QrCodeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("insert_qr_code_batch");

        let names: Vec<&str> = new_codes.iter().map(|c| c.name.as_str()).collect();
        let codes: Vec<&str> = new_codes.iter().map(|c| c.code.as_str()).collect();
        let urls: Vec<&str> = new_codes.iter().map(|c| c.target_url.as_str()).collect();

        let result = sqlx::query_as::<_, QrCodeEntity>(
            r#"
            WITH input AS (
                SELECT name, code, target_url, ord
                FROM UNNEST($3::text[], $4::text[], $5::text[])
                     WITH ORDINALITY AS t(name, code, target_url, ord)
            ), inserted AS (
                INSERT INTO qr_codes (menu_id, restaurant_id, name, code, target_url,
                                      foreground_color, background_color, margin,
                                      corner_radius, logo_url)
                SELECT $1, $2, name, code, target_url, $6, $7, $8, $9, $10
                FROM input
                RETURNING *
            )
            SELECT inserted.* FROM inserted
            JOIN input ON input.code = inserted.code
            ORDER BY input.ord
            "#,
        )
        .bind(menu_id)
        .bind(restaurant_id)
        .bind(&names)
        .bind(&codes)
        .bind(&urls)
        .bind(&design.foreground_color)
        .bind(&design.background_color)
        .bind(design.margin)
        .bind(design.corner_radius)
        .bind(design.logo_url.as_deref())
        .fetch_all(&mut **tx)
        .await;
        timer.finish(&result);
        result
    }

    pub async fn count_by_menu(&self, menu_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_qr_codes_by_menu");
        let result: Result<(i64,), sqlx::Error> =
            sqlx::query_as("SELECT COUNT(*) FROM qr_codes WHERE menu_id = $1")
                .bind(menu_id)
                .fetch_one(&self.pool)
                .await;
        timer.finish(&result);
        Ok(result?.0)
    }

    /// Lock the menu row for the rest of the transaction and count its codes.
    ///
    /// Concurrent writers for the same menu queue on the lock, so the count
    /// stays accurate until the caller commits or rolls back.
    pub async fn lock_menu_and_count(
        tx: &mut Transaction<'_, Postgres>,
        menu_id: Uuid,
    ) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("lock_menu_and_count_qr_codes");
        let result: Result<(i64,), sqlx::Error> = sqlx::query_as(
            r#"
            SELECT COUNT(q.id)
            FROM (SELECT id FROM menus WHERE id = $1 FOR UPDATE) m
            LEFT JOIN qr_codes q ON q.menu_id = m.id
            "#,
        )
        .bind(menu_id)
        .fetch_one(&mut **tx)
        .await;
        timer.finish(&result);
        Ok(result?.0)
    }

    /// QR codes of a menu, oldest first.
    pub async fn find_by_menu(&self, menu_id: Uuid) -> Result<Vec<QrCodeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_qr_codes_by_menu");
        let result = sqlx::query_as::<_, QrCodeEntity>(
            r#"
            SELECT * FROM qr_codes
            WHERE menu_id = $1
            ORDER BY created_at, name
            "#,
        )
        .bind(menu_id)
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Find a QR code whose restaurant belongs to `owner_id`.
    pub async fn find_for_owner(
        &self,
        qr_code_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<QrCodeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_qr_code_for_owner");
        let result = sqlx::query_as::<_, QrCodeEntity>(
            r#"
            SELECT q.* FROM qr_codes q
            JOIN restaurants r ON r.id = q.restaurant_id
            WHERE q.id = $1 AND r.owner_id = $2
            "#,
        )
        .bind(qr_code_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Rename and/or replace the design of a code already checked for
    /// ownership. A design replaces every design column, logo included.
    pub async fn update(
        &self,
        qr_code_id: Uuid,
        name: Option<&str>,
        design: Option<&QrDesign>,
    ) -> Result<Option<QrCodeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_qr_code");
        let result = sqlx::query_as::<_, QrCodeEntity>(
            r#"
            UPDATE qr_codes SET
                name = COALESCE($2, name),
                foreground_color = CASE WHEN $3 THEN $4 ELSE foreground_color END,
                background_color = CASE WHEN $3 THEN $5 ELSE background_color END,
                margin = CASE WHEN $3 THEN $6 ELSE margin END,
                corner_radius = CASE WHEN $3 THEN $7 ELSE corner_radius END,
                logo_url = CASE WHEN $3 THEN $8 ELSE logo_url END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(qr_code_id)
        .bind(name)
        .bind(design.is_some())
        .bind(design.map(|d| d.foreground_color.as_str()))
        .bind(design.map(|d| d.background_color.as_str()))
        .bind(design.map(|d| d.margin))
        .bind(design.map(|d| d.corner_radius))
        .bind(design.and_then(|d| d.logo_url.as_deref()))
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    pub async fn delete(&self, qr_code_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_qr_code");
        let result = sqlx::query("DELETE FROM qr_codes WHERE id = $1")
            .bind(qr_code_id)
            .execute(&self.pool)
            .await;
        timer.finish(&result);
        Ok(result?.rows_affected())
    }

    /// Counts a scan of `code` on `menu_id`. Returns the matching code's id,
    /// or `None` when the menu has no such code.
    pub async fn record_scan(&self, menu_id: Uuid, code: &str) -> Result<Option<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("record_qr_scan");
        let result: Result<Option<(Uuid,)>, sqlx::Error> = sqlx::query_as(
            r#"
            UPDATE qr_codes SET scan_count = scan_count + 1
            WHERE menu_id = $1 AND code = $2
            RETURNING id
            "#,
        )
        .bind(menu_id)
        .bind(code)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        Ok(result?.map(|(id,)| id))
    }
}
