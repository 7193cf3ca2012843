//! QR code entity (database row mapping).
//!
//! The design record is stored as flat columns.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{QrCode, QrDesign};

/// Database row mapping for the qr_codes table.
#[derive(Debug, Clone, FromRow)]
pub struct QrCodeEntity {
    pub id: Uuid,
    pub menu_id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub code: String,
    pub target_url: String,
    pub foreground_color: String,
    pub background_color: String,
    pub margin: i32,
    pub corner_radius: i32,
    pub logo_url: Option<String>,
    pub scan_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<QrCodeEntity> for QrCode {
    fn from(entity: QrCodeEntity) -> Self {
        Self {
            id: entity.id,
            menu_id: entity.menu_id,
            restaurant_id: entity.restaurant_id,
            name: entity.name,
            code: entity.code,
            target_url: entity.target_url,
            design: QrDesign {
                foreground_color: entity.foreground_color,
                background_color: entity.background_color,
                margin: entity.margin,
                corner_radius: entity.corner_radius,
                logo_url: entity.logo_url,
            },
            scan_count: entity.scan_count,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
