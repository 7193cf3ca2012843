//! Menu entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::Menu;

/// Database row mapping for the menus table.
#[derive(Debug, Clone, FromRow)]
pub struct MenuEntity {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MenuEntity> for Menu {
    fn from(entity: MenuEntity) -> Self {
        Self {
            id: entity.id,
            restaurant_id: entity.restaurant_id,
            name: entity.name,
            description: entity.description,
            is_active: entity.is_active,
            sort_order: entity.sort_order,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
