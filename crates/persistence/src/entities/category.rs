//! Category entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::Category;

/// Database row mapping for the categories table.
#[derive(Debug, Clone, FromRow)]
pub struct CategoryEntity {
    pub id: Uuid,
    pub menu_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CategoryEntity> for Category {
    fn from(entity: CategoryEntity) -> Self {
        Self {
            id: entity.id,
            menu_id: entity.menu_id,
            name: entity.name,
            description: entity.description,
            is_active: entity.is_active,
            sort_order: entity.sort_order,
            view_count: entity.view_count,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
