//! Restaurant entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::Restaurant;

/// Database row mapping for the restaurants table.
#[derive(Debug, Clone, FromRow)]
pub struct RestaurantEntity {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub logo_url: Option<String>,
    pub currency: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RestaurantEntity> for Restaurant {
    fn from(entity: RestaurantEntity) -> Self {
        Self {
            id: entity.id,
            owner_id: entity.owner_id,
            name: entity.name,
            description: entity.description,
            address: entity.address,
            phone: entity.phone,
            logo_url: entity.logo_url,
            currency: entity.currency,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
