//! Menu item entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::Item;

/// Database row mapping for the items table.
#[derive(Debug, Clone, FromRow)]
pub struct ItemEntity {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i32,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub is_featured: bool,
    pub dietary_tags: Vec<String>, // TEXT[]
    pub sort_order: i32,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ItemEntity> for Item {
    fn from(entity: ItemEntity) -> Self {
        Self {
            id: entity.id,
            category_id: entity.category_id,
            name: entity.name,
            description: entity.description,
            price_cents: entity.price_cents,
            image_url: entity.image_url,
            is_available: entity.is_available,
            is_featured: entity.is_featured,
            dietary_tags: entity.dietary_tags,
            sort_order: entity.sort_order,
            view_count: entity.view_count,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::lorem::en::Word;
    use fake::Fake;

    #[test]
    fn test_item_entity_to_domain_keeps_tags() {
        let now = Utc::now();
        let name: String = Word().fake();
        let entity = ItemEntity {
            id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            name: name.clone(),
            description: None,
            price_cents: 1250,
            image_url: None,
            is_available: true,
            is_featured: true,
            dietary_tags: vec!["vegan".to_string(), "gluten-free".to_string()],
            sort_order: 3,
            view_count: 17,
            created_at: now,
            updated_at: now,
        };

        let item: Item = entity.clone().into();
        assert_eq!(item.id, entity.id);
        assert_eq!(item.name, name);
        assert_eq!(item.dietary_tags, vec!["vegan", "gluten-free"]);
        assert_eq!(item.view_count, 17);
    }
}
