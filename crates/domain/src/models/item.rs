//! Menu item domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A dish or drink listed in a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Price in the restaurant currency's minor unit
    pub price_cents: i32,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub is_featured: bool,
    pub dietary_tags: Vec<String>,
    pub sort_order: i32,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_available() -> bool {
    true
}

/// Request payload for creating an item.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateItemRequest {
    #[validate(
        length(min = 1, max = 120, message = "Name must be 1-120 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[validate(range(min = 0, max = 10_000_000, message = "Price must be between 0 and 10000000"))]
    pub price_cents: i32,

    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,

    #[serde(default = "default_available")]
    pub is_available: bool,

    #[serde(default)]
    pub is_featured: bool,

    #[serde(default)]
    #[validate(custom(function = "shared::validation::validate_tags"))]
    pub dietary_tags: Vec<String>,

    #[validate(range(min = 0, message = "Sort order must be non-negative"))]
    pub sort_order: Option<i32>,
}

/// Request payload for updating an item (partial update).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateItemRequest {
    #[validate(
        length(min = 1, max = 120, message = "Name must be 1-120 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: Option<String>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    #[serde(default, deserialize_with = "shared::patch::double_option")]
    pub description: Option<Option<String>>,

    #[validate(range(min = 0, max = 10_000_000, message = "Price must be between 0 and 10000000"))]
    pub price_cents: Option<i32>,

    #[validate(url(message = "Image URL must be a valid URL"))]
    #[serde(default, deserialize_with = "shared::patch::double_option")]
    pub image_url: Option<Option<String>>,

    pub is_available: Option<bool>,

    pub is_featured: Option<bool>,

    #[validate(custom(function = "shared::validation::validate_tags"))]
    pub dietary_tags: Option<Vec<String>>,

    #[validate(range(min = 0, message = "Sort order must be non-negative"))]
    pub sort_order: Option<i32>,

    /// Moves the item to another category of the same menu.
    pub category_id: Option<Uuid>,
}

/// Response payload for item operations.
#[derive(Debug, Clone, Serialize)]
pub struct ItemResponse {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price_cents: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub is_available: bool,
    pub is_featured: bool,
    pub dietary_tags: Vec<String>,
    pub sort_order: i32,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Item> for ItemResponse {
    fn from(i: Item) -> Self {
        Self {
            id: i.id,
            category_id: i.category_id,
            name: i.name,
            description: i.description,
            price_cents: i.price_cents,
            image_url: i.image_url,
            is_available: i.is_available,
            is_featured: i.is_featured,
            dietary_tags: i.dietary_tags,
            sort_order: i.sort_order,
            view_count: i.view_count,
            created_at: i.created_at,
            updated_at: i.updated_at,
        }
    }
}

/// Response for listing items.
#[derive(Debug, Clone, Serialize)]
pub struct ListItemsResponse {
    pub items: Vec<ItemResponse>,
    pub total: usize,
}
