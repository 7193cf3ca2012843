//! Menu domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A menu belonging to a restaurant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Menu {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

/// Request payload for creating a menu.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMenuRequest {
    #[validate(
        length(min = 1, max = 120, message = "Name must be 1-120 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: String,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    #[serde(default = "default_active")]
    pub is_active: bool,

    #[validate(range(min = 0, message = "Sort order must be non-negative"))]
    pub sort_order: Option<i32>,
}

/// Request payload for updating a menu (partial update).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateMenuRequest {
    #[validate(
        length(min = 1, max = 120, message = "Name must be 1-120 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: Option<String>,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    #[serde(default, deserialize_with = "shared::patch::double_option")]
    pub description: Option<Option<String>>,

    pub is_active: Option<bool>,

    #[validate(range(min = 0, message = "Sort order must be non-negative"))]
    pub sort_order: Option<i32>,
}

/// Response payload for menu operations.
#[derive(Debug, Clone, Serialize)]
pub struct MenuResponse {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Menu> for MenuResponse {
    fn from(m: Menu) -> Self {
        Self {
            id: m.id,
            restaurant_id: m.restaurant_id,
            name: m.name,
            description: m.description,
            is_active: m.is_active,
            sort_order: m.sort_order,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Response for listing menus.
#[derive(Debug, Clone, Serialize)]
pub struct ListMenusResponse {
    pub menus: Vec<MenuResponse>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_menu_request_defaults() {
        let request: CreateMenuRequest = serde_json::from_str(r#"{"name": "Dinner"}"#).unwrap();
        assert_eq!(request.name, "Dinner");
        assert!(request.is_active);
        assert!(request.sort_order.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_menu_request_negative_sort_order() {
        let request: CreateMenuRequest =
            serde_json::from_str(r#"{"name": "Dinner", "sort_order": -1}"#).unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("sort_order"));
    }

    #[test]
    fn test_update_menu_request_name_too_long() {
        let request = UpdateMenuRequest {
            name: Some("x".repeat(121)),
            description: None,
            is_active: None,
            sort_order: None,
        };
        assert!(request.validate().is_err());
    }
}
