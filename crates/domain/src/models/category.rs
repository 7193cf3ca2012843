//! Menu category domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A category groups items within a menu.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
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

fn default_active() -> bool {
    true
}

/// Request payload for creating a category.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategoryRequest {
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

/// Request payload for updating a category (partial update).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
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

/// Request payload for reordering siblings (categories in a menu or items in
/// a category). Each id receives its position in the list as sort order.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReorderRequest {
    #[validate(length(min = 1, max = 500, message = "Provide between 1 and 500 ids"))]
    pub ids: Vec<Uuid>,
}

impl ReorderRequest {
    /// Returns true if the same id appears more than once.
    pub fn has_duplicates(&self) -> bool {
        let mut seen = std::collections::HashSet::with_capacity(self.ids.len());
        self.ids.iter().any(|id| !seen.insert(*id))
    }

    /// Pairs each id with its new sort position.
    pub fn positions(&self) -> Vec<(Uuid, i32)> {
        self.ids
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, i as i32))
            .collect()
    }
}

/// Response payload for category operations.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub menu_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            menu_id: c.menu_id,
            name: c.name,
            description: c.description,
            is_active: c.is_active,
            sort_order: c.sort_order,
            view_count: c.view_count,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Response for listing categories.
#[derive(Debug, Clone, Serialize)]
pub struct ListCategoriesResponse {
    pub categories: Vec<CategoryResponse>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reorder_positions() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let request = ReorderRequest { ids: vec![c, a, b] };

        assert_eq!(request.positions(), vec![(c, 0), (a, 1), (b, 2)]);
        assert!(!request.has_duplicates());
    }

    #[test]
    fn test_reorder_duplicates() {
        let a = Uuid::new_v4();
        let request = ReorderRequest { ids: vec![a, a] };
        assert!(request.has_duplicates());
    }

    #[test]
    fn test_reorder_empty_rejected() {
        let request = ReorderRequest { ids: vec![] };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_category_request() {
        let request: CreateCategoryRequest =
            serde_json::from_str(r#"{"name": "Starters", "sort_order": 2}"#).unwrap();
        assert_eq!(request.sort_order, Some(2));
        assert!(request.is_active);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_blank_category_name_rejected() {
        let request: CreateCategoryRequest = serde_json::from_str(r#"{"name": "  "}"#).unwrap();
        assert!(request.validate().is_err());
    }
}
