//! Restaurant domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A restaurant owned by a single account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
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

fn default_currency() -> String {
    "USD".to_string()
}

fn default_active() -> bool {
    true
}

/// Request payload for creating a restaurant.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRestaurantRequest {
    #[validate(
        length(min = 1, max = 120, message = "Name must be 1-120 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: String,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 255, message = "Address must be at most 255 characters"))]
    pub address: Option<String>,

    #[validate(length(max = 32, message = "Phone must be at most 32 characters"))]
    pub phone: Option<String>,

    #[validate(url(message = "Logo URL must be a valid URL"))]
    pub logo_url: Option<String>,

    #[serde(default = "default_currency")]
    #[validate(custom(function = "shared::validation::validate_currency_code"))]
    pub currency: String,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Request payload for updating a restaurant (partial update).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRestaurantRequest {
    #[validate(
        length(min = 1, max = 120, message = "Name must be 1-120 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: Option<String>,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    #[serde(default, deserialize_with = "shared::patch::double_option")]
    pub description: Option<Option<String>>,

    #[validate(length(max = 255, message = "Address must be at most 255 characters"))]
    #[serde(default, deserialize_with = "shared::patch::double_option")]
    pub address: Option<Option<String>>,

    #[validate(length(max = 32, message = "Phone must be at most 32 characters"))]
    #[serde(default, deserialize_with = "shared::patch::double_option")]
    pub phone: Option<Option<String>>,

    #[validate(url(message = "Logo URL must be a valid URL"))]
    #[serde(default, deserialize_with = "shared::patch::double_option")]
    pub logo_url: Option<Option<String>>,

    #[validate(custom(function = "shared::validation::validate_currency_code"))]
    pub currency: Option<String>,

    pub is_active: Option<bool>,
}

/// Response payload for restaurant operations.
#[derive(Debug, Clone, Serialize)]
pub struct RestaurantResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    pub currency: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Restaurant> for RestaurantResponse {
    fn from(r: Restaurant) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            address: r.address,
            phone: r.phone,
            logo_url: r.logo_url,
            currency: r.currency,
            is_active: r.is_active,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Response for listing restaurants.
#[derive(Debug, Clone, Serialize)]
pub struct ListRestaurantsResponse {
    pub restaurants: Vec<RestaurantResponse>,
    pub total: usize,
}
