//! Public (unauthenticated) menu view.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::Category;
use super::item::Item;
use super::menu::Menu;
use super::restaurant::Restaurant;

/// Query parameters of the public menu page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublicMenuQuery {
    /// Code value of the QR symbol that was scanned.
    pub qr: Option<String>,
    /// Traffic source hint, e.g. `link` or `social`.
    pub source: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicRestaurant {
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
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicItem {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price_cents: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub is_featured: bool,
    pub dietary_tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicCategory {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub items: Vec<PublicItem>,
}

/// Public menu page payload.
#[derive(Debug, Clone, Serialize)]
pub struct PublicMenuResponse {
    pub menu_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub restaurant: PublicRestaurant,
    pub categories: Vec<PublicCategory>,
}

impl PublicMenuResponse {
    /// Builds the visitor-facing tree. Inactive categories and unavailable
    /// items are dropped; the rest are ordered by sort order, then name.
    pub fn assemble(
        restaurant: Restaurant,
        menu: Menu,
        mut categories: Vec<Category>,
        items: Vec<Item>,
    ) -> Self {
        categories.retain(|c| c.is_active);
        categories.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.name.cmp(&b.name)));

        let mut items: Vec<Item> = items.into_iter().filter(|i| i.is_available).collect();
        items.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.name.cmp(&b.name)));

        let categories = categories
            .into_iter()
            .map(|c| PublicCategory {
                id: c.id,
                items: items
                    .iter()
                    .filter(|i| i.category_id == c.id)
                    .map(|i| PublicItem {
                        id: i.id,
                        name: i.name.clone(),
                        description: i.description.clone(),
                        price_cents: i.price_cents,
                        image_url: i.image_url.clone(),
                        is_featured: i.is_featured,
                        dietary_tags: i.dietary_tags.clone(),
                    })
                    .collect(),
                name: c.name,
                description: c.description,
            })
            .collect();

        Self {
            menu_id: menu.id,
            name: menu.name,
            description: menu.description,
            restaurant: PublicRestaurant {
                name: restaurant.name,
                description: restaurant.description,
                address: restaurant.address,
                phone: restaurant.phone,
                logo_url: restaurant.logo_url,
                currency: restaurant.currency,
            },
            categories,
        }
    }
}
