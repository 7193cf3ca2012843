//! Repository implementations.
//!
//! Every owner-facing lookup joins up to `restaurants.owner_id`, so a row
//! belonging to another owner is indistinguishable from a missing one.

pub mod analytics;
pub mod category;
pub mod item;
pub mod menu;
pub mod qr_code;
pub mod restaurant;

pub use analytics::{AnalyticsRepository, AnalyticsScope, NewAnalyticsEvent};
pub use category::CategoryRepository;
pub use item::ItemRepository;
pub use menu::MenuRepository;
pub use qr_code::{NewQrCode, QrCodeRepository};
pub use restaurant::RestaurantRepository;
