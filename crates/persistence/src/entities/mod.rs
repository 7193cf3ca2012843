//! Database entity definitions.

pub mod analytics_event;
pub mod category;
pub mod item;
pub mod menu;
pub mod qr_code;
pub mod restaurant;

pub use analytics_event::{AnalyticsEventEntity, PopularEntryRow, QrTotalsRow};
pub use category::CategoryEntity;
pub use item::ItemEntity;
pub use menu::MenuEntity;
pub use qr_code::QrCodeEntity;
pub use restaurant::RestaurantEntity;
