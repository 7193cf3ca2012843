//! Domain models for Menuboard.

pub mod analytics;
pub mod category;
pub mod item;
pub mod menu;
pub mod public_menu;
pub mod qr_code;
pub mod restaurant;

pub use analytics::{
    AnalyticsEvent, AnalyticsPeriod, AnalyticsQuery, AnalyticsResponse, AnalyticsSummary,
    DailyScanBucket, DeviceBreakdown, DeviceType, PopularEntry, ScanSource, SourceBreakdown,
    TimeRange,
};
pub use category::{
    Category, CategoryResponse, CreateCategoryRequest, ListCategoriesResponse, ReorderRequest,
    UpdateCategoryRequest,
};
pub use item::{CreateItemRequest, Item, ItemResponse, ListItemsResponse, UpdateItemRequest};
pub use menu::{CreateMenuRequest, ListMenusResponse, Menu, MenuResponse, UpdateMenuRequest};
pub use public_menu::{PublicMenuQuery, PublicMenuResponse};
pub use qr_code::{
    BatchQrRequest, CreateQrCodeRequest, ExportFormat, ExportQuery, ListQrCodesResponse, QrCode,
    QrCodeResponse, QrDesign, UpdateQrCodeRequest,
};
pub use restaurant::{
    CreateRestaurantRequest, ListRestaurantsResponse, Restaurant, RestaurantResponse,
    UpdateRestaurantRequest,
};
