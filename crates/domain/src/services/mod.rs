//! Domain services for Menuboard.
//!
//! Pure functions over domain models; nothing here touches the database.

pub mod analytics;
pub mod pdf;
pub mod qr_batch;
pub mod qr_render;
pub mod visitor;

pub use analytics::{aggregate_events, period_for, rank_popular, ScanAggregate};
pub use pdf::{render_sheet, render_single, SheetEntry, CODES_PER_PAGE};
pub use qr_batch::{
    menu_target_url, plan_batch, plan_single, sanitize_file_name, unique_entry_names, PlannedCode,
};
pub use qr_render::{check_png_size, render_png, render_svg, QrMatrix, RenderError};
pub use visitor::{classify_device, resolve_source};
