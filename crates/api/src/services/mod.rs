//! Application services that sit between handlers and the domain crate.

pub mod qr_export;

pub use qr_export::{build_archive, render_batch, BatchRender, ExportError, RenderedCode};
