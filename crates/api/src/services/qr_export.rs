//! QR export service.
//!
//! Renders planned codes on the blocking pool and packages batch output as
//! a ZIP archive of PNGs, optionally with a printable PDF sheet.

use std::io::{Cursor, Write};
use std::sync::Arc;

use domain::models::QrDesign;
use domain::services::{
    render_png, render_sheet, unique_entry_names, PlannedCode, QrMatrix, RenderError, SheetEntry,
};
use thiserror::Error;
use tracing::warn;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Name of the printable sheet inside a batch archive.
pub const SHEET_ENTRY_NAME: &str = "qr-codes.pdf";

/// QR export errors.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Render task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("None of the {0} codes could be rendered")]
    NothingRendered(usize),
}

/// A planned code with its symbol and PNG image.
#[derive(Debug, Clone)]
pub struct RenderedCode {
    pub planned: PlannedCode,
    pub matrix: QrMatrix,
    pub png: Vec<u8>,
}

/// Result of rendering a batch: rendered codes in plan order plus the
/// number of codes that failed and were dropped.
#[derive(Debug, Default)]
pub struct BatchRender {
    pub rendered: Vec<RenderedCode>,
    pub skipped: usize,
}

fn render_one(planned: PlannedCode, design: &QrDesign, size: u32) -> Result<RenderedCode, RenderError> {
    let matrix = QrMatrix::for_design(&planned.target_url, design)?;
    let png = render_png(&matrix, design, size)?;
    Ok(RenderedCode {
        planned,
        matrix,
        png,
    })
}

/// Renders every planned code to PNG.
///
/// Work is split into chunks of `chunk_size` codes, each on its own
/// blocking task. A code that fails to render is logged and skipped.
pub async fn render_batch(
    planned: Vec<PlannedCode>,
    design: Arc<QrDesign>,
    size: u32,
    chunk_size: usize,
) -> Result<BatchRender, ExportError> {
    let total = planned.len();
    let chunk_size = chunk_size.max(1);

    let mut handles = Vec::with_capacity(total.div_ceil(chunk_size));
    let mut remaining = planned.into_iter().peekable();
    while remaining.peek().is_some() {
        let chunk: Vec<PlannedCode> = remaining.by_ref().take(chunk_size).collect();
        let design = Arc::clone(&design);
        handles.push(tokio::task::spawn_blocking(move || {
            chunk
                .into_iter()
                .map(|p| {
                    let name = p.name.clone();
                    render_one(p, &design, size).map_err(|e| (name, e))
                })
                .collect::<Vec<_>>()
        }));
    }

    let mut batch = BatchRender::default();
    for handle in handles {
        for outcome in handle.await? {
            match outcome {
                Ok(code) => batch.rendered.push(code),
                Err((name, e)) => {
                    warn!(name = %name, error = %e, "Skipping QR code that failed to render");
                    batch.skipped += 1;
                }
            }
        }
    }

    if batch.rendered.is_empty() && total > 0 {
        return Err(ExportError::NothingRendered(total));
    }

    Ok(batch)
}

/// Packages rendered codes into a deflate-compressed ZIP archive: one PNG
/// entry per code, plus the A4 sheet when `include_pdf` is set.
pub fn build_archive(
    rendered: &[RenderedCode],
    design: &QrDesign,
    include_pdf: bool,
) -> Result<Vec<u8>, ExportError> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    let names: Vec<String> = rendered.iter().map(|r| r.planned.name.clone()).collect();
    for (entry_name, code) in unique_entry_names(&names, "png").iter().zip(rendered) {
        zip.start_file(entry_name.as_str(), options)?;
        zip.write_all(&code.png)?;
    }

    if include_pdf {
        let entries: Vec<SheetEntry<'_>> = rendered
            .iter()
            .map(|r| SheetEntry {
                label: &r.planned.name,
                matrix: &r.matrix,
            })
            .collect();
        let pdf = render_sheet(&entries, design)?;
        zip.start_file(SHEET_ENTRY_NAME, options)?;
        zip.write_all(&pdf)?;
    }

    Ok(zip.finish()?.into_inner())
}
