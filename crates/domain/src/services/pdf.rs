//! Printable PDF output for QR codes.
//!
//! Produces PDF 1.4 documents with vector modules and Helvetica labels:
//! either a single centered code, or A4 sheets laid out as a 3x4 grid.

use super::qr_render::{design_colors, QrMatrix, RenderError};
use crate::models::QrDesign;

const PAGE_WIDTH: f64 = 595.0;
const PAGE_HEIGHT: f64 = 842.0;
const PAGE_MARGIN: f64 = 36.0;
const GRID_COLUMNS: usize = 3;
const GRID_ROWS: usize = 4;
const LABEL_FONT_SIZE: f64 = 10.0;
const LABEL_GAP: f64 = 18.0;
const SINGLE_CODE_SIZE: f64 = 300.0;

/// Codes per sheet page.
pub const CODES_PER_PAGE: usize = GRID_COLUMNS * GRID_ROWS;

/// One labelled code on a sheet.
pub struct SheetEntry<'a> {
    pub label: &'a str,
    pub matrix: &'a QrMatrix,
}

/// Renders one code centered on an A4 page, labelled underneath.
pub fn render_single(label: &str, matrix: &QrMatrix, design: &QrDesign) -> Result<Vec<u8>, RenderError> {
    let mut content = String::new();
    let x = (PAGE_WIDTH - SINGLE_CODE_SIZE) / 2.0;
    let y = (PAGE_HEIGHT - SINGLE_CODE_SIZE) / 2.0;
    draw_code(&mut content, matrix, design, x, y, SINGLE_CODE_SIZE)?;
    draw_label(&mut content, label, PAGE_WIDTH / 2.0, y - LABEL_GAP, 14.0);
    Ok(write_document(&[content]))
}

/// Renders every entry onto A4 pages, twelve per page, in order.
pub fn render_sheet(entries: &[SheetEntry<'_>], design: &QrDesign) -> Result<Vec<u8>, RenderError> {
    let cell_width = (PAGE_WIDTH - 2.0 * PAGE_MARGIN) / GRID_COLUMNS as f64;
    let cell_height = (PAGE_HEIGHT - 2.0 * PAGE_MARGIN) / GRID_ROWS as f64;
    let code_size = cell_width.min(cell_height - LABEL_GAP - LABEL_FONT_SIZE) - 16.0;

    let mut pages = Vec::new();
    for chunk in entries.chunks(CODES_PER_PAGE) {
        let mut content = String::new();
        for (slot, entry) in chunk.iter().enumerate() {
            let column = slot % GRID_COLUMNS;
            let row = slot / GRID_COLUMNS;

            let cell_left = PAGE_MARGIN + column as f64 * cell_width;
            let cell_top = PAGE_HEIGHT - PAGE_MARGIN - row as f64 * cell_height;
            let x = cell_left + (cell_width - code_size) / 2.0;
            let y = cell_top - 8.0 - code_size;

            draw_code(&mut content, entry.matrix, design, x, y, code_size)?;
            draw_label(
                &mut content,
                entry.label,
                cell_left + cell_width / 2.0,
                y - LABEL_GAP,
                LABEL_FONT_SIZE,
            );
        }
        pages.push(content);
    }

    if pages.is_empty() {
        pages.push(String::new());
    }
    Ok(write_document(&pages))
}

fn rgb_operands(rgb: [u8; 3]) -> String {
    format!(
        "{:.3} {:.3} {:.3}",
        rgb[0] as f64 / 255.0,
        rgb[1] as f64 / 255.0,
        rgb[2] as f64 / 255.0
    )
}

/// Draws the symbol with its quiet zone into the `size`-point square whose
/// lower-left corner is `(x, y)`.
fn draw_code(
    out: &mut String,
    matrix: &QrMatrix,
    design: &QrDesign,
    x: f64,
    y: f64,
    size: f64,
) -> Result<(), RenderError> {
    let (fg, bg) = design_colors(design)?;
    let margin = design.margin.clamp(0, 10) as usize;
    let total = matrix.width() + 2 * margin;
    let module = size / total as f64;
    let top = y + size;

    out.push_str(&format!("{} rg\n", rgb_operands(bg)));
    out.push_str(&format!("{:.2} {:.2} {:.2} {:.2} re f\n", x, y, size, size));

    out.push_str(&format!("{} rg\n", rgb_operands(fg)));
    for (mx, my) in matrix.dark_modules() {
        let left = x + (mx + margin) as f64 * module;
        let bottom = top - (my + margin + 1) as f64 * module;
        out.push_str(&format!(
            "{:.2} {:.2} {:.2} {:.2} re\n",
            left, bottom, module, module
        ));
    }
    out.push_str("f\n");
    Ok(())
}

/// Escapes a label for a PDF literal string. Characters outside printable
/// ASCII are replaced, as the standard font is used without an encoding.
fn escape_pdf_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

fn draw_label(out: &mut String, label: &str, center_x: f64, baseline: f64, font_size: f64) {
    // Helvetica averages roughly half an em per glyph.
    let approx_width = label.chars().count() as f64 * font_size * 0.5;
    out.push_str("0 0 0 rg\n");
    out.push_str(&format!(
        "BT /F1 {:.1} Tf {:.2} {:.2} Td ({}) Tj ET\n",
        font_size,
        center_x - approx_width / 2.0,
        baseline,
        escape_pdf_text(label)
    ));
}

/// Assembles catalog, page tree, font, pages, xref table and trailer.
fn write_document(pages: &[String]) -> Vec<u8> {
    let first_page_id = 4;
    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", first_page_id + 2 * i))
        .collect();

    let mut objects: Vec<Vec<u8>> = vec![
        b"<< /Type /Catalog /Pages 2 0 R >>".to_vec(),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        )
        .into_bytes(),
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_vec(),
    ];

    for (i, content) in pages.iter().enumerate() {
        let content_id = first_page_id + 2 * i + 1;
        objects.push(
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
                PAGE_WIDTH, PAGE_HEIGHT, content_id
            )
            .into_bytes(),
        );

        let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
        stream.extend_from_slice(content.as_bytes());
        stream.extend_from_slice(b"\nendstream");
        objects.push(stream);
    }

    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", i + 1).as_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_offset = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        )
        .as_bytes(),
    );
    out
}
