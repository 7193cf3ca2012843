//! QR symbol encoding and raster/vector rendering.

use image::{ImageBuffer, ImageFormat, Rgba, RgbaImage};
use qrcode::{Color, EcLevel, QrCode};
use std::io::Cursor;
use thiserror::Error;

use crate::models::QrDesign;
use shared::validation::parse_hex_color;

/// Smallest accepted PNG edge length in pixels.
pub const MIN_PNG_SIZE: u32 = 128;
/// Largest accepted PNG edge length in pixels.
pub const MAX_PNG_SIZE: u32 = 2048;

/// Share of the symbol width covered by an embedded logo.
const LOGO_FRACTION: f64 = 0.22;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to encode QR data: {0}")]
    Encode(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Image size must be between {min} and {max} pixels, got {got}")]
    InvalidSize { min: u32, max: u32, got: u32 },

    #[error("Failed to encode image: {0}")]
    Image(String),
}

/// Checks a requested PNG edge length.
pub fn check_png_size(size: u32) -> Result<u32, RenderError> {
    if (MIN_PNG_SIZE..=MAX_PNG_SIZE).contains(&size) {
        Ok(size)
    } else {
        Err(RenderError::InvalidSize {
            min: MIN_PNG_SIZE,
            max: MAX_PNG_SIZE,
            got: size,
        })
    }
}

/// Encoded module grid of a QR symbol, without quiet zone.
#[derive(Debug, Clone)]
pub struct QrMatrix {
    width: usize,
    modules: Vec<bool>,
}

impl QrMatrix {
    /// Encodes `data`. Symbols that will carry a logo use the highest error
    /// correction level so the covered modules stay recoverable.
    pub fn encode(data: &str, with_logo: bool) -> Result<Self, RenderError> {
        let level = if with_logo { EcLevel::H } else { EcLevel::M };
        let code = QrCode::with_error_correction_level(data.as_bytes(), level)
            .map_err(|e| RenderError::Encode(e.to_string()))?;

        let width = code.width();
        let modules = code
            .to_colors()
            .into_iter()
            .map(|c| c == Color::Dark)
            .collect();

        Ok(Self { width, modules })
    }

    /// Encodes the target URL of a code with its design.
    pub fn for_design(data: &str, design: &QrDesign) -> Result<Self, RenderError> {
        Self::encode(data, design.logo_url.is_some())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.width && self.modules[y * self.width + x]
    }

    /// Iterates `(x, y)` of every dark module.
    pub fn dark_modules(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width;
        self.modules
            .iter()
            .enumerate()
            .filter(|(_, dark)| **dark)
            .map(move |(i, _)| (i % width, i / width))
    }
}

/// Foreground and background colors of a design.
pub fn design_colors(design: &QrDesign) -> Result<([u8; 3], [u8; 3]), RenderError> {
    let fg = parse_hex_color(&design.foreground_color)
        .ok_or_else(|| RenderError::InvalidColor(design.foreground_color.clone()))?;
    let bg = parse_hex_color(&design.background_color)
        .ok_or_else(|| RenderError::InvalidColor(design.background_color.clone()))?;
    Ok((fg, bg))
}

fn quiet_zone(design: &QrDesign) -> usize {
    design.margin.clamp(0, 10) as usize
}

fn corner_fraction(design: &QrDesign) -> f64 {
    design.corner_radius.clamp(0, 50) as f64 / 100.0
}

/// Whether the pixel centered at `(px, py)` of a `side`-wide cell falls
/// inside a square with corners rounded by `radius`.
fn inside_rounded_cell(px: f64, py: f64, side: f64, radius: f64) -> bool {
    if radius <= 0.0 {
        return true;
    }
    let cx = px.clamp(radius, side - radius);
    let cy = py.clamp(radius, side - radius);
    let (dx, dy) = (px - cx, py - cy);
    dx * dx + dy * dy <= radius * radius
}

/// Renders a PNG at most `size` pixels wide. Modules are drawn at an
/// integer pixel pitch so edges stay sharp.
pub fn render_png(matrix: &QrMatrix, design: &QrDesign, size: u32) -> Result<Vec<u8>, RenderError> {
    let size = check_png_size(size)?;
    let (fg, bg) = design_colors(design)?;

    let margin = quiet_zone(design);
    let total = (matrix.width() + 2 * margin) as u32;
    let pitch = (size / total).max(1);
    let side = pitch * total;

    let background = Rgba([bg[0], bg[1], bg[2], 255]);
    let foreground = Rgba([fg[0], fg[1], fg[2], 255]);
    let mut img: RgbaImage = ImageBuffer::from_pixel(side, side, background);

    let radius = pitch as f64 * corner_fraction(design);
    for (mx, my) in matrix.dark_modules() {
        let ox = (mx + margin) as u32 * pitch;
        let oy = (my + margin) as u32 * pitch;
        for ly in 0..pitch {
            for lx in 0..pitch {
                if inside_rounded_cell(lx as f64 + 0.5, ly as f64 + 0.5, pitch as f64, radius) {
                    img.put_pixel(ox + lx, oy + ly, foreground);
                }
            }
        }
    }

    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, ImageFormat::Png)
        .map_err(|e| RenderError::Image(e.to_string()))?;
    Ok(cursor.into_inner())
}

fn hex(rgb: [u8; 3]) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2])
}

fn escape_xml_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders a scalable SVG in module units. A configured logo is placed
/// over the center on a background-colored plate.
pub fn render_svg(matrix: &QrMatrix, design: &QrDesign) -> Result<String, RenderError> {
    let (fg, bg) = design_colors(design)?;
    let margin = quiet_zone(design);
    let total = matrix.width() + 2 * margin;
    let radius = corner_fraction(design);

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" \
         viewBox=\"0 0 {t} {t}\" width=\"{px}\" height=\"{px}\" shape-rendering=\"crispEdges\">\n",
        t = total,
        px = total * 8
    ));
    svg.push_str(&format!(
        "<rect width=\"{t}\" height=\"{t}\" fill=\"{c}\"/>\n",
        t = total,
        c = hex(bg)
    ));
    svg.push_str(&format!("<g fill=\"{}\">\n", hex(fg)));

    if radius > 0.0 {
        for (x, y) in matrix.dark_modules() {
            svg.push_str(&format!(
                "<rect x=\"{}\" y=\"{}\" width=\"1\" height=\"1\" rx=\"{:.2}\"/>\n",
                x + margin,
                y + margin,
                radius
            ));
        }
    } else {
        // Square modules: one rect per horizontal run.
        for y in 0..matrix.width() {
            let mut x = 0;
            while x < matrix.width() {
                if !matrix.is_dark(x, y) {
                    x += 1;
                    continue;
                }
                let start = x;
                while x < matrix.width() && matrix.is_dark(x, y) {
                    x += 1;
                }
                svg.push_str(&format!(
                    "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"1\"/>\n",
                    start + margin,
                    y + margin,
                    x - start
                ));
            }
        }
    }
    svg.push_str("</g>\n");

    if let Some(logo_url) = &design.logo_url {
        let logo = matrix.width() as f64 * LOGO_FRACTION;
        let origin = (total as f64 - logo) / 2.0;
        svg.push_str(&format!(
            "<rect x=\"{o:.2}\" y=\"{o:.2}\" width=\"{s:.2}\" height=\"{s:.2}\" fill=\"{c}\"/>\n",
            o = origin - 0.5,
            s = logo + 1.0,
            c = hex(bg)
        ));
        svg.push_str(&format!(
            "<image href=\"{u}\" xlink:href=\"{u}\" x=\"{o:.2}\" y=\"{o:.2}\" width=\"{s:.2}\" \
             height=\"{s:.2}\" preserveAspectRatio=\"xMidYMid meet\"/>\n",
            u = escape_xml_attr(logo_url),
            o = origin,
            s = logo
        ));
    }

    svg.push_str("</svg>\n");
    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://menus.example.com/menu/5f7c1a4e-0000-4000-8000-000000000000?qr=1";

    /// Reads every QR symbol found in a PNG.
    fn decode_png(png: &[u8]) -> Vec<String> {
        let luma = image::load_from_memory(png).unwrap().to_luma8();
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            luma.width() as usize,
            luma.height() as usize,
            |x, y| luma.get_pixel(x as u32, y as u32)[0],
        );
        prepared
            .detect_grids()
            .into_iter()
            .map(|grid| grid.decode().unwrap().1)
            .collect()
    }

    fn round_trip(design: &QrDesign, size: u32) -> Vec<String> {
        let matrix = QrMatrix::for_design(URL, design).unwrap();
        decode_png(&render_png(&matrix, design, size).unwrap())
    }

    #[test]
    fn test_png_decodes_to_url_with_default_design() {
        assert_eq!(round_trip(&QrDesign::default(), 512), vec![URL.to_string()]);
    }

    #[test]
    fn test_png_decodes_to_url_with_rounded_modules() {
        let design = QrDesign {
            margin: 4,
            corner_radius: 50,
            ..QrDesign::default()
        };
        assert_eq!(round_trip(&design, 512), vec![URL.to_string()]);
    }

    #[test]
    fn test_png_decodes_to_url_with_brand_colors() {
        let design = QrDesign {
            foreground_color: "#1B3A5C".to_string(),
            background_color: "#FFF8E7".to_string(),
            margin: 3,
            corner_radius: 25,
            logo_url: None,
        };
        assert_eq!(round_trip(&design, 400), vec![URL.to_string()]);
    }

    #[test]
    fn test_encode_produces_square_matrix() {
        let matrix = QrMatrix::encode(URL, false).unwrap();
        assert!(matrix.width() >= 21);
        // Finder pattern corner is always dark.
        assert!(matrix.is_dark(0, 0));
        assert!(!matrix.is_dark(matrix.width(), 0));
    }

    #[test]
    fn test_logo_raises_error_correction() {
        let plain = QrMatrix::encode(URL, false).unwrap();
        let with_logo = QrMatrix::encode(URL, true).unwrap();
        assert!(with_logo.width() >= plain.width());
    }

    #[test]
    fn test_render_png_size_and_colors() {
        let matrix = QrMatrix::encode(URL, false).unwrap();
        let design = QrDesign {
            foreground_color: "#112233".to_string(),
            background_color: "#FFEEDD".to_string(),
            ..QrDesign::default()
        };
        let bytes = render_png(&matrix, &design, 512).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let img = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert!(img.width() <= 512);
        assert!(img.width() > 400);
        assert_eq!(img.width(), img.height());

        // Quiet zone is background; first finder module is foreground.
        let pitch = img.width() / (matrix.width() as u32 + 4);
        assert_eq!(img.get_pixel(0, 0).0, [0xFF, 0xEE, 0xDD, 255]);
        let p = img.get_pixel(2 * pitch + pitch / 2, 2 * pitch + pitch / 2);
        assert_eq!(p.0, [0x11, 0x22, 0x33, 255]);
    }

    #[test]
    fn test_render_png_rounded_corners_leave_cell_corner_empty() {
        let matrix = QrMatrix::encode(URL, false).unwrap();
        let design = QrDesign {
            margin: 0,
            corner_radius: 50,
            ..QrDesign::default()
        };
        let bytes = render_png(&matrix, &design, 1024).unwrap();
        let img = image::load_from_memory(&bytes).unwrap().to_rgba8();
        let pitch = img.width() / matrix.width() as u32;
        assert!(pitch >= 8);

        // Module (0,0) is dark: its outer corner pixel is cut, its center is filled.
        assert_eq!(img.get_pixel(0, 0).0, [0xFF, 0xFF, 0xFF, 255]);
        assert_eq!(img.get_pixel(pitch / 2, pitch / 2).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_render_png_rejects_out_of_range_size() {
        let matrix = QrMatrix::encode(URL, false).unwrap();
        let design = QrDesign::default();
        assert!(matches!(
            render_png(&matrix, &design, 64),
            Err(RenderError::InvalidSize { got: 64, .. })
        ));
        assert!(render_png(&matrix, &design, 4096).is_err());
    }

    #[test]
    fn test_render_png_rejects_bad_color() {
        let matrix = QrMatrix::encode(URL, false).unwrap();
        let design = QrDesign {
            background_color: "white".to_string(),
            ..QrDesign::default()
        };
        assert!(matches!(
            render_png(&matrix, &design, 256),
            Err(RenderError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_render_svg_contains_modules_and_logo() {
        let design = QrDesign {
            logo_url: Some("https://cdn.example.com/logo.png?a=1&b=2".to_string()),
            corner_radius: 25,
            ..QrDesign::default()
        };
        let matrix = QrMatrix::for_design(URL, &design).unwrap();
        let svg = render_svg(&matrix, &design).unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("rx=\"0.25\""));
        assert!(svg.contains("logo.png?a=1&amp;b=2"));
        assert_eq!(
            svg.matches("width=\"1\" height=\"1\"").count(),
            matrix.dark_modules().count()
        );
    }

    #[test]
    fn test_render_svg_square_modules_merge_runs() {
        let matrix = QrMatrix::encode(URL, false).unwrap();
        let svg = render_svg(&matrix, &QrDesign::default()).unwrap();
        assert!(!svg.contains("<image"));
        assert!(!svg.contains("rx="));
        assert!(svg.matches("<rect").count() < matrix.dark_modules().count());
    }
}
