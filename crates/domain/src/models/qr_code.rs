//! QR code domain model.
//!
//! A QR code pairs a target URL on the public menu page with a visual design
//! and counts scans. The `code` value is what the symbol carries in the
//! `qr` query parameter, so scans can be attributed back to the record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Visual design shared by every rendering of a code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct QrDesign {
    #[validate(custom(function = "shared::validation::validate_hex_color"))]
    pub foreground_color: String,

    #[validate(custom(function = "shared::validation::validate_hex_color"))]
    pub background_color: String,

    /// Quiet zone width in modules.
    #[validate(range(min = 0, max = 10, message = "Margin must be between 0 and 10 modules"))]
    pub margin: i32,

    /// Rounding of each dark module, as a percentage of the module size.
    #[validate(range(min = 0, max = 50, message = "Corner radius must be between 0 and 50"))]
    pub corner_radius: i32,

    #[validate(url(message = "Logo URL must be a valid URL"))]
    pub logo_url: Option<String>,
}

impl Default for QrDesign {
    fn default() -> Self {
        Self {
            foreground_color: "#000000".to_string(),
            background_color: "#FFFFFF".to_string(),
            margin: 2,
            corner_radius: 0,
            logo_url: None,
        }
    }
}

/// Represents a persisted QR code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrCode {
    pub id: Uuid,
    pub menu_id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub code: String,
    pub target_url: String,
    pub design: QrDesign,
    pub scan_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a single QR code.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQrCodeRequest {
    #[validate(
        length(min = 1, max = 120, message = "Name must be 1-120 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: String,

    #[serde(default)]
    #[validate(nested)]
    pub design: QrDesign,
}

/// Request payload for editing a QR code's name or design.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateQrCodeRequest {
    #[validate(
        length(min = 1, max = 120, message = "Name must be 1-120 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: Option<String>,

    /// Replaces the whole design when present.
    pub design: Option<QrDesign>,
}

fn default_start_index() -> u32 {
    1
}

/// Request payload for generating a batch of sequentially named codes.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BatchQrRequest {
    /// Number of codes; the upper bound comes from configuration.
    #[validate(range(min = 1, message = "Count must be at least 1"))]
    pub count: u32,

    #[validate(

        length(min = 1, max = 80, message = "Name prefix must be 1-80 characters"),

        custom(function = "shared::validation::validate_not_blank")

    )]
    pub name_prefix: String,

    #[serde(default = "default_start_index")]
    #[validate(range(max = 1_000_000, message = "Start index must be at most 1000000"))]
    pub start_index: u32,

    #[serde(default)]
    #[validate(nested)]
    pub design: QrDesign,

    /// Adds a printable multi-page PDF sheet to the archive.
    #[serde(default)]
    pub include_pdf: bool,

    /// PNG edge length in pixels.
    pub size: Option<u32>,
}

/// Single-code export formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Svg,
    Pdf,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Svg => "image/svg+xml",
            ExportFormat::Pdf => "application/pdf",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Svg => "svg",
            ExportFormat::Pdf => "pdf",
        }
    }
}

/// Query parameters for single-code export.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: ExportFormat,
    pub size: Option<u32>,
}

/// Response payload for QR code operations.
#[derive(Debug, Clone, Serialize)]
pub struct QrCodeResponse {
    pub id: Uuid,
    pub menu_id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub code: String,
    pub target_url: String,
    pub design: QrDesign,
    pub scan_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<QrCode> for QrCodeResponse {
    fn from(q: QrCode) -> Self {
        Self {
            id: q.id,
            menu_id: q.menu_id,
            restaurant_id: q.restaurant_id,
            name: q.name,
            code: q.code,
            target_url: q.target_url,
            design: q.design,
            scan_count: q.scan_count,
            created_at: q.created_at,
            updated_at: q.updated_at,
        }
    }
}

/// Response for listing QR codes.
#[derive(Debug, Clone, Serialize)]
pub struct ListQrCodesResponse {
    pub qr_codes: Vec<QrCodeResponse>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_design() {
        let design = QrDesign::default();
        assert_eq!(design.foreground_color, "#000000");
        assert_eq!(design.background_color, "#FFFFFF");
        assert_eq!(design.margin, 2);
        assert!(design.validate().is_ok());
    }

    #[test]
    fn test_design_partial_deserialization_fills_defaults() {
        let design: QrDesign = serde_json::from_str(r##"{"foreground_color": "#336699"}"##).unwrap();
        assert_eq!(design.foreground_color, "#336699");
        assert_eq!(design.background_color, "#FFFFFF");
        assert_eq!(design.corner_radius, 0);
    }

    #[test]
    fn test_design_rejects_bad_color_and_margin() {
        let design = QrDesign {
            foreground_color: "black".to_string(),
            margin: 11,
            ..QrDesign::default()
        };
        let errors = design.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("foreground_color"));
        assert!(fields.contains_key("margin"));
    }

    #[test]
    fn test_create_request_nested_design_validation() {
        let request: CreateQrCodeRequest = serde_json::from_str(
            r##"{"name": "Window", "design": {"background_color": "#12"}}"##,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_batch_request_defaults() {
        let request: BatchQrRequest =
            serde_json::from_str(r#"{"count": 3, "name_prefix": "Table"}"#).unwrap();
        assert_eq!(request.start_index, 1);
        assert!(!request.include_pdf);
        assert_eq!(request.design, QrDesign::default());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_batch_request_rejects_zero_count_and_empty_prefix() {
        let request: BatchQrRequest =
            serde_json::from_str(r#"{"count": 0, "name_prefix": ""}"#).unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("count"));
        assert!(fields.contains_key("name_prefix"));
    }

    #[test]
    fn test_batch_request_rejects_blank_prefix() {
        let request: BatchQrRequest =
            serde_json::from_str(r#"{"count": 2, "name_prefix": "   "}"#).unwrap();
        let errors = request.validate().unwrap_err();
        assert_eq!(errors.field_errors()["name_prefix"][0].code, "blank");
    }

    #[test]
    fn test_blank_code_names_rejected() {
        let create: CreateQrCodeRequest = serde_json::from_str(r#"{"name": " \t "}"#).unwrap();
        assert!(create.validate().unwrap_err().field_errors().contains_key("name"));

        let update: UpdateQrCodeRequest = serde_json::from_str(r#"{"name": "  "}"#).unwrap();
        assert!(update.validate().is_err());

        let untouched: UpdateQrCodeRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert!(untouched.validate().is_ok());
    }

    #[test]
    fn test_export_format() {
        let query: ExportQuery = serde_json::from_str(r#"{"format": "svg"}"#).unwrap();
        assert_eq!(query.format, ExportFormat::Svg);
        assert_eq!(query.format.content_type(), "image/svg+xml");
        assert_eq!(ExportFormat::default(), ExportFormat::Png);
        assert_eq!(ExportFormat::Pdf.extension(), "pdf");
    }
}
