//! Analytics domain models.
//!
//! Scan events are appended by the public menu view and aggregated into
//! day buckets plus device/source breakdowns for the owner dashboard.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// ============================================================================
// Events
// ============================================================================

/// Device class of the visitor, derived from the User-Agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Mobile,
    Tablet,
    Desktop,
    Unknown,
}

impl DeviceType {
    /// Converts to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Mobile => "mobile",
            DeviceType::Tablet => "tablet",
            DeviceType::Desktop => "desktop",
            DeviceType::Unknown => "unknown",
        }
    }

    /// Parses from database string representation; unrecognized values map
    /// to `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s {
            "mobile" => DeviceType::Mobile,
            "tablet" => DeviceType::Tablet,
            "desktop" => DeviceType::Desktop,
            _ => DeviceType::Unknown,
        }
    }
}

/// How the visitor reached the public menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanSource {
    Qr,
    Link,
    Social,
    Direct,
}

impl ScanSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanSource::Qr => "qr",
            ScanSource::Link => "link",
            ScanSource::Social => "social",
            ScanSource::Direct => "direct",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "qr" => Some(ScanSource::Qr),
            "link" => Some(ScanSource::Link),
            "social" => Some(ScanSource::Social),
            "direct" => Some(ScanSource::Direct),
            _ => None,
        }
    }
}

/// One logged public menu view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub id: i64,
    pub restaurant_id: Uuid,
    pub menu_id: Uuid,
    pub qr_code_id: Option<Uuid>,
    pub device_type: DeviceType,
    pub source: ScanSource,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Query
// ============================================================================

/// Dashboard time window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    #[default]
    Week,
    Month,
    Year,
}

impl TimeRange {
    /// Number of calendar days covered, today included.
    pub fn days(&self) -> i64 {
        match self {
            TimeRange::Week => 7,
            TimeRange::Month => 30,
            TimeRange::Year => 365,
        }
    }
}

fn default_limit() -> usize {
    5
}

/// Query parameters for the analytics endpoint.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnalyticsQuery {
    #[serde(default)]
    pub range: TimeRange,
    pub restaurant_id: Option<Uuid>,
    pub menu_id: Option<Uuid>,
    /// Length of the popular-item/category lists.
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 20, message = "Limit must be between 1 and 20"))]
    pub limit: usize,
}

// ============================================================================
// Response
// ============================================================================

/// Analytics period (inclusive).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Scan count for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyScanBucket {
    pub date: NaiveDate,
    pub scans: i64,
}

/// Scans per device class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceBreakdown {
    pub mobile: i64,
    pub tablet: i64,
    pub desktop: i64,
    pub unknown: i64,
}

impl DeviceBreakdown {
    pub fn record(&mut self, device: DeviceType) {
        match device {
            DeviceType::Mobile => self.mobile += 1,
            DeviceType::Tablet => self.tablet += 1,
            DeviceType::Desktop => self.desktop += 1,
            DeviceType::Unknown => self.unknown += 1,
        }
    }

    pub fn total(&self) -> i64 {
        self.mobile + self.tablet + self.desktop + self.unknown
    }
}

/// Scans per traffic source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceBreakdown {
    pub qr: i64,
    pub link: i64,
    pub social: i64,
    pub direct: i64,
}

impl SourceBreakdown {
    pub fn record(&mut self, source: ScanSource) {
        match source {
            ScanSource::Qr => self.qr += 1,
            ScanSource::Link => self.link += 1,
            ScanSource::Social => self.social += 1,
            ScanSource::Direct => self.direct += 1,
        }
    }
}

/// Entry of a "most viewed" ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopularEntry {
    pub id: Uuid,
    pub name: String,
    pub views: i64,
}

/// Headline numbers for the selected scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalyticsSummary {
    /// Events inside the window.
    pub total_scans: i64,
    /// Events inside the window that carried a known QR code.
    pub qr_scans: i64,
    pub total_qr_codes: i64,
    /// Sum of every QR code's scan counter, all time.
    pub lifetime_qr_scans: i64,
}

/// Analytics response.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsResponse {
    pub range: TimeRange,
    pub period: AnalyticsPeriod,
    pub summary: AnalyticsSummary,
    pub daily: Vec<DailyScanBucket>,
    pub by_device: DeviceBreakdown,
    pub by_source: SourceBreakdown,
    pub popular_items: Vec<PopularEntry>,
    pub popular_categories: Vec<PopularEntry>,
    pub top_qr_codes: Vec<PopularEntry>,
}
