//! Analytics event entity and aggregate row mappings.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{AnalyticsEvent, DeviceType, PopularEntry, ScanSource};

/// Database row mapping for the analytics_events table.
#[derive(Debug, Clone, FromRow)]
pub struct AnalyticsEventEntity {
    pub id: i64,
    pub restaurant_id: Uuid,
    pub menu_id: Uuid,
    pub qr_code_id: Option<Uuid>,
    pub device_type: String,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

impl From<AnalyticsEventEntity> for AnalyticsEvent {
    fn from(entity: AnalyticsEventEntity) -> Self {
        Self {
            id: entity.id,
            restaurant_id: entity.restaurant_id,
            menu_id: entity.menu_id,
            qr_code_id: entity.qr_code_id,
            device_type: DeviceType::parse(&entity.device_type),
            source: ScanSource::parse(&entity.source).unwrap_or(ScanSource::Direct),
            created_at: entity.created_at,
        }
    }
}

/// An id/name/counter triple for rankings.
#[derive(Debug, Clone, FromRow)]
pub struct PopularEntryRow {
    pub id: Uuid,
    pub name: String,
    pub views: i64,
}

impl From<PopularEntryRow> for PopularEntry {
    fn from(row: PopularEntryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            views: row.views,
        }
    }
}

/// QR code count and summed scan counters.
#[derive(Debug, Clone, Default, FromRow)]
pub struct QrTotalsRow {
    pub total_qr_codes: i64,
    pub lifetime_qr_scans: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_entity_parses_enums() {
        let entity = AnalyticsEventEntity {
            id: 42,
            restaurant_id: Uuid::new_v4(),
            menu_id: Uuid::new_v4(),
            qr_code_id: None,
            device_type: "tablet".to_string(),
            source: "unexpected".to_string(),
            created_at: Utc::now(),
        };

        let event: AnalyticsEvent = entity.into();
        assert_eq!(event.device_type, DeviceType::Tablet);
        assert_eq!(event.source, ScanSource::Direct);
    }
}
