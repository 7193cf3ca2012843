//! Scan event aggregation for the owner dashboard.

use chrono::{Duration, NaiveDate};

use crate::models::{
    AnalyticsEvent, AnalyticsPeriod, DailyScanBucket, DeviceBreakdown, PopularEntry,
    SourceBreakdown, TimeRange,
};

/// Aggregated view of the events inside a period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanAggregate {
    pub daily: Vec<DailyScanBucket>,
    pub by_device: DeviceBreakdown,
    pub by_source: SourceBreakdown,
    pub total_scans: i64,
    pub qr_scans: i64,
}

/// Window of `range` ending on `today`, both ends included.
pub fn period_for(range: TimeRange, today: NaiveDate) -> AnalyticsPeriod {
    AnalyticsPeriod {
        start: today - Duration::days(range.days() - 1),
        end: today,
    }
}

/// Buckets events by UTC calendar day, oldest day first, with one bucket
/// per day of the period. Events outside the period are ignored.
pub fn aggregate_events(events: &[AnalyticsEvent], period: &AnalyticsPeriod) -> ScanAggregate {
    let days = (period.end - period.start).num_days() + 1;
    let mut daily: Vec<DailyScanBucket> = (0..days.max(0))
        .map(|offset| DailyScanBucket {
            date: period.start + Duration::days(offset),
            scans: 0,
        })
        .collect();

    let mut by_device = DeviceBreakdown::default();
    let mut by_source = SourceBreakdown::default();
    let mut total_scans = 0;
    let mut qr_scans = 0;

    for event in events {
        let index = (event.created_at.date_naive() - period.start).num_days();
        if index < 0 || index >= daily.len() as i64 {
            continue;
        }
        daily[index as usize].scans += 1;
        by_device.record(event.device_type);
        by_source.record(event.source);
        total_scans += 1;
        if event.qr_code_id.is_some() {
            qr_scans += 1;
        }
    }

    ScanAggregate {
        daily,
        by_device,
        by_source,
        total_scans,
        qr_scans,
    }
}

/// Orders entries by views, most viewed first, and keeps the first `limit`.
/// The sort is stable, so ties keep their incoming order.
pub fn rank_popular(mut entries: Vec<PopularEntry>, limit: usize) -> Vec<PopularEntry> {
    entries.sort_by(|a, b| b.views.cmp(&a.views));
    entries.truncate(limit);
    entries
}
