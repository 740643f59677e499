//! Map projection
//!
//! One [`MapView`] is created per map widget and its markers are refreshed in
//! place whenever the record list changes.

use chrono::{NaiveDate, TimeZone};
use serde::Serialize;
use shared::models::{IssueRecord, Location, Priority};

use super::local_date;

/// Centre used when the viewer's position is unknown (San Francisco)
pub const FALLBACK_CENTER: Location = Location::new(37.7749, -122.4194);
pub const DEFAULT_ZOOM: u8 = 14;

/// Click popup content
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerInfo {
    /// e.g. "High Priority"
    pub label: String,
    pub color: &'static str,
    pub summary: String,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub id: String,
    pub position: Location,
    pub color: &'static str,
    pub title: String,
    pub priority: Priority,
    pub info: MarkerInfo,
}

impl MapMarker {
    pub fn from_record<Tz: TimeZone>(record: &IssueRecord, tz: &Tz) -> Self {
        let color = record.priority.color();
        Self {
            id: record.id.clone(),
            position: record.location,
            color,
            title: record.ai_summary.clone(),
            priority: record.priority,
            info: MarkerInfo {
                label: format!("{} Priority", record.priority),
                color,
                summary: record.ai_summary.clone(),
                date: local_date(record.timestamp, tz),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: Location,
    pub zoom: u8,
    pub markers: Vec<MapMarker>,
}

impl MapView {
    /// Centre on the viewer if known, otherwise on [`FALLBACK_CENTER`]
    pub fn new(viewer: Option<Location>) -> Self {
        Self {
            center: viewer.filter(Location::is_valid).unwrap_or(FALLBACK_CENTER),
            zoom: DEFAULT_ZOOM,
            markers: Vec::new(),
        }
    }

    /// Replace all markers (one per record)
    pub fn update_markers<Tz: TimeZone>(&mut self, records: &[IssueRecord], tz: &Tz) {
        self.markers.clear();
        self.markers
            .extend(records.iter().map(|r| MapMarker::from_record(r, tz)));
    }

    /// Marker click → popup info
    pub fn marker_info(&self, id: &str) -> Option<&MarkerInfo> {
        self.markers.iter().find(|m| m.id == id).map(|m| &m.info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::models::{Address, IssueStatus};

    fn record(id: &str, priority: Priority, location: Location) -> IssueRecord {
        IssueRecord {
            id: id.into(),
            description: "Flooded underpass".into(),
            image: None,
            priority,
            ai_summary: format!("{id} summary"),
            ai_reason: "reason".into(),
            priority_score: 70,
            location,
            address: Address::default(),
            timestamp: 1_709_294_400_000,
            status: IssueStatus::Pending,
        }
    }

    #[test]
    fn centres_on_viewer_or_fallback() {
        assert_eq!(MapView::new(None).center, FALLBACK_CENTER);
        let viewer = Location::new(39.78, -89.65);
        let view = MapView::new(Some(viewer));
        assert_eq!(view.center, viewer);
        assert_eq!(view.zoom, 14);
    }

    #[test]
    fn markers_refresh_in_place() {
        let mut view = MapView::new(None);
        view.update_markers(
            &[
                record("a", Priority::High, Location::new(1.0, 1.0)),
                record("b", Priority::Low, Location::new(2.0, 2.0)),
            ],
            &Utc,
        );
        assert_eq!(view.markers.len(), 2);
        assert_eq!(view.markers[0].color, "#EF4444");
        assert_eq!(view.markers[1].color, "#3B82F6");
        assert_eq!(view.markers[0].title, "a summary");

        view.update_markers(&[record("c", Priority::Medium, Location::new(3.0, 3.0))], &Utc);
        assert_eq!(view.markers.len(), 1);
        let info = view.marker_info("c").unwrap();
        assert_eq!(info.label, "Medium Priority");
        assert_eq!(info.color, "#F59E0B");
        assert_eq!(info.date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert!(view.marker_info("a").is_none());
    }
}
