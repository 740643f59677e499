//! 只读投影
//!
//! - [`dashboard`] 按优先级过滤的列表 (grid / table)
//! - [`map`] 地图标记
//! - [`analytics`] 统计图表数据

pub mod analytics;
pub mod dashboard;
pub mod map;

pub use analytics::{AnalyticsView, DayCount, PriorityBucket, Summary};
pub use dashboard::{DashboardView, IssueRow, PriorityFilter, ViewMode};
pub use map::{MapMarker, MapView, MarkerInfo};

use chrono::{DateTime, NaiveDate, TimeZone};

/// Calendar date of an epoch-millis timestamp in the given zone
pub(crate) fn local_date<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(timestamp).map(|utc| utc.with_timezone(tz).date_naive())
}
