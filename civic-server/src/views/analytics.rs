//! Analytics projection

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Weekday};
use serde::Serialize;
use shared::models::{IssueRecord, IssueStatus, Priority};

use super::local_date;

/// Number of trailing calendar days in the trend series
pub const TREND_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityBucket {
    pub priority: Priority,
    pub count: usize,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCount {
    pub date: NaiveDate,
    /// Short weekday name ("Mon")
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    pub resolved: usize,
    pub high_priority: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsView {
    /// High, Medium, Low; empty buckets omitted
    pub priority_distribution: Vec<PriorityBucket>,
    /// Oldest first, today last
    pub last_7_days: Vec<DayCount>,
    pub summary: Summary,
}

impl AnalyticsView {
    /// Build the analytics for `now` in its own time zone
    pub fn build<Tz: TimeZone>(records: &[IssueRecord], now: &DateTime<Tz>) -> Self {
        let priority_distribution = Priority::ALL
            .iter()
            .map(|&priority| PriorityBucket {
                priority,
                count: records.iter().filter(|r| r.priority == priority).count(),
                color: priority.color(),
            })
            .filter(|b| b.count > 0)
            .collect();

        let tz = now.timezone();
        let today = now.date_naive();
        let dates: Vec<Option<NaiveDate>> =
            records.iter().map(|r| local_date(r.timestamp, &tz)).collect();

        let last_7_days = (0..TREND_DAYS)
            .rev()
            .map(|offset| {
                let date = today - Duration::days(offset);
                DayCount {
                    date,
                    label: short_weekday(date.weekday()).to_string(),
                    count: dates.iter().filter(|d| **d == Some(date)).count(),
                }
            })
            .collect();

        let summary = Summary {
            total: records.len(),
            resolved: records
                .iter()
                .filter(|r| r.status == IssueStatus::Resolved)
                .count(),
            high_priority: records
                .iter()
                .filter(|r| r.priority == Priority::High)
                .count(),
        };

        Self {
            priority_distribution,
            last_7_days,
            summary,
        }
    }
}

fn short_weekday(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}
