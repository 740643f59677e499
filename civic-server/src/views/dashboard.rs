//! Dashboard projection

use chrono::{NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use shared::models::{IssueRecord, IssueStatus, Priority};
use std::str::FromStr;

use super::local_date;

/// Width of the id prefix shown in table rows
const ROW_ID_LEN: usize = 6;

/// Priority filter: "All" or one priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl PriorityFilter {
    pub fn matches(&self, record: &IssueRecord) -> bool {
        match self {
            Self::All => true,
            Self::Only(priority) => record.priority == *priority,
        }
    }

    /// Records passing the filter, store order kept
    pub fn apply<'a>(&self, records: &'a [IssueRecord]) -> Vec<&'a IssueRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

impl FromStr for PriorityFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") || s.trim().is_empty() {
            return Ok(Self::All);
        }
        Priority::from_str(s).map(Self::Only)
    }
}

/// Presentation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    Table,
}

/// Compact table row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRow {
    pub id: String,
    /// `#` + first six id characters
    pub short_id: String,
    pub priority: Priority,
    pub city: String,
    pub district: String,
    pub state: String,
    pub postal_code: String,
    pub summary: String,
    pub reason: String,
    pub date: Option<NaiveDate>,
    pub status: IssueStatus,
}

impl IssueRow {
    pub fn from_record<Tz: TimeZone>(record: &IssueRecord, tz: &Tz) -> Self {
        Self {
            id: record.id.clone(),
            short_id: format!("#{}", record.id.chars().take(ROW_ID_LEN).collect::<String>()),
            priority: record.priority,
            city: record.address.city.clone(),
            district: record.address.district.clone(),
            state: record.address.state.clone(),
            postal_code: record.address.postal_code.clone(),
            summary: record.ai_summary.clone(),
            reason: record.ai_reason.clone(),
            date: local_date(record.timestamp, tz),
            status: record.status,
        }
    }
}

/// Filtered dashboard content
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", content = "items", rename_all = "lowercase")]
pub enum DashboardView {
    Grid(Vec<IssueRecord>),
    Table(Vec<IssueRow>),
}

impl DashboardView {
    pub fn build<Tz: TimeZone>(
        records: &[IssueRecord],
        filter: PriorityFilter,
        mode: ViewMode,
        tz: &Tz,
    ) -> Self {
        let visible = filter.apply(records);
        match mode {
            ViewMode::Grid => Self::Grid(visible.into_iter().cloned().collect()),
            ViewMode::Table => Self::Table(
                visible
                    .into_iter()
                    .map(|r| IssueRow::from_record(r, tz))
                    .collect(),
            ),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Grid(items) => items.len(),
            Self::Table(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
