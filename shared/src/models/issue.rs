//! Civic Issue Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::classification::{Classification, normalize_score};

/// Minimum description length is exclusive: a description must be longer
/// than this many characters to be submitted.
pub const MIN_DESCRIPTION_LEN: usize = 5;

/// Issue priority as assigned by classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// All priorities, most severe first
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Marker / chart colour
    pub fn color(&self) -> &'static str {
        match self {
            Self::High => "#EF4444",
            Self::Medium => "#F59E0B",
            Self::Low => "#3B82F6",
        }
    }

    /// Lenient parse used for untrusted classifier output
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown priority: {s}"))
    }
}

/// Issue lifecycle status
///
/// Manual advance cycles Pending → In Progress → Resolved → Pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IssueStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
}

impl IssueStatus {
    /// Next status in the cycle
    pub fn next(self) -> Self {
        match self {
            Self::Pending => Self::InProgress,
            Self::InProgress => Self::Resolved,
            Self::Resolved => Self::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latitude / longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite and inside WGS84 bounds
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Coarse postal address
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    /// Optional
    #[serde(default)]
    pub district: String,
    #[serde(default, alias = "pinCode")]
    pub postal_code: String,
}

impl Address {
    /// Names of required fields that are blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.city.trim().is_empty() {
            missing.push("city");
        }
        if self.state.trim().is_empty() {
            missing.push("state");
        }
        if self.postal_code.trim().is_empty() {
            missing.push("postalCode");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// One reported civic issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRecord {
    pub id: String,
    pub description: String,
    /// Data URL or bare base64
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub priority: Priority,
    pub ai_summary: String,
    pub ai_reason: String,
    /// Stored blobs may hold any JSON number here
    #[serde(default, deserialize_with = "lenient_score")]
    pub priority_score: u8,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub address: Address,
    /// Creation time, epoch millis
    pub timestamp: i64,
    #[serde(default)]
    pub status: IssueStatus,
}

impl IssueRecord {
    /// Classification bundle currently stored on the record
    pub fn classification(&self) -> Classification {
        Classification {
            priority: self.priority,
            summary: self.ai_summary.clone(),
            reason: self.ai_reason.clone(),
            score: self.priority_score,
        }
    }

    pub fn apply_classification(&mut self, classification: Classification) {
        self.priority = classification.priority;
        self.ai_summary = classification.summary;
        self.ai_reason = classification.reason;
        self.priority_score = classification.score;
    }
}

fn lenient_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw.map(normalize_score).unwrap_or(0))
}

/// How the composer obtains the address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationMode {
    /// Device fix + reverse geocoding
    #[default]
    Auto,
    /// Free-text address fields, no network call
    Manual,
}

/// Create / edit payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueSubmission {
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub location_mode: LocationMode,
    /// Device fix captured earlier through location resolve
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub address: Address,
}
