//! Classification Model

use serde::{Deserialize, Serialize};

use super::issue::Priority;

pub const FALLBACK_SUMMARY: &str = "Manual Review Required";
pub const FALLBACK_REASON: &str = "AI was unable to process the request automatically.";

/// Priority / summary / reason / score bundle produced by the AI service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub priority: Priority,
    pub summary: String,
    pub reason: String,
    /// 0..=100
    pub score: u8,
}

impl Classification {
    /// Low-priority result used whenever the service cannot answer
    pub fn fallback() -> Self {
        Self {
            priority: Priority::Low,
            summary: FALLBACK_SUMMARY.to_string(),
            reason: FALLBACK_REASON.to_string(),
            score: 0,
        }
    }

    pub fn is_fallback(&self) -> bool {
        *self == Self::fallback()
    }
}

/// Clamp an arbitrary numeric score to 0..=100, rounding fractions; NaN → 0
pub fn normalize_score(raw: f64) -> u8 {
    if raw.is_finite() {
        raw.clamp(0.0, 100.0).round() as u8
    } else {
        0
    }
}
