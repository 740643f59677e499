//! Location acquisition state machine
//!
//! ```text
//! idle ──detect──▶ locating ──fix + address──▶ captured
//!                     │                           │
//!                     └──error──▶ failed ◀────────┘ (geocode error)
//! failed ──retry──▶ locating      captured ──re-detect──▶ locating
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::models::Location;
use std::time::Duration;

use crate::utils::ErrorCode;

/// Where the composer is in acquiring a device fix
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LocationState {
    #[default]
    Idle,
    Locating,
    Captured {
        location: Location,
    },
    Failed {
        reason: String,
        code: ErrorCode,
        /// Coordinates retained when only the address lookup failed
        #[serde(default, skip_serializing_if = "Option::is_none")]
        location: Option<Location>,
    },
}

impl LocationState {
    pub fn is_locating(&self) -> bool {
        matches!(self, Self::Locating)
    }

    pub fn failed(code: ErrorCode, location: Option<Location>) -> Self {
        Self::Failed {
            reason: code.message().to_string(),
            code,
            location,
        }
    }
}

/// Device position error, numbered like the browser geolocation codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionError {
    /// 1
    PermissionDenied,
    /// 2 and anything unrecognized
    PositionUnavailable,
    /// 3
    Timeout,
    /// No position provider at all
    Unsupported,
}

impl PositionError {
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => Self::PermissionDenied,
            3 => Self::Timeout,
            _ => Self::PositionUnavailable,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::PermissionDenied => ErrorCode::LocationPermissionDenied,
            Self::PositionUnavailable => ErrorCode::LocationUnavailable,
            Self::Timeout => ErrorCode::LocationTimeout,
            Self::Unsupported => ErrorCode::LocationUnsupported,
        }
    }

    /// User facing reason
    pub fn message(&self) -> &'static str {
        self.code().message()
    }
}

/// Options passed to the position provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub timeout: Duration,
    pub enable_high_accuracy: bool,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            enable_high_accuracy: true,
        }
    }
}

/// Source of device coordinates
#[async_trait]
pub trait PositionProvider: Send + Sync {
    async fn current_position(&self, options: PositionOptions) -> Result<Location, PositionError>;
}

/// Position reported by the client device (fix or geolocation error code)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientReportedPosition {
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub error_code: Option<u16>,
}

#[async_trait]
impl PositionProvider for ClientReportedPosition {
    async fn current_position(&self, _options: PositionOptions) -> Result<Location, PositionError> {
        match (self.location, self.error_code) {
            (Some(location), _) if location.is_valid() => Ok(location),
            (Some(_), _) => Err(PositionError::PositionUnavailable),
            (None, Some(code)) => Err(PositionError::from_code(code)),
            (None, None) => Err(PositionError::Unsupported),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_codes_map_to_reasons() {
        assert_eq!(
            PositionError::from_code(1).message(),
            "Permission denied. Check browser settings."
        );
        assert_eq!(PositionError::from_code(3).message(), "GPS Signal timeout.");
        assert_eq!(PositionError::from_code(2).message(), "Detection failed.");
        assert_eq!(PositionError::from_code(42).message(), "Detection failed.");
        assert_eq!(
            PositionError::Unsupported.message(),
            "GPS not supported by your browser."
        );
    }

    #[test]
    fn default_options() {
        let options = PositionOptions::default();
        assert_eq!(options.timeout, Duration::from_secs(10));
        assert!(options.enable_high_accuracy);
    }

    #[tokio::test]
    async fn client_reported_position() {
        let opts = PositionOptions::default();
        let fix = ClientReportedPosition {
            location: Some(Location::new(39.78, -89.65)),
            error_code: None,
        };
        assert_eq!(fix.current_position(opts).await, Ok(Location::new(39.78, -89.65)));

        let denied = ClientReportedPosition {
            location: None,
            error_code: Some(1),
        };
        assert_eq!(
            denied.current_position(opts).await,
            Err(PositionError::PermissionDenied)
        );

        let nothing = ClientReportedPosition::default();
        assert_eq!(
            nothing.current_position(opts).await,
            Err(PositionError::Unsupported)
        );
    }

    #[test]
    fn state_serializes_with_status_tag() {
        let json = serde_json::to_value(LocationState::failed(ErrorCode::LocationTimeout, None)).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["reason"], "GPS Signal timeout.");
        assert_eq!(json["code"], 3002);
    }
}
