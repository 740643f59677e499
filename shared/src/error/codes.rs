//! Unified error codes for Civic Pulse
//!
//! This module defines all error codes used across civic-server and its clients.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Report errors
//! - 3xxx: Location errors
//! - 4xxx: Classification errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// No active session
    NotAuthenticated = 1001,
    /// Login payload rejected
    InvalidCredentials = 1002,

    // ==================== 2xxx: Report ====================
    /// Issue report not found
    IssueNotFound = 2001,
    /// Description is too short to submit
    DescriptionTooShort = 2002,
    /// City, state or postal code missing
    AddressIncomplete = 2003,
    /// Location detection still running
    LocationInProgress = 2004,
    /// Destructive action was not confirmed
    DeleteNotConfirmed = 2005,
    /// Image payload is not valid base64 image data
    ImageInvalid = 2006,
    /// Image payload exceeds the size limit
    ImageTooLarge = 2007,

    // ==================== 3xxx: Location ====================
    /// User denied location access
    LocationPermissionDenied = 3001,
    /// Position fix timed out
    LocationTimeout = 3002,
    /// Position could not be determined
    LocationUnavailable = 3003,
    /// Device offers no positioning
    LocationUnsupported = 3004,
    /// Reverse geocoding failed
    GeocodeFailed = 3005,
    /// Latitude/longitude out of range
    InvalidCoordinates = 3006,

    // ==================== 4xxx: Classification ====================
    /// Classification service has no API key
    ClassifierNotConfigured = 4001,
    /// Classification request failed
    ClassifierFailed = 4002,
    /// Classification response did not match the schema
    ClassifierInvalidResponse = 4003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Durable storage error
    StorageError = 9002,
    /// Configuration error
    ConfigError = 9003,
    /// Network error
    NetworkError = 9004,
    /// Operation timed out
    TimeoutError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this code represents success
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            Self::Success => "Success",
            Self::ValidationFailed => "Validation failed",
            Self::InvalidFormat => "Invalid format",
            Self::RequiredField => "Required field missing",

            // Auth
            Self::NotAuthenticated => "Not logged in",
            Self::InvalidCredentials => "Email is required",

            // Report
            Self::IssueNotFound => "Issue report not found",
            Self::DescriptionTooShort => "Description must be longer than 5 characters",
            Self::AddressIncomplete => "City, state and postal code are required",
            Self::LocationInProgress => "Location detection is still in progress",
            Self::DeleteNotConfirmed => "Deletion must be confirmed",
            Self::ImageInvalid => "Image payload is invalid",
            Self::ImageTooLarge => "Image payload is too large",

            // Location
            Self::LocationPermissionDenied => "Permission denied. Check browser settings.",
            Self::LocationTimeout => "GPS Signal timeout.",
            Self::LocationUnavailable => "Detection failed.",
            Self::LocationUnsupported => "GPS not supported by your browser.",
            Self::GeocodeFailed => "Address lookup failed. Please use manual entry.",
            Self::InvalidCoordinates => "Coordinates are out of range",

            // Classification
            Self::ClassifierNotConfigured => "Classification API key is not configured",
            Self::ClassifierFailed => "Classification request failed",
            Self::ClassifierInvalidResponse => "Classification response is invalid",

            // System
            Self::InternalError => "Internal server error",
            Self::StorageError => "Storage error",
            Self::ConfigError => "Configuration error",
            Self::NetworkError => "Network error",
            Self::TimeoutError => "Operation timed out",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),

            // Report
            2001 => Ok(ErrorCode::IssueNotFound),
            2002 => Ok(ErrorCode::DescriptionTooShort),
            2003 => Ok(ErrorCode::AddressIncomplete),
            2004 => Ok(ErrorCode::LocationInProgress),
            2005 => Ok(ErrorCode::DeleteNotConfirmed),
            2006 => Ok(ErrorCode::ImageInvalid),
            2007 => Ok(ErrorCode::ImageTooLarge),

            // Location
            3001 => Ok(ErrorCode::LocationPermissionDenied),
            3002 => Ok(ErrorCode::LocationTimeout),
            3003 => Ok(ErrorCode::LocationUnavailable),
            3004 => Ok(ErrorCode::LocationUnsupported),
            3005 => Ok(ErrorCode::GeocodeFailed),
            3006 => Ok(ErrorCode::InvalidCoordinates),

            // Classification
            4001 => Ok(ErrorCode::ClassifierNotConfigured),
            4002 => Ok(ErrorCode::ClassifierFailed),
            4003 => Ok(ErrorCode::ClassifierInvalidResponse),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::StorageError),
            9003 => Ok(ErrorCode::ConfigError),
            9004 => Ok(ErrorCode::NetworkError),
            9005 => Ok(ErrorCode::TimeoutError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::IssueNotFound.code(), 2001);
        assert_eq!(ErrorCode::DeleteNotConfirmed.code(), 2005);
        assert_eq!(ErrorCode::LocationPermissionDenied.code(), 3001);
        assert_eq!(ErrorCode::GeocodeFailed.code(), 3005);
        assert_eq!(ErrorCode::ClassifierNotConfigured.code(), 4001);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
        assert_eq!(ErrorCode::StorageError.code(), 9002);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::InvalidFormat.is_success());
        assert!(!ErrorCode::StorageError.is_success());
    }

    #[test]
    fn test_try_from_roundtrip() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::RequiredField,
            ErrorCode::InvalidFormat,
            ErrorCode::InvalidCredentials,
            ErrorCode::ImageTooLarge,
            ErrorCode::InvalidCoordinates,
            ErrorCode::ClassifierInvalidResponse,
            ErrorCode::TimeoutError,
        ];
        for code in codes {
            let value: u16 = code.into();
            assert_eq!(ErrorCode::try_from(value), Ok(code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(9999), Err(InvalidErrorCode(9999)));
        assert_eq!(ErrorCode::try_from(4004), Err(InvalidErrorCode(4004)));
        assert_eq!(ErrorCode::try_from(1), Err(InvalidErrorCode(1)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::IssueNotFound).unwrap();
        assert_eq!(json, "2001");

        let code: ErrorCode = serde_json::from_str("3002").unwrap();
        assert_eq!(code, ErrorCode::LocationTimeout);
    }

    #[test]
    fn test_deserialize_invalid() {
        let result: Result<ErrorCode, _> = serde_json::from_str("12345");
        assert!(result.is_err());
    }

    #[test]
    fn test_location_messages_match_user_facing_text() {
        assert_eq!(
            ErrorCode::LocationPermissionDenied.message(),
            "Permission denied. Check browser settings."
        );
        assert_eq!(ErrorCode::LocationTimeout.message(), "GPS Signal timeout.");
        assert_eq!(ErrorCode::LocationUnavailable.message(), "Detection failed.");
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ErrorCode::InvalidFormat), "6");
        assert_eq!(format!("{}", InvalidErrorCode(77)), "invalid error code: 77");
    }
}
