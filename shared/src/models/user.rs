//! User Session Model

use serde::{Deserialize, Serialize};

/// Logged-in identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Login payload
///
/// No credential check is performed: any non-blank email is accepted.
/// `password` is carried for form parity and ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Register mode requires a name
    #[serde(default)]
    pub register: bool,
}
