//! Authentication domain types
//!
//! Back-office login. The password check is a plain comparison against the
//! stored value; no session or token is issued.

use serde::{Deserialize, Serialize};

/// Sign in request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    /// Name and password, when both are present and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let name = self.name.as_deref().filter(|s| !s.is_empty())?;
        let password = self.password.as_deref().filter(|s| !s.is_empty())?;
        Some((name, password))
    }
}

/// Logged-in user, without the password
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponse {
    pub id: i64,
    pub name: String,
    pub mobile: Option<String>,
}
