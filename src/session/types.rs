//! Types for authentication and session state

use serde::{Deserialize, Serialize};

use super::token::TokenClaims;

/// Identity of the signed-in user.
///
/// The wire names come from the backend's user DTO; the Rust names are
/// what the rest of the crate speaks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// Stable user id
    #[serde(rename = "UtilisateurID")]
    pub id: String,

    /// Name shown in the dashboard chrome
    #[serde(rename = "NomUtilisateur")]
    pub display_name: String,

    /// Coarse authorization role
    #[serde(rename = "Role")]
    pub role: String,
}

impl From<TokenClaims> for AuthenticatedUser {
    fn from(claims: TokenClaims) -> Self {
        Self {
            id: claims.sub,
            display_name: claims.username,
            role: claims.role,
        }
    }
}

/// Credentials submitted to the login endpoint
#[derive(Debug, Clone, Serialize)]
pub struct LoginCredentials {
    /// Account name
    pub username: String,
    /// Account password
    pub password: String,
}

/// Payload submitted to the register endpoint
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    /// Account name
    pub username: String,
    /// Account password
    pub password: String,
    /// Authorization role of the new account
    pub role: String,
}

/// Successful response from the login endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests
    pub token: String,
    /// Identity as resolved by the server
    pub user: AuthenticatedUser,
}

/// Lifecycle of the startup session restore
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// The persisted token has not been checked yet
    Initializing,
    /// The startup check completed, signed in or not
    Ready,
}

impl Default for SessionStatus {
    fn default() -> Self {
        SessionStatus::Initializing
    }
}
