//! Session management: restore, login, logout and credential ownership

mod store;
mod token;
mod types;

pub use store::*;
pub use token::*;
pub use types::*;

use reqwest::Client;
use std::sync::{Arc, RwLock};

use crate::error::Error;
use crate::fetch::Fetch;

/// Path segment of the user resource
const AUTH_PATH: &str = "/Utilisateur";

/// Bearer credential slot shared between the session manager and the API
/// services. Only the session manager writes it.
#[derive(Clone, Default)]
pub struct Credentials {
    slot: Arc<RwLock<Option<String>>>,
}

impl Credentials {
    /// Create an empty credential slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the credential attached to outbound requests
    pub fn current(&self) -> Option<String> {
        self.slot.read().unwrap().clone()
    }

    pub(crate) fn set(&self, token: &str) {
        let mut slot = self.slot.write().unwrap();
        *slot = Some(token.to_string());
    }

    pub(crate) fn clear(&self) {
        let mut slot = self.slot.write().unwrap();
        *slot = None;
    }
}

/// Mutable session state behind the manager
#[derive(Default)]
struct SessionState {
    token: Option<String>,
    user: Option<AuthenticatedUser>,
    status: SessionStatus,
}

/// Owns the authentication lifecycle of the dashboard.
///
/// The current user and the bearer token are always set and cleared
/// together, so a non-empty user implies a usable credential.
pub struct SessionManager {
    /// Base URL of the remote API
    url: String,
    /// HTTP client used for requests
    client: Client,
    /// Persisted token slot
    store: Arc<dyn TokenStore>,
    /// Credential slot shared with the API services
    credentials: Credentials,
    /// Current session state
    state: Arc<RwLock<SessionState>>,
}

impl SessionManager {
    /// Create a new session manager
    pub(crate) fn new(
        url: &str,
        client: Client,
        store: Arc<dyn TokenStore>,
        credentials: Credentials,
    ) -> Self {
        Self {
            url: url.to_string(),
            client,
            store,
            credentials,
            state: Arc::new(RwLock::new(SessionState::default())),
        }
    }

    /// Get the URL of an auth endpoint
    fn auth_url(&self, path: &str) -> String {
        format!("{}{}{}", self.url, AUTH_PATH, path)
    }

    /// Restore the session from the persisted token.
    ///
    /// An expired or unreadable token is cleared from the slot. The
    /// status always ends up `Ready`, whatever went wrong; calling this
    /// again after that is a no-op.
    pub fn initialize(&self) {
        if self.status() == SessionStatus::Ready {
            return;
        }

        let stored = match self.store.load() {
            Ok(stored) => stored,
            Err(err) => {
                log::error!("failed to read the persisted token: {}", err);
                None
            }
        };

        if let Some(token) = stored {
            match decode_claims(&token) {
                Some(claims) if claims.exp > unix_now() => {
                    self.install_session(&token, claims.into());
                }
                _ => {
                    if let Err(err) = self.store.clear() {
                        log::error!("failed to clear the persisted token: {}", err);
                    }
                    self.credentials.clear();
                }
            }
        }

        let mut state = self.state.write().unwrap();
        state.status = SessionStatus::Ready;
    }

    /// Exchange credentials for a session.
    ///
    /// On success the token is persisted, the credential slot is filled
    /// and the server-resolved identity becomes the current user. A
    /// rejection surfaces the response body as an authentication error.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthenticatedUser, Error> {
        let response = Fetch::post(&self.client, &self.auth_url("/login"))
            .json(credentials)?
            .execute_raw()
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::auth(body));
        }

        let login: LoginResponse = response.json().await?;

        if let Err(err) = self.store.save(&login.token) {
            log::error!("failed to persist the session token: {}", err);
        }
        self.install_session(&login.token, login.user.clone());

        Ok(login.user)
    }

    /// Create a dashboard account.
    ///
    /// The response body is passed through untouched; registering does
    /// not sign the new account in.
    pub async fn register(&self, request: &RegisterRequest) -> Result<serde_json::Value, Error> {
        let response = Fetch::post(&self.client, &self.auth_url("/register"))
            .json(request)?
            .execute_raw()
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::auth(body));
        }

        let text = response.text().await?;
        if text.is_empty() {
            return Ok(serde_json::Value::Null);
        }

        let body = serde_json::from_str(&text)?;
        Ok(body)
    }

    /// Drop the session.
    ///
    /// Never fails; a store that cannot be cleared is logged and the
    /// in-memory session is dropped regardless.
    pub fn logout(&self) {
        if let Err(err) = self.store.clear() {
            log::error!("failed to clear the persisted token: {}", err);
        }
        self.credentials.clear();

        let mut state = self.state.write().unwrap();
        state.token = None;
        state.user = None;
    }

    /// Whether a user is currently signed in
    pub fn is_authenticated(&self) -> bool {
        self.state.read().unwrap().user.is_some()
    }

    /// Identity of the signed-in user, if any
    pub fn current_user(&self) -> Option<AuthenticatedUser> {
        self.state.read().unwrap().user.clone()
    }

    /// The bearer token backing the session, if any
    pub fn token(&self) -> Option<String> {
        self.state.read().unwrap().token.clone()
    }

    /// Lifecycle state of the startup restore
    pub fn status(&self) -> SessionStatus {
        self.state.read().unwrap().status
    }

    /// Handle to the shared credential slot
    pub fn credentials(&self) -> Credentials {
        self.credentials.clone()
    }

    /// Install the token and identity as the current session
    fn install_session(&self, token: &str, user: AuthenticatedUser) {
        self.credentials.set(token);

        let mut state = self.state.write().unwrap();
        state.token = Some(token.to_string());
        state.user = Some(user);
    }
}
