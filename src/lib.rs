//! Headless core for a client administration dashboard
//!
//! Session restore, login and logout over a stored bearer token, a route
//! guard for the protected shell, a list view-model with server-side
//! filtering and local ordering, pagination and selection, and the
//! create/edit/delete flows against a remote client API.

pub mod clients;
pub mod config;
pub mod dialog;
pub mod error;
pub mod fetch;
pub mod guard;
pub mod registry;
pub mod session;

use std::sync::Arc;
use reqwest::Client;

use crate::clients::{ClientApi, ClientService};
use crate::config::DashboardOptions;
use crate::dialog::ClientDialog;
use crate::guard::RouteGuard;
use crate::registry::ClientRegistry;
use crate::session::{Credentials, MemoryTokenStore, SessionManager, TokenStore};

/// The main entry point wiring the dashboard core together
pub struct Dashboard {
    /// Base URL of the remote API
    pub url: String,
    /// HTTP client used for requests
    pub http_client: Client,
    /// Session manager owning authentication state
    pub session: SessionManager,
    /// Client options
    pub options: DashboardOptions,
    /// Client API service shared by the registry and the dialog
    api: Arc<dyn ClientApi>,
}

impl Dashboard {
    /// Create a dashboard core with default options and an in-memory
    /// token slot
    ///
    /// # Example
    ///
    /// ```
    /// use clientdesk::Dashboard;
    ///
    /// let dashboard = Dashboard::new();
    /// ```
    pub fn new() -> Self {
        Self::with_options(DashboardOptions::default())
    }

    /// Create a dashboard core with custom options
    ///
    /// # Example
    ///
    /// ```
    /// use clientdesk::{config::DashboardOptions, Dashboard};
    ///
    /// let options = DashboardOptions::default().with_api_url("https://desk.example.com/api");
    /// let dashboard = Dashboard::with_options(options);
    /// ```
    pub fn with_options(options: DashboardOptions) -> Self {
        Self::with_token_store(options, Arc::new(MemoryTokenStore::new()))
    }

    /// Create a dashboard core persisting the session token in the given
    /// store
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use clientdesk::{config::DashboardOptions, session::FileTokenStore, Dashboard};
    ///
    /// let store = Arc::new(FileTokenStore::new("/tmp/clientdesk-token"));
    /// let dashboard = Dashboard::with_token_store(DashboardOptions::default(), store);
    /// ```
    pub fn with_token_store(options: DashboardOptions, store: Arc<dyn TokenStore>) -> Self {
        let http_client = match options.request_timeout {
            Some(timeout) => Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            None => Client::new(),
        };

        let credentials = Credentials::new();
        let session = SessionManager::new(
            &options.api_url,
            http_client.clone(),
            store,
            credentials.clone(),
        );
        let api: Arc<dyn ClientApi> = Arc::new(ClientService::new(
            &options.api_url,
            http_client.clone(),
            credentials,
        ));

        Self {
            url: options.api_url.clone(),
            http_client,
            session,
            options,
            api,
        }
    }

    /// Get a reference to the session manager
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Create a route guard for the protected shell
    pub fn guard(&self) -> RouteGuard {
        RouteGuard::with_sign_in_route(&self.options.sign_in_route)
    }

    /// Get a handle to the client API collaborator
    pub fn clients(&self) -> Arc<dyn ClientApi> {
        self.api.clone()
    }

    /// Create a view-model for the client list screen
    ///
    /// # Example
    ///
    /// ```
    /// use clientdesk::Dashboard;
    ///
    /// let dashboard = Dashboard::new();
    /// let registry = dashboard.registry();
    /// ```
    pub fn registry(&self) -> ClientRegistry {
        ClientRegistry::with_settings(
            self.api.clone(),
            self.options.default_page_size,
            self.options.search_debounce,
        )
    }

    /// Create a create/edit dialog bound to the given registry
    pub fn dialog(&self, registry: &ClientRegistry) -> ClientDialog {
        ClientDialog::new(self.api.clone(), registry.clone())
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::clients::{ClientApi, ClientDraft, ClientQuery, ClientRecord, ClientType};
    pub use crate::config::DashboardOptions;
    pub use crate::dialog::{ClientDialog, DraftField, SubmitOutcome};
    pub use crate::error::Error;
    pub use crate::guard::{GuardOutcome, Navigation, RouteGuard};
    pub use crate::registry::{ClientRegistry, SortDirection, SortKey};
    pub use crate::session::{
        LoginCredentials, RegisterRequest, SessionManager, SessionStatus, TokenStore,
    };
    pub use crate::Dashboard;
}
