//! Configuration options for the dashboard core

use std::time::Duration;

use crate::guard::SIGN_IN_ROUTE;
use crate::registry::{PAGE_SIZE_OPTIONS, SEARCH_DEBOUNCE};

/// Environment variable overriding the API base URL
pub const ENV_API_URL: &str = "CLIENTDESK_API_URL";

/// Default API base URL (local development backend)
pub const DEFAULT_API_URL: &str = "https://localhost:7163/api";

/// Configuration options for the dashboard core
#[derive(Debug, Clone)]
pub struct DashboardOptions {
    /// Base URL of the remote API
    pub api_url: String,

    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// Quiet period between the last search keystroke and the list fetch
    pub search_debounce: Duration,

    /// Page size the client list starts with
    pub default_page_size: usize,

    /// Route the guard redirects signed-out visitors to
    pub sign_in_route: String,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Some(Duration::from_secs(30)),
            search_debounce: SEARCH_DEBOUNCE,
            default_page_size: PAGE_SIZE_OPTIONS[0],
            sign_in_route: SIGN_IN_ROUTE.to_string(),
        }
    }
}

impl DashboardOptions {
    /// Options with the API base URL resolved from the environment
    pub fn from_env() -> Self {
        Self::default().with_api_url(&resolve_api_url())
    }

    /// Set the API base URL
    pub fn with_api_url(mut self, value: &str) -> Self {
        self.api_url = value.trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the quiet period of the debounced search fetch
    pub fn with_search_debounce(mut self, value: Duration) -> Self {
        self.search_debounce = value;
        self
    }

    /// Set the page size the client list starts with
    pub fn with_default_page_size(mut self, value: usize) -> Self {
        self.default_page_size = value;
        self
    }

    /// Set the route the guard redirects signed-out visitors to
    pub fn with_sign_in_route(mut self, value: &str) -> Self {
        self.sign_in_route = value.to_string();
        self
    }
}

/// Resolve the API base URL from the environment, falling back to the
/// default when the variable is unset or blank
pub fn resolve_api_url() -> String {
    std::env::var(ENV_API_URL)
        .ok()
        .map(|value| value.trim().trim_end_matches('/').to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}
