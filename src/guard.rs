//! Route protection for the dashboard shell

use std::sync::atomic::{AtomicBool, Ordering};

use crate::session::{SessionManager, SessionStatus};

/// Default route the guard sends signed-out visitors to
pub const SIGN_IN_ROUTE: &str = "/sign-in";

/// Navigation command for the embedding router
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Route to navigate to
    pub target: String,
}

/// What the protected area should do right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Session restore has not finished, render nothing yet
    Pending,
    /// Not signed in, dispatch this navigation and render nothing
    Redirect(Navigation),
    /// Not signed in and the redirect was already dispatched, keep
    /// rendering nothing
    Blocked,
    /// Signed in, render the protected content
    Render,
}

/// Gate keeping protected routes behind a signed-in session.
///
/// The guard never mutates session state. Navigation is handed back as a
/// command so the embedding router stays in charge of performing it.
pub struct RouteGuard {
    sign_in_route: String,
    redirect_dispatched: AtomicBool,
}

impl RouteGuard {
    /// Create a guard redirecting to the default sign-in route
    pub fn new() -> Self {
        Self::with_sign_in_route(SIGN_IN_ROUTE)
    }

    /// Create a guard redirecting to a custom sign-in route
    pub fn with_sign_in_route(route: &str) -> Self {
        Self {
            sign_in_route: route.to_string(),
            redirect_dispatched: AtomicBool::new(false),
        }
    }

    /// Decide what the protected area should do for the current session
    /// state.
    ///
    /// The redirect command is emitted once per signed-out spell; a
    /// later sign-in re-arms it.
    pub fn evaluate(&self, session: &SessionManager) -> GuardOutcome {
        if session.status() == SessionStatus::Initializing {
            return GuardOutcome::Pending;
        }

        if session.is_authenticated() {
            self.redirect_dispatched.store(false, Ordering::SeqCst);
            return GuardOutcome::Render;
        }

        if self.redirect_dispatched.swap(true, Ordering::SeqCst) {
            GuardOutcome::Blocked
        } else {
            GuardOutcome::Redirect(Navigation {
                target: self.sign_in_route.clone(),
            })
        }
    }
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{
        encode_test_token, unix_now, Credentials, MemoryTokenStore, TokenStore,
    };
    use reqwest::Client;
    use serde_json::json;
    use std::sync::Arc;

    fn manager(store: Arc<dyn TokenStore>) -> SessionManager {
        SessionManager::new(
            "http://localhost:7163/api",
            Client::new(),
            store,
            Credentials::new(),
        )
    }

    fn signed_in_manager() -> SessionManager {
        let token = encode_test_token(&json!({
            "sub": "u1",
            "username": "admin",
            "role": "Admin",
            "exp": unix_now() + 3600,
        }));
        let manager = manager(Arc::new(MemoryTokenStore::with_token(&token)));
        manager.initialize();
        manager
    }

    #[test]
    fn renders_nothing_while_the_session_is_initializing() {
        let guard = RouteGuard::new();
        let session = manager(Arc::new(MemoryTokenStore::new()));

        assert_eq!(guard.evaluate(&session), GuardOutcome::Pending);
        // still pending on re-evaluation, no redirect was spent
        assert_eq!(guard.evaluate(&session), GuardOutcome::Pending);
    }

    #[test]
    fn redirects_a_signed_out_visitor_exactly_once() {
        let guard = RouteGuard::new();
        let session = manager(Arc::new(MemoryTokenStore::new()));
        session.initialize();

        assert_eq!(
            guard.evaluate(&session),
            GuardOutcome::Redirect(Navigation {
                target: "/sign-in".to_string()
            })
        );
        assert_eq!(guard.evaluate(&session), GuardOutcome::Blocked);
        assert_eq!(guard.evaluate(&session), GuardOutcome::Blocked);
    }

    #[test]
    fn renders_protected_content_for_a_signed_in_session() {
        let guard = RouteGuard::new();
        let session = signed_in_manager();

        assert_eq!(guard.evaluate(&session), GuardOutcome::Render);
        assert_eq!(guard.evaluate(&session), GuardOutcome::Render);
    }

    #[test]
    fn a_render_re_arms_the_redirect_for_the_next_sign_out() {
        let guard = RouteGuard::new();
        let session = signed_in_manager();

        assert_eq!(guard.evaluate(&session), GuardOutcome::Render);

        session.logout();
        assert!(matches!(guard.evaluate(&session), GuardOutcome::Redirect(_)));
        assert_eq!(guard.evaluate(&session), GuardOutcome::Blocked);
    }

    #[test]
    fn honors_a_custom_sign_in_route() {
        let guard = RouteGuard::with_sign_in_route("/login");
        let session = manager(Arc::new(MemoryTokenStore::new()));
        session.initialize();

        assert_eq!(
            guard.evaluate(&session),
            GuardOutcome::Redirect(Navigation {
                target: "/login".to_string()
            })
        );
    }
}
