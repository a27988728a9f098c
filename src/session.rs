//! Authentication session lifecycle.
//!
//! [`SessionManager`] owns the current bearer token, persists it through a
//! [`TokenStore`], and validates it against `GET /me`:
//!
//! ```text
//!            restart_check / login
//!   Unauthenticated ──────────────► Authenticating ──ok──► Authenticated
//!          ▲                              │                     │
//!          └──────── validation failed ───┘                     │
//!          └──────────────────── logout ────────────────────────┘
//! ```
//!
//! A manager starts in `Authenticating` with its loading flag set, the state
//! in which the application must hold navigation until
//! [`restart_check`](SessionManager::restart_check) has run. Mutating
//! operations take `&mut self`, so they can never overlap.

use std::fmt;

use serde_json::Value;
use tracing::{info, warn};

use crate::client::ApiClient;
use crate::error::{CollectionError, Result};
use crate::models::{login_token, Envelope, Registration, User};
use crate::store::TokenStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Unauthenticated,
    Authenticating,
    Authenticated,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Unauthenticated => "unauthenticated",
            SessionState::Authenticating => "authenticating",
            SessionState::Authenticated => "authenticated",
        };
        f.write_str(name)
    }
}

pub struct SessionManager<S: TokenStore = Box<dyn TokenStore>> {
    client: ApiClient,
    store: S,
    token: Option<String>,
    state: SessionState,
    loading: bool,
}

impl<S: TokenStore> SessionManager<S> {
    /// Create a manager in the start-up `Authenticating` state.
    pub fn new(client: ApiClient, store: S) -> Self {
        Self {
            client,
            store,
            token: None,
            state: SessionState::Authenticating,
            loading: true,
        }
    }

    // -- Accessors -------------------------------------------------------------

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True until [`restart_check`](Self::restart_check) has finished.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    /// The token held in memory, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// The token of an authenticated session, or a precondition error.
    pub fn require_token(&self) -> Result<&str> {
        match (&self.token, self.state) {
            (Some(token), SessionState::Authenticated) => Ok(token.as_str()),
            _ => Err(CollectionError::Precondition(format!(
                "an authenticated session is required (session is {})",
                self.state
            ))),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // -- Lifecycle -------------------------------------------------------------

    /// Adopt a freshly obtained token.
    ///
    /// The token is persisted and held, then validated with `GET /me`. If
    /// validation fails both copies are discarded again and the failure is
    /// returned wrapped in [`CollectionError::SessionInvalid`]. Returns the
    /// raw `/me` response on success.
    pub fn login(&mut self, token: &str) -> Result<Value> {
        self.state = SessionState::Authenticating;

        if let Err(err) = self.store.save(token) {
            self.discard();
            return Err(err);
        }
        self.token = Some(token.to_string());

        match self.client.me(token) {
            Ok(user) => {
                self.state = SessionState::Authenticated;
                info!("session authenticated");
                Ok(user)
            }
            Err(err) => {
                warn!(error = %err, "token rejected during login");
                self.discard();
                Err(CollectionError::SessionInvalid(Box::new(err)))
            }
        }
    }

    /// Exchange credentials for a token and [`login`](Self::login) with it.
    pub fn sign_in(&mut self, email: &str, password: &str) -> Result<Value> {
        let response = self.client.login(email, password)?;
        let token = login_token(&response)?;
        self.login(&token)
    }

    /// Create an account. Does not sign in.
    pub fn sign_up(&self, registration: &Registration) -> Result<Value> {
        self.client.register(registration)
    }

    /// End the session.
    ///
    /// The backend is notified when a token is held, but a failed
    /// notification is only logged. Memory is always cleared; the only error
    /// returned is a failure to clear the token store.
    pub fn logout(&mut self) -> Result<()> {
        if let Some(token) = self.token.take() {
            if let Err(err) = self.client.logout(&token) {
                warn!(error = %err, "backend logout failed; clearing session locally");
            }
        }
        self.state = SessionState::Unauthenticated;
        self.store.clear()
    }

    /// Validate the token persisted by a previous run.
    ///
    /// A valid token is adopted. A missing token, a rejected token, or any
    /// failure on the way (store read, transport) ends unauthenticated with
    /// the store cleared. Always clears the loading flag and returns the
    /// final state.
    pub fn restart_check(&mut self) -> SessionState {
        self.state = SessionState::Authenticating;
        self.loading = true;

        match self.store.load() {
            Ok(None) => {
                self.token = None;
                self.state = SessionState::Unauthenticated;
            }
            Ok(Some(token)) => match self.client.me(&token) {
                Ok(_) => {
                    self.token = Some(token);
                    self.state = SessionState::Authenticated;
                    info!("restored persisted session");
                }
                Err(err) => {
                    warn!(error = %err, "persisted token is invalid");
                    self.force_logout();
                }
            },
            Err(err) => {
                warn!(error = %err, "could not read persisted token");
                self.force_logout();
            }
        }

        self.loading = false;
        self.state
    }

    /// Typed current user of the authenticated session.
    pub fn current_user(&self) -> Result<User> {
        let token = self.require_token()?;
        Envelope::<User>::from_value(self.client.me(token)?)
    }

    fn force_logout(&mut self) {
        if let Err(err) = self.logout() {
            warn!(error = %err, "failed to clear token store");
        }
    }

    // Drop both copies of the token without telling the backend.
    fn discard(&mut self) {
        self.token = None;
        self.state = SessionState::Unauthenticated;
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "failed to clear token store");
        }
    }
}

impl<S: TokenStore> fmt::Debug for SessionManager<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("state", &self.state)
            .field("loading", &self.loading)
            .field("has_token", &self.token.is_some())
            .finish()
    }
}
