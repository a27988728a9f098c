//! Lorcana collection SDK for Rust.
//!
//! Provides a typed client for the card collection backend: browse sets
//! ("chapters") and their cards, track owned standard/foil quantities, and
//! maintain a wishlist. The backend owns all state; this crate shapes the
//! HTTP calls, keeps the login session (token persisted on disk and validated
//! on start-up), and decodes responses into typed models.
//!
//! # Quick start
//!
//! ```no_run
//! use lorcana_collection_sdk::{CollectionSdk, Finish, SessionState};
//!
//! let mut sdk = CollectionSdk::builder()
//!     .base_url("https://lorcana.brybry.fr/api")
//!     .build()
//!     .unwrap();
//!
//! // Resume the previous session, or sign in
//! if sdk.session_mut().restart_check() != SessionState::Authenticated {
//!     sdk.session_mut().sign_in("a@b.com", "pw").unwrap();
//! }
//!
//! let sets = sdk.catalog().unwrap().sets().unwrap();
//! let counts = sdk.collection().unwrap().add_copy("42", Finish::Foil).unwrap();
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod observer;
pub mod queries;
pub mod session;
pub mod store;
pub mod transport;

#[cfg(feature = "async")]
pub use async_client::AsyncCollectionSdk;
pub use client::{join_url, ApiClient};
pub use error::{CollectionError, Result};
pub use models::{
    Card, CardSet, CollectionSummary, Envelope, Finish, OwnedCardCount, Quantities, Registration,
    SetCard, User, WishlistEntry,
};
pub use observer::{NoopObserver, RequestObserver, TracingObserver};
pub use queries::{CardFilter, CatalogQuery, CollectionQuery};
pub use session::{SessionManager, SessionState};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// CollectionSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`CollectionSdk`] instance.
///
/// Use [`CollectionSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](CollectionSdkBuilder::build) to create the SDK.
#[derive(Default)]
pub struct CollectionSdkBuilder {
    base_url: Option<String>,
    data_dir: Option<PathBuf>,
    token_store: Option<Box<dyn TokenStore>>,
    transport: Option<Arc<dyn Transport>>,
    observer: Option<Arc<dyn RequestObserver>>,
}

impl CollectionSdkBuilder {
    /// Set the backend base URL.
    ///
    /// If not set, the `API_URL` environment variable is used, falling back
    /// to [`config::DEFAULT_BASE_URL`].
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = Some(url.to_string());
        self
    }

    /// Set the directory holding the persisted session token.
    ///
    /// If not set, the platform-appropriate local data directory is used
    /// (e.g. `~/.local/share/lorcana-collection-sdk` on Linux). Ignored when a
    /// custom [`token_store`](Self::token_store) is supplied.
    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Persist the session token somewhere other than the data directory.
    pub fn token_store(mut self, store: impl TokenStore + 'static) -> Self {
        let store: Box<dyn TokenStore> = Box::new(store);
        self.token_store = Some(store);
        self
    }

    /// Send requests through a custom transport instead of `reqwest`.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Report request lifecycle events to a custom observer.
    ///
    /// Defaults to [`TracingObserver`].
    pub fn observer(mut self, observer: Arc<dyn RequestObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Build the SDK.
    ///
    /// Opens the token store but does **not** contact the backend; call
    /// [`SessionManager::restart_check`] to resume a persisted session.
    pub fn build(self) -> Result<CollectionSdk> {
        let base_url = self.base_url.unwrap_or_else(config::base_url_from_env);
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new()?),
        };

        let mut client = ApiClient::with_transport(&base_url, transport);
        if let Some(observer) = self.observer {
            client = client.with_observer(observer);
        }

        let store: Box<dyn TokenStore> = match self.token_store {
            Some(store) => store,
            None => Box::new(FileTokenStore::new(self.data_dir)?),
        };

        Ok(CollectionSdk {
            session: SessionManager::new(client, store),
        })
    }
}

// ---------------------------------------------------------------------------
// CollectionSdk
// ---------------------------------------------------------------------------

/// The main entry point for the collection SDK.
///
/// Owns the [`SessionManager`] (and through it the [`ApiClient`]) and hands
/// out typed query interfaces bound to the session token.
///
/// Created via [`CollectionSdk::builder()`].
pub struct CollectionSdk {
    session: SessionManager,
}

impl CollectionSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> CollectionSdkBuilder {
        CollectionSdkBuilder::default()
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Mutable access for login, logout and the start-up check.
    pub fn session_mut(&mut self) -> &mut SessionManager {
        &mut self.session
    }

    /// The underlying API client, for raw envelope access.
    pub fn client(&self) -> &ApiClient {
        self.session.client()
    }

    /// Access the catalog query interface.
    ///
    /// Fails with [`CollectionError::Precondition`] unless the session is
    /// authenticated.
    pub fn catalog(&self) -> Result<CatalogQuery<'_>> {
        let token = self.session.require_token()?;
        Ok(CatalogQuery::new(self.session.client(), token))
    }

    /// Access the owned-cards and wishlist interface.
    ///
    /// Fails with [`CollectionError::Precondition`] unless the session is
    /// authenticated.
    pub fn collection(&self) -> Result<CollectionQuery<'_>> {
        let token = self.session.require_token()?;
        Ok(CollectionQuery::new(self.session.client(), token))
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for CollectionSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CollectionSdk(base_url={}, session={}, loading={})",
            self.client().base_url(),
            self.session.state(),
            self.session.is_loading()
        )
    }
}
