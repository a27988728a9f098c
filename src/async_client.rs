//! Async wrapper around [`CollectionSdk`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all SDK operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free while
//! the blocking HTTP client waits on the backend.
//!
//! # Example
//!
//! ```no_run
//! use lorcana_collection_sdk::AsyncCollectionSdk;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let sdk = AsyncCollectionSdk::builder().build().await.unwrap();
//!
//!     // Resume the persisted session before showing any screen
//!     let state = sdk.restart_check().await.unwrap();
//!
//!     // Queries run in parallel with each other
//!     let sets = sdk.catalog(|q| q.sets()).await.unwrap();
//!
//!     // Or run any sync SDK method via closure (holds the SDK lock)
//!     let state = sdk.run(|s| Ok(s.session().state())).await.unwrap();
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::client::ApiClient;
use crate::error::{CollectionError, Result};
use crate::queries::{CatalogQuery, CollectionQuery};
use crate::session::SessionState;
use crate::CollectionSdk;

// ---------------------------------------------------------------------------
// AsyncCollectionSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncCollectionSdk`] instance.
#[derive(Default)]
pub struct AsyncCollectionSdkBuilder {
    base_url: Option<String>,
    data_dir: Option<PathBuf>,
}

impl AsyncCollectionSdkBuilder {
    /// Set the backend base URL.
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = Some(url.to_string());
        self
    }

    /// Set the directory holding the persisted session token.
    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Build the async SDK.
    ///
    /// Initialization runs on the blocking thread pool so it won't block
    /// the async event loop.
    pub async fn build(self) -> Result<AsyncCollectionSdk> {
        tokio::task::spawn_blocking(move || {
            let mut builder = CollectionSdk::builder();
            if let Some(url) = self.base_url {
                builder = builder.base_url(&url);
            }
            if let Some(dir) = self.data_dir {
                builder = builder.data_dir(dir);
            }
            Ok(AsyncCollectionSdk::from_sdk(builder.build()?))
        })
        .await
        .map_err(join_error)?
    }
}

// ---------------------------------------------------------------------------
// AsyncCollectionSdk
// ---------------------------------------------------------------------------

/// Async wrapper around [`CollectionSdk`].
///
/// All operations are dispatched to a blocking thread pool via
/// [`tokio::task::spawn_blocking`]. The underlying [`CollectionSdk`] sits
/// behind a [`Mutex`] that is held for the whole of a session mutation
/// (login, logout, start-up check), so those never overlap. Catalog and
/// collection queries only take the lock to snapshot the client and token,
/// then run unlocked, so independent queries are in flight together.
/// Cloning the wrapper shares the same SDK.
#[derive(Clone)]
pub struct AsyncCollectionSdk {
    inner: Arc<Mutex<CollectionSdk>>,
}

impl AsyncCollectionSdk {
    /// Create a new builder for configuring the async SDK.
    pub fn builder() -> AsyncCollectionSdkBuilder {
        AsyncCollectionSdkBuilder::default()
    }

    /// Wrap an already configured SDK.
    pub fn from_sdk(sdk: CollectionSdk) -> Self {
        Self {
            inner: Arc::new(Mutex::new(sdk)),
        }
    }

    /// Run a sync SDK operation on the blocking thread pool.
    ///
    /// The closure receives a `&mut CollectionSdk` and holds the SDK lock
    /// until it returns; prefer [`catalog`](Self::catalog) and
    /// [`collection`](Self::collection) for queries that may run in parallel.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut CollectionSdk) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sdk = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = sdk
                .lock()
                .map_err(|_| CollectionError::Internal("SDK lock poisoned".into()))?;
            f(&mut guard)
        })
        .await
        .map_err(join_error)?
    }

    /// Run a catalog query without holding the SDK lock.
    ///
    /// Fails with [`CollectionError::Precondition`] unless the session is
    /// authenticated when the call starts.
    pub async fn catalog<F, T>(&self, f: F) -> Result<T>
    where
        F: for<'q> FnOnce(CatalogQuery<'q>) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (client, token) = self.snapshot()?;
        tokio::task::spawn_blocking(move || f(CatalogQuery::new(&client, &token)))
            .await
            .map_err(join_error)?
    }

    /// Run an owned-cards or wishlist query without holding the SDK lock.
    pub async fn collection<F, T>(&self, f: F) -> Result<T>
    where
        F: for<'q> FnOnce(CollectionQuery<'q>) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (client, token) = self.snapshot()?;
        tokio::task::spawn_blocking(move || f(CollectionQuery::new(&client, &token)))
            .await
            .map_err(join_error)?
    }

    /// Validate the persisted token. See [`SessionManager::restart_check`](crate::SessionManager::restart_check).
    pub async fn restart_check(&self) -> Result<SessionState> {
        self.run(|s| Ok(s.session_mut().restart_check())).await
    }

    /// Sign in with credentials. See [`SessionManager::sign_in`](crate::SessionManager::sign_in).
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Value> {
        let email = email.to_string();
        let password = password.to_string();
        self.run(move |s| s.session_mut().sign_in(&email, &password)).await
    }

    pub async fn logout(&self) -> Result<()> {
        self.run(|s| s.session_mut().logout()).await
    }

    pub async fn state(&self) -> Result<SessionState> {
        self.run(|s| Ok(s.session().state())).await
    }

    // Brief lock: a session mutation in progress is waited for, but the
    // query itself runs on the cloned client.
    fn snapshot(&self) -> Result<(ApiClient, String)> {
        let guard = self
            .inner
            .lock()
            .map_err(|_| CollectionError::Internal("SDK lock poisoned".into()))?;
        let token = guard.session().require_token()?.to_string();
        Ok((guard.client().clone(), token))
    }
}

fn join_error(err: tokio::task::JoinError) -> CollectionError {
    CollectionError::Internal(format!("Task join error: {err}"))
}
