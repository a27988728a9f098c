//! Single chokepoint for backend communication.
//!
//! [`ApiClient::request`] shapes every call (URL join, JSON headers, optional
//! bearer token), sends it through the configured [`Transport`], and turns
//! non-success answers into [`CollectionError::Backend`]. The remaining
//! methods are thin, fixed-shape specializations of it, one per backend
//! operation, returning the raw JSON envelope.

use std::fmt;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::error::{CollectionError, Result};
use crate::models::{Quantities, Registration};
use crate::observer::{RequestObserver, TracingObserver};
use crate::transport::{HttpRequest, Method, ReqwestTransport, Transport};

/// Join a base URL and an endpoint with exactly one `/` between them.
///
/// Trailing slashes on the base and leading slashes on the endpoint are
/// collapsed, so `("http://h/api/", "/sets")`, `("http://h/api", "sets")`
/// and every other mix yield `http://h/api/sets`.
pub fn join_url(base: &str, endpoint: &str) -> String {
    let base = base.trim_end_matches('/');
    let endpoint = endpoint.trim_start_matches('/');
    format!("{base}/{endpoint}")
}

/// HTTP client for the collection backend.
///
/// Cheap to clone: the transport and observer are shared.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    observer: Arc<dyn RequestObserver>,
}

impl ApiClient {
    /// Create a client using the default `reqwest` transport and tracing observer.
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self::with_transport(base_url, Arc::new(ReqwestTransport::new()?)))
    }

    /// Create a client sending through the given transport.
    pub fn with_transport(base_url: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.to_string(),
            transport,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replace the request observer.
    pub fn with_observer(mut self, observer: Arc<dyn RequestObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for a relative endpoint.
    pub fn url(&self, endpoint: &str) -> String {
        join_url(&self.base_url, endpoint)
    }

    /// Build the outgoing request without sending it.
    ///
    /// An empty token is treated as no token, and a `null` body as no body.
    pub fn build_request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<HttpRequest> {
        let mut headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ];
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }

        let body = match body {
            Some(Value::Null) | None => None,
            Some(value) => Some(serde_json::to_string(value)?),
        };

        Ok(HttpRequest {
            method,
            url: self.url(endpoint),
            headers,
            body,
        })
    }

    /// Send one request and return the parsed JSON body unchanged.
    ///
    /// Fire-once: no retries and no timeout beyond the transport default.
    ///
    /// # Errors
    ///
    /// * [`CollectionError::Transport`] if the request never got an answer.
    /// * [`CollectionError::Backend`] for any non-2xx status, carrying the
    ///   raw response text.
    /// * [`CollectionError::Decode`] if a 2xx body is not valid JSON.
    pub fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<Value> {
        let request = self.build_request(method, endpoint, body, token)?;
        self.observer.on_request(&request);

        let result = self.execute(&request);
        if let Err(ref err) = result {
            self.observer.on_error(&request, err);
        }
        result
    }

    fn execute(&self, request: &HttpRequest) -> Result<Value> {
        let response = self.transport.send(request)?;
        self.observer.on_response(request, response.status);

        if !response.is_success() {
            return Err(CollectionError::Backend {
                status: response.status,
                body: response.body,
            });
        }

        Ok(serde_json::from_str(&response.body)?)
    }

    // -- Auth ----------------------------------------------------------------

    pub fn register(&self, registration: &Registration) -> Result<Value> {
        let body = serde_json::to_value(registration)?;
        self.request(Method::Post, "register", Some(&body), None)
    }

    pub fn login(&self, email: &str, password: &str) -> Result<Value> {
        let body = json!({ "email": email, "password": password });
        self.request(Method::Post, "login", Some(&body), None)
    }

    pub fn logout(&self, token: &str) -> Result<Value> {
        self.request(Method::Post, "logout", None, Some(token))
    }

    /// Current user; also serves as the token validation call.
    pub fn me(&self, token: &str) -> Result<Value> {
        self.request(Method::Get, "me", None, Some(token))
    }

    // -- Catalog ---------------------------------------------------------------

    /// List all sets.
    ///
    /// Unlike the other catalog calls this refuses to run without a token and
    /// fails with [`CollectionError::Precondition`] before touching the network.
    pub fn sets(&self, token: Option<&str>) -> Result<Value> {
        let token = token.filter(|t| !t.is_empty()).ok_or_else(|| {
            CollectionError::Precondition("a token is required to list sets".into())
        })?;
        self.request(Method::Get, "sets", None, Some(token))
    }

    pub fn set(&self, set_id: &str, token: &str) -> Result<Value> {
        self.request(Method::Get, &format!("sets/{set_id}"), None, Some(token))
    }

    pub fn set_cards(&self, set_id: &str, token: &str) -> Result<Value> {
        self.request(Method::Get, &format!("sets/{set_id}/cards"), None, Some(token))
    }

    pub fn card(&self, card_id: &str, token: &str) -> Result<Value> {
        self.request(Method::Get, &format!("cards/{card_id}"), None, Some(token))
    }

    // -- Collection ------------------------------------------------------------

    pub fn owned_cards(&self, token: &str) -> Result<Value> {
        self.request(Method::Get, "me/cards", None, Some(token))
    }

    /// Overwrite the owned counts of one card.
    ///
    /// [`Quantities`] is unsigned, so the outgoing body can never carry a
    /// negative count.
    pub fn update_owned_card(
        &self,
        card_id: &str,
        quantities: Quantities,
        token: &str,
    ) -> Result<Value> {
        let body = serde_json::to_value(quantities)?;
        self.request(
            Method::Post,
            &format!("me/{card_id}/update-owned"),
            Some(&body),
            Some(token),
        )
    }

    // -- Wishlist --------------------------------------------------------------

    pub fn wishlist(&self, token: &str) -> Result<Value> {
        self.request(Method::Get, "wishlist", None, Some(token))
    }

    pub fn add_to_wishlist(&self, card_id: &str, token: &str) -> Result<Value> {
        let body = json!({ "card_id": card_id });
        self.request(Method::Post, "wishlist/add", Some(&body), Some(token))
    }

    pub fn remove_from_wishlist(&self, card_id: &str, token: &str) -> Result<Value> {
        let body = json!({ "card_id": card_id });
        self.request(Method::Post, "wishlist/remove", Some(&body), Some(token))
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
