//! Admin Session Client
//!
//! HTTP client for the admin backend. Owns the session token: issues it on
//! login, persists it through a [`TokenStore`], attaches it to every resource
//! call and drops it on logout.

use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::endpoints::{Endpoint, DEFAULT_BASE_URL};
use super::error::{AdminError, AdminResult};
use super::store::TokenStore;

/// Configuration for the session client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the admin backend
    pub base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Drop the session when a resource call is rejected with 401
    pub clear_on_unauthorized: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_ms: 30_000,
            clear_on_unauthorized: false,
        }
    }
}

impl ClientConfig {
    /// Config pointing at `base_url` with default settings otherwise
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

/// Operator credentials, held only for the duration of a login attempt
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Attach `Authorization: Bearer <token>` when a token is set.
///
/// Leaves the request untouched otherwise.
pub fn add_auth_header(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

/// Session gateway to the admin backend.
///
/// Construct one per running application and share it by reference or
/// `Arc`. All methods take `&self`; resource calls may run concurrently.
pub struct SessionClient {
    client: Client,
    config: ClientConfig,
    store: Arc<dyn TokenStore>,
    token: RwLock<Option<String>>,
}

impl SessionClient {
    /// Create a client, restoring any token persisted in `store`
    pub async fn new(config: ClientConfig, store: Arc<dyn TokenStore>) -> AdminResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        let token = store.load().await?;
        tracing::debug!(
            base_url = %config.base_url,
            restored_session = token.is_some(),
            "Session client initialized"
        );

        Ok(Self {
            client,
            config,
            store,
            token: RwLock::new(token),
        })
    }

    /// Get the current configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Whether a token is currently held.
    ///
    /// No expiry check and no round-trip: a stale token still counts until
    /// the backend rejects a request made with it.
    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Current session token, if any
    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Exchange credentials for a session token.
    ///
    /// On success the token is persisted and used for every later request.
    /// On any failure the session is left exactly as it was.
    pub async fn login(&self, username: &str, password: &str) -> AdminResult<String> {
        let credentials = Credentials::new(username, password);
        let request_id = Uuid::new_v4();
        tracing::info!(%request_id, username = %credentials.username, "Admin login attempt");

        let response = self
            .client
            .post(Endpoint::Auth.url(&self.config.base_url))
            .header("X-Request-Id", request_id.to_string())
            .json(&credentials)
            .send()
            .await
            .map_err(AdminError::from_transport)?;

        let body = match decode(response).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(%request_id, error = %e, "Admin login rejected");
                return Err(e);
            }
        };

        let token = body
            .get("token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .ok_or(AdminError::MissingToken)?;

        let mut current = self.token.write().await;
        self.store.save(&token).await?;
        *current = Some(token.clone());

        tracing::info!(%request_id, "Admin login succeeded");
        Ok(token)
    }

    /// Drop the session. Safe to call when already logged out.
    ///
    /// The in-memory session is gone even if clearing the store fails; the
    /// storage error is still returned.
    pub async fn logout(&self) -> AdminResult<()> {
        let mut current = self.token.write().await;
        if current.take().is_some() {
            tracing::info!("Admin session closed");
        }
        if let Err(e) = self.store.clear().await {
            tracing::warn!(error = %e, "Failed to clear stored token");
            return Err(e.into());
        }
        Ok(())
    }

    /// GET /admin/stats
    pub async fn get_stats(&self) -> AdminResult<Value> {
        self.get(Endpoint::Stats).await
    }

    /// GET /admin/appointments
    pub async fn get_appointments(&self) -> AdminResult<Value> {
        self.get(Endpoint::Appointments).await
    }

    /// GET /admin/medics
    pub async fn get_medics(&self) -> AdminResult<Value> {
        self.get(Endpoint::Medics).await
    }

    /// GET /admin/centers
    pub async fn get_centers(&self) -> AdminResult<Value> {
        self.get(Endpoint::Centers).await
    }

    /// GET /admin/specialties
    pub async fn get_specialties(&self) -> AdminResult<Value> {
        self.get(Endpoint::Specialties).await
    }

    /// Issue one authenticated GET and return the decoded body unchanged
    async fn get(&self, endpoint: Endpoint) -> AdminResult<Value> {
        let token = self.token().await;
        let request_id = Uuid::new_v4();

        tracing::debug!(
            %request_id,
            %endpoint,
            authenticated = token.is_some(),
            "Fetching admin resource"
        );

        let request = self
            .client
            .get(endpoint.url(&self.config.base_url))
            .header("X-Request-Id", request_id.to_string());

        let bearer = token.as_deref().filter(|_| endpoint.requires_auth());
        let response = add_auth_header(request, bearer)
            .send()
            .await
            .map_err(AdminError::from_transport)?;

        match decode(response).await {
            Err(e) if e.is_unauthorized() => {
                tracing::warn!(%request_id, %endpoint, "Backend rejected session token");
                if self.config.clear_on_unauthorized {
                    self.clear_if_current(token.as_deref()).await?;
                }
                Err(e)
            }
            other => other,
        }
    }

    /// Drop the session only if it still holds the rejected token
    async fn clear_if_current(&self, rejected: Option<&str>) -> AdminResult<()> {
        let mut current = self.token.write().await;
        if rejected.is_some() && current.as_deref() == rejected {
            self.store.clear().await?;
            *current = None;
            tracing::info!("Admin session cleared after rejection");
        }
        Ok(())
    }
}

/// Decode a 2xx body as JSON, or turn the response into an [`AdminError`]
async fn decode(response: Response) -> AdminResult<Value> {
    let status = response.status();
    if status.is_success() {
        Ok(response.json().await?)
    } else {
        let text = response.text().await.unwrap_or_default();
        Err(AdminError::from_response(status.as_u16(), &text))
    }
}
