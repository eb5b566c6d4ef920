//! Access/refresh token lifecycle for the Markets Bridge API.
//!
//! The access token is obtained lazily on first use and then cached for the
//! life of the process. It is never checked for expiry: staleness is only
//! discovered when a caller gets a 401 and asks for [`Accessor::refresh`].

use tokio::sync::Mutex;

use crate::error::BridgeError;
use crate::retry::{is_connection_failure, RetryPolicy};
use crate::transport::{read_json, Endpoint, HttpTransport};
use crate::types::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse};

/// Static login credentials.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    #[must_use]
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
            .field("password", &"[redacted]")
            .finish()
    }
}

#[derive(Clone)]
struct TokenPair {
    access: String,
    refresh: String,
}

/// Owns the cached token pair.
///
/// Refreshes are single-flight: they run under the token lock, and a caller
/// whose rejected token has already been replaced gets the replacement
/// without another exchange. Concurrent 401s thus cost one refresh.
pub struct Accessor {
    transport: HttpTransport,
    credentials: Credentials,
    policy: RetryPolicy,
    tokens: Mutex<Option<TokenPair>>,
}

impl Accessor {
    #[must_use]
    pub fn new(transport: HttpTransport, credentials: Credentials, policy: RetryPolicy) -> Self {
        Self {
            transport,
            credentials,
            policy,
            tokens: Mutex::new(None),
        }
    }

    /// Returns the cached access token, logging in first if there is none.
    ///
    /// # Errors
    ///
    /// Propagates any login failure. Only connection-level failures are retried.
    pub async fn access_token(&self) -> Result<String, BridgeError> {
        let mut tokens = self.tokens.lock().await;
        if let Some(pair) = tokens.as_ref() {
            return Ok(pair.access.clone());
        }
        let pair = self.login().await?;
        let access = pair.access.clone();
        *tokens = Some(pair);
        Ok(access)
    }

    /// Replaces `rejected_access` with a fresh access token and returns it.
    ///
    /// If the refresh token itself is rejected (401), logs in again and
    /// repeats the refresh exchange once with the new refresh token. A second
    /// rejection is returned to the caller.
    ///
    /// # Errors
    ///
    /// Returns the login or refresh failure unchanged.
    pub async fn refresh(&self, rejected_access: &str) -> Result<String, BridgeError> {
        let mut tokens = self.tokens.lock().await;

        let Some(pair) = tokens.as_mut() else {
            let pair = self.login().await?;
            let access = pair.access.clone();
            *tokens = Some(pair);
            return Ok(access);
        };

        if pair.access != rejected_access {
            tracing::debug!("access token already refreshed by a concurrent caller");
            return Ok(pair.access.clone());
        }

        let first_attempt = self.exchange_refresh(&pair.refresh).await;
        let refreshed = match first_attempt {
            Ok(refreshed) => refreshed,
            Err(BridgeError::Unauthorized { .. }) => {
                tracing::info!("refresh token rejected, logging in again");
                let fresh = self.login().await?;
                *pair = fresh;
                self.exchange_refresh(&pair.refresh).await?
            }
            Err(err) => return Err(err),
        };

        pair.access = refreshed.access;
        if let Some(rotated) = refreshed.refresh {
            pair.refresh = rotated;
        }
        tracing::debug!("access token refreshed");
        Ok(pair.access.clone())
    }

    async fn login(&self) -> Result<TokenPair, BridgeError> {
        tracing::debug!(username = %self.credentials.username, "logging in to markets bridge");
        let body = &LoginRequest {
            username: &self.credentials.username,
            password: &self.credentials.password,
        };
        let tokens: LoginResponse = self
            .policy
            .run(is_connection_failure, || async move {
                let response = self
                    .transport
                    .post_json(Endpoint::Token, None, body)
                    .await?;
                read_json(response, "token response").await
            })
            .await?;
        Ok(TokenPair {
            access: tokens.access,
            refresh: tokens.refresh,
        })
    }

    async fn exchange_refresh(&self, refresh: &str) -> Result<RefreshResponse, BridgeError> {
        let body = &RefreshRequest { refresh };
        self.policy
            .run(is_connection_failure, || async move {
                let response = self
                    .transport
                    .post_json(Endpoint::TokenRefresh, None, body)
                    .await?;
                read_json(response, "token refresh response").await
            })
            .await
    }
}
