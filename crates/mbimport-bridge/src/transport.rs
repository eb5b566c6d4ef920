//! Single-attempt HTTP primitives shared by the accessor, the entity client
//! and the image fetcher.

use std::time::Duration;

use reqwest::multipart::Form;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::BridgeError;

/// Fixed Markets Bridge paths, relative to the configured base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Token,
    TokenRefresh,
    Categories,
    Brands,
    Characteristics,
    CharacteristicValues,
    Products,
    ProductImages,
}

impl Endpoint {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Token => "api/token/",
            Endpoint::TokenRefresh => "api/token/refresh/",
            Endpoint::Categories => "api/v1/provider/categories/",
            Endpoint::Brands => "api/v1/provider/brands/",
            Endpoint::Characteristics => "api/v1/provider/characteristics/",
            Endpoint::CharacteristicValues => "api/v1/provider/characteristic_values/",
            Endpoint::Products => "api/v1/provider/products/",
            Endpoint::ProductImages => "api/v1/provider/product_images/",
        }
    }
}

/// Thin wrapper over one `reqwest::Client` exposing the verbs the importer
/// uses. Every method performs exactly one request; retry is applied by the
/// caller through [`crate::RetryPolicy`].
///
/// Cloning is cheap and shares the connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    /// Creates a transport rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`BridgeError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, BridgeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so joins append to the base path instead
        // of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| BridgeError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(BridgeError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "URL cannot be used as a base".to_owned(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL of `endpoint` under the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidBaseUrl`] if the join fails.
    pub fn endpoint_url(&self, endpoint: Endpoint) -> Result<Url, BridgeError> {
        self.base_url
            .join(endpoint.path())
            .map_err(|e| BridgeError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    /// Plain GET of an absolute URL.
    pub(crate) async fn get(&self, url: &str) -> Result<Response, BridgeError> {
        let response = self.client.get(url).send().await?;
        check_status(response)
    }

    /// POSTs `body` as JSON, with a bearer token when one is given.
    pub(crate) async fn post_json<B>(
        &self,
        endpoint: Endpoint,
        bearer: Option<&str>,
        body: &B,
    ) -> Result<Response, BridgeError>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.client.post(self.endpoint_url(endpoint)?).json(body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        check_status(request.send().await?)
    }

    /// POSTs a multipart form with a bearer token.
    pub(crate) async fn post_multipart(
        &self,
        endpoint: Endpoint,
        bearer: &str,
        form: Form,
    ) -> Result<Response, BridgeError> {
        let response = self
            .client
            .post(self.endpoint_url(endpoint)?)
            .bearer_auth(bearer)
            .multipart(form)
            .send()
            .await?;
        check_status(response)
    }
}

/// Maps 401 to [`BridgeError::Unauthorized`] and every other non-2xx status
/// to [`BridgeError::UnexpectedStatus`].
fn check_status(response: Response) -> Result<Response, BridgeError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(BridgeError::Unauthorized {
            url: response.url().to_string(),
        });
    }
    if !status.is_success() {
        if status.is_server_error() {
            tracing::debug!(status = status.as_u16(), url = %response.url(), "bridge server error");
        }
        return Err(BridgeError::UnexpectedStatus {
            status: status.as_u16(),
            url: response.url().to_string(),
        });
    }
    Ok(response)
}

/// Reads the body as text and deserializes it, tagging failures with `context`.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    context: &str,
) -> Result<T, BridgeError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| BridgeError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}
