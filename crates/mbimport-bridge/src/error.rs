use thiserror::Error;

/// Errors returned by the Markets Bridge client, the token accessor and the
/// image fetcher.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Network, timeout or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 401. Handled by the reactive re-authentication path, never by the
    /// transient retry budget.
    #[error("unauthorized response from {url}")]
    Unauthorized { url: String },

    /// Any other non-2xx response.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
