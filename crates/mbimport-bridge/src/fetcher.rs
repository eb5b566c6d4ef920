use async_trait::async_trait;

use crate::error::BridgeError;
use crate::retry::{is_transient, RetryPolicy};
use crate::sink::ImageSource;
use crate::transport::HttpTransport;

/// Downloads product images with the same retry discipline as entity sync.
///
/// A non-2xx response is a failure, so an error page is never uploaded as
/// an image.
pub struct HttpImageFetcher {
    transport: HttpTransport,
    policy: RetryPolicy,
}

impl HttpImageFetcher {
    #[must_use]
    pub fn new(transport: HttpTransport, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }
}

#[async_trait]
impl ImageSource for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, BridgeError> {
        tracing::debug!(url, "fetching image");
        let body = self
            .policy
            .run(is_transient, || async move {
                let response = self.transport.get(url).await?;
                Ok(response.bytes().await?.to_vec())
            })
            .await?;
        tracing::debug!(url, bytes = body.len(), "image fetched");
        Ok(body)
    }
}
