//! Entity sync client for the Markets Bridge provider API.

mod upload;

use std::future::Future;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::Serialize;

use crate::accessor::{Accessor, Credentials};
use crate::error::BridgeError;
use crate::retry::{is_transient, RetryPolicy};
use crate::sink::CatalogSink;
use crate::transport::{read_json, Endpoint, HttpTransport};
use crate::types::{
    BrandPayload, CategoryPayload, CharacteristicPayload, CharacteristicValuePayload, IdResponse,
    ImagePayload, ProductPayload, Upserted,
};

/// Upserts taxonomy entities, products and images over HTTP.
///
/// Every call carries a bearer token from the [`Accessor`]. Transient
/// failures (network errors, non-2xx other than 401) are retried under the
/// configured [`RetryPolicy`]. A 401 triggers one token refresh and one
/// replay of the call, outside the transient budget; a second 401 is
/// returned as [`BridgeError::Unauthorized`].
pub struct MarketsBridgeClient {
    transport: HttpTransport,
    accessor: Accessor,
    policy: RetryPolicy,
}

impl MarketsBridgeClient {
    #[must_use]
    pub fn new(transport: HttpTransport, credentials: Credentials, policy: RetryPolicy) -> Self {
        let accessor = Accessor::new(transport.clone(), credentials, policy);
        Self {
            transport,
            accessor,
            policy,
        }
    }

    #[must_use]
    pub fn accessor(&self) -> &Accessor {
        &self.accessor
    }

    async fn send_entity<B>(&self, endpoint: Endpoint, body: &B) -> Result<Upserted, BridgeError>
    where
        B: Serialize + Sync,
    {
        self.authorized(|token| async move {
            let response = self
                .transport
                .post_json(endpoint, Some(&token), body)
                .await?;
            read_upserted(response, endpoint).await
        })
        .await
    }

    /// Runs `call` with the current access token under the transient retry
    /// policy, refreshing the token and replaying at most once on a 401.
    async fn authorized<T, F, Fut>(&self, mut call: F) -> Result<T, BridgeError>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<T, BridgeError>>,
    {
        let token = self.accessor.access_token().await?;
        let first = self.policy.run(is_transient, || call(token.clone())).await;

        match first {
            Err(BridgeError::Unauthorized { url }) => {
                tracing::debug!(%url, "access token rejected, refreshing and replaying once");
                let token = self.accessor.refresh(&token).await?;
                self.policy.run(is_transient, || call(token.clone())).await
            }
            other => other,
        }
    }
}

/// `201 Created` means this call persisted the entity; any other 2xx means
/// an existing entity with the same natural key was returned.
async fn read_upserted(response: Response, endpoint: Endpoint) -> Result<Upserted, BridgeError> {
    let created = response.status() == StatusCode::CREATED;
    let body: IdResponse = read_json(response, endpoint.path()).await?;
    Ok(Upserted {
        id: body.id,
        created,
    })
}

#[async_trait]
impl CatalogSink for MarketsBridgeClient {
    async fn send_category(&self, category: &CategoryPayload) -> Result<Upserted, BridgeError> {
        let upserted = self.send_entity(Endpoint::Categories, category).await?;
        tracing::debug!(
            name = %category.name,
            id = upserted.id,
            created = upserted.created,
            "category sent"
        );
        Ok(upserted)
    }

    async fn send_brand(&self, brand: &BrandPayload) -> Result<Upserted, BridgeError> {
        let upserted = self.send_entity(Endpoint::Brands, brand).await?;
        tracing::debug!(
            name = %brand.name,
            id = upserted.id,
            created = upserted.created,
            "brand sent"
        );
        Ok(upserted)
    }

    async fn send_characteristic(
        &self,
        characteristic: &CharacteristicPayload,
    ) -> Result<Upserted, BridgeError> {
        let upserted = self
            .send_entity(Endpoint::Characteristics, characteristic)
            .await?;
        tracing::debug!(
            name = %characteristic.name,
            id = upserted.id,
            created = upserted.created,
            "characteristic sent"
        );
        Ok(upserted)
    }

    async fn send_characteristic_value(
        &self,
        value: &CharacteristicValuePayload,
    ) -> Result<Upserted, BridgeError> {
        let upserted = self
            .send_entity(Endpoint::CharacteristicValues, value)
            .await?;
        tracing::debug!(
            value = %value.value,
            characteristic = %value.characteristic_name,
            id = upserted.id,
            created = upserted.created,
            "characteristic value sent"
        );
        Ok(upserted)
    }

    async fn send_product(&self, product: &ProductPayload) -> Result<Upserted, BridgeError> {
        let upserted = self.send_entity(Endpoint::Products, product).await?;
        tracing::debug!(
            name = %product.name,
            id = upserted.id,
            created = upserted.created,
            "product sent"
        );
        Ok(upserted)
    }

    async fn send_image(&self, image: &ImagePayload) -> Result<Upserted, BridgeError> {
        self.upload_image(image).await
    }
}
