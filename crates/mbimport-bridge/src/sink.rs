use async_trait::async_trait;

use crate::error::BridgeError;
use crate::types::{
    BrandPayload, CategoryPayload, CharacteristicPayload, CharacteristicValuePayload,
    ImagePayload, ProductPayload, Upserted,
};

/// Idempotent upserts against the downstream catalog, keyed by each
/// entity's natural key.
#[async_trait]
pub trait CatalogSink: Send + Sync {
    async fn send_category(&self, category: &CategoryPayload) -> Result<Upserted, BridgeError>;

    async fn send_brand(&self, brand: &BrandPayload) -> Result<Upserted, BridgeError>;

    async fn send_characteristic(
        &self,
        characteristic: &CharacteristicPayload,
    ) -> Result<Upserted, BridgeError>;

    async fn send_characteristic_value(
        &self,
        value: &CharacteristicValuePayload,
    ) -> Result<Upserted, BridgeError>;

    async fn send_product(&self, product: &ProductPayload) -> Result<Upserted, BridgeError>;

    /// Uploads one image for a product that this importer just created.
    async fn send_image(&self, image: &ImagePayload) -> Result<Upserted, BridgeError>;
}

/// Retrieves raw image bytes by URL.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, BridgeError>;
}
