//! Multipart image upload for `MarketsBridgeClient`.

use reqwest::multipart::{Form, Part};
use uuid::Uuid;

use crate::error::BridgeError;
use crate::transport::Endpoint;
use crate::types::{ImagePayload, Upserted};

use super::{read_upserted, MarketsBridgeClient};

impl MarketsBridgeClient {
    /// Uploads `image` as multipart fields `product` (owning product id) and
    /// `image` (the bytes). The object name is generated once per upload and
    /// reused if the request is retried.
    pub(super) async fn upload_image(&self, image: &ImagePayload) -> Result<Upserted, BridgeError> {
        let file_name = format!("{}.jpg", Uuid::new_v4().simple());
        tracing::debug!(
            product_id = image.product_id,
            file_name = %file_name,
            bytes = image.body.len(),
            "uploading product image"
        );

        let file_name = file_name.as_str();
        let upserted = self
            .authorized(|token| async move {
                let form = Form::new()
                    .text("product", image.product_id.to_string())
                    .part(
                        "image",
                        Part::bytes(image.body.clone()).file_name(file_name.to_owned()),
                    );
                let response = self
                    .transport
                    .post_multipart(Endpoint::ProductImages, &token, form)
                    .await?;
                read_upserted(response, Endpoint::ProductImages).await
            })
            .await?;

        tracing::debug!(
            product_id = image.product_id,
            id = upserted.id,
            "product image sent"
        );
        Ok(upserted)
    }
}
