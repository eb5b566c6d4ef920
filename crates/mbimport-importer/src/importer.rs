use std::sync::Arc;

use futures::future::try_join_all;
use mbimport_bridge::{CatalogSink, ImagePayload, ImageSource};
use mbimport_core::{Product, DEFAULT_PRODUCT_TYPE_MARKER};

use crate::error::ImportError;
use crate::plan::ImportPlan;

/// Result of importing one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOutcome {
    pub product_id: i64,
    /// `false` when the product already existed; images are skipped then.
    pub created: bool,
    pub images_uploaded: usize,
}

/// Pushes product records into the catalog in dependency order.
///
/// Category then brand go out one after the other. Characteristic names go
/// out as one concurrent batch, then every characteristic value as a second
/// batch, then the product. Images are fetched and uploaded only for newly
/// created products. Any failure aborts the remaining steps; entities already
/// written stay written.
pub struct ProductImporter {
    sink: Arc<dyn CatalogSink>,
    images: Arc<dyn ImageSource>,
    marketplace_id: i64,
    type_marker: String,
}

impl ProductImporter {
    #[must_use]
    pub fn new(
        sink: Arc<dyn CatalogSink>,
        images: Arc<dyn ImageSource>,
        marketplace_id: i64,
    ) -> Self {
        Self {
            sink,
            images,
            marketplace_id,
            type_marker: DEFAULT_PRODUCT_TYPE_MARKER.to_owned(),
        }
    }

    /// Overrides the characteristic name that carries the product category.
    #[must_use]
    pub fn with_type_marker(mut self, marker: impl Into<String>) -> Self {
        self.type_marker = marker.into();
        self
    }

    #[must_use]
    pub fn marketplace_id(&self) -> i64 {
        self.marketplace_id
    }

    /// Validates `product` without touching the network.
    ///
    /// # Errors
    ///
    /// See [`ImportPlan::from_product`].
    pub fn plan(&self, product: Product) -> Result<ImportPlan, ImportError> {
        ImportPlan::from_product(product, &self.type_marker)
    }

    /// Imports one product record.
    ///
    /// # Errors
    ///
    /// - [`ImportError::ProductTypeNotFound`] or [`ImportError::InvalidSku`]
    ///   before any call is made.
    /// - [`ImportError::Bridge`] from the first failing sync, fetch or
    ///   upload.
    #[tracing::instrument(skip_all, fields(sku = %product.sku, product = %product.name))]
    pub async fn send(&self, product: Product) -> Result<ImportOutcome, ImportError> {
        tracing::debug!("product received");
        let plan = self.plan(product)?;
        let marketplace_id = self.marketplace_id;

        self.sink
            .send_category(&plan.category_payload(marketplace_id))
            .await?;
        self.sink
            .send_brand(&plan.brand_payload(marketplace_id))
            .await?;

        let characteristics = plan.characteristic_payloads(marketplace_id);
        try_join_all(
            characteristics
                .iter()
                .map(|payload| self.sink.send_characteristic(payload)),
        )
        .await?;

        let values = plan.characteristic_value_payloads(marketplace_id);
        try_join_all(
            values
                .iter()
                .map(|payload| self.sink.send_characteristic_value(payload)),
        )
        .await?;
        tracing::debug!(
            characteristics = characteristics.len(),
            values = values.len(),
            "characteristics synced"
        );

        let product = self
            .sink
            .send_product(&plan.product_payload(marketplace_id))
            .await?;

        if !product.created {
            tracing::info!(product_id = product.id, "product already exists; images skipped");
            return Ok(ImportOutcome {
                product_id: product.id,
                created: false,
                images_uploaded: 0,
            });
        }

        let bodies = try_join_all(
            plan.images
                .iter()
                .map(|url| self.images.fetch(url.as_str())),
        )
        .await?;
        let uploads: Vec<ImagePayload> = bodies
            .into_iter()
            .map(|body| ImagePayload {
                body,
                product_id: product.id,
            })
            .collect();
        try_join_all(uploads.iter().map(|image| self.sink.send_image(image))).await?;

        tracing::info!(
            product_id = product.id,
            images = uploads.len(),
            "product created"
        );
        Ok(ImportOutcome {
            product_id: product.id,
            created: true,
            images_uploaded: uploads.len(),
        })
    }
}
