use mbimport_bridge::BridgeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    /// The product has no characteristic carrying the type marker, so its
    /// category is unknown. Never retried.
    #[error("product type not found at '{0}'")]
    ProductTypeNotFound(String),

    /// The catalog stores the SKU as a numeric external id.
    #[error("product '{product}' has non-numeric sku '{sku}'")]
    InvalidSku { product: String, sku: String },

    /// A sync, fetch or upload failed after its retries were exhausted.
    #[error("bridge error: {0}")]
    Bridge(#[from] BridgeError),
}

impl ImportError {
    /// `true` for failures detected before any network call; redelivering
    /// the same record cannot succeed.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            ImportError::ProductTypeNotFound(_) | ImportError::InvalidSku { .. }
        )
    }
}
