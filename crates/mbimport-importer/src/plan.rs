//! Pure preparation of one product record: type-marker extraction, SKU
//! parsing and construction of every outbound payload.

use std::collections::HashSet;

use mbimport_bridge::{
    BrandPayload, CategoryPayload, CharacteristicPayload, CharacteristicValuePayload,
    ProductCharacteristic, ProductPayload,
};
use mbimport_core::{Characteristic, Product, Url};

use crate::error::ImportError;

/// A product with its category extracted and its SKU validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPlan {
    /// Value of the type-marker characteristic.
    pub category: String,
    pub external_id: i64,
    pub name: String,
    pub brand: String,
    pub description: String,
    pub url: Url,
    /// Characteristics in delivery order, type marker removed.
    pub characteristics: Vec<Characteristic>,
    pub images: Vec<Url>,
}

impl ImportPlan {
    /// Extracts the category from the characteristic named `type_marker` and
    /// strips every characteristic with that name.
    ///
    /// # Errors
    ///
    /// - [`ImportError::ProductTypeNotFound`] if no characteristic is named
    ///   `type_marker`.
    /// - [`ImportError::InvalidSku`] if the SKU is not an integer.
    pub fn from_product(product: Product, type_marker: &str) -> Result<Self, ImportError> {
        let Product {
            sku,
            name,
            brand,
            description,
            characteristics,
            images,
            url,
        } = product;

        let (markers, characteristics): (Vec<Characteristic>, Vec<Characteristic>) =
            characteristics
                .into_iter()
                .partition(|c| c.name == type_marker);

        let Some(category) = markers.into_iter().next().map(|c| c.value) else {
            return Err(ImportError::ProductTypeNotFound(name));
        };

        let Ok(external_id) = sku.trim().parse::<i64>() else {
            return Err(ImportError::InvalidSku { product: name, sku });
        };

        Ok(Self {
            category,
            external_id,
            name,
            brand,
            description,
            url,
            characteristics,
            images,
        })
    }

    /// Distinct characteristic names in first-seen order.
    #[must_use]
    pub fn characteristic_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.characteristics
            .iter()
            .map(|c| c.name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    #[must_use]
    pub fn category_payload(&self, marketplace_id: i64) -> CategoryPayload {
        CategoryPayload {
            name: self.category.clone(),
            marketplace_id,
        }
    }

    #[must_use]
    pub fn brand_payload(&self, marketplace_id: i64) -> BrandPayload {
        BrandPayload {
            name: self.brand.clone(),
            marketplace_id,
        }
    }

    /// One payload per distinct name, owned by this plan's category.
    #[must_use]
    pub fn characteristic_payloads(&self, marketplace_id: i64) -> Vec<CharacteristicPayload> {
        self.characteristic_names()
            .into_iter()
            .map(|name| CharacteristicPayload {
                name: name.to_owned(),
                product_type_name: self.category.clone(),
                marketplace_id,
            })
            .collect()
    }

    /// One payload per characteristic instance, repeats included.
    #[must_use]
    pub fn characteristic_value_payloads(
        &self,
        marketplace_id: i64,
    ) -> Vec<CharacteristicValuePayload> {
        self.characteristics
            .iter()
            .map(|c| CharacteristicValuePayload {
                value: c.value.clone(),
                characteristic_name: c.name.clone(),
                marketplace_id,
            })
            .collect()
    }

    #[must_use]
    pub fn product_payload(&self, marketplace_id: i64) -> ProductPayload {
        ProductPayload {
            external_id: self.external_id,
            name: self.name.clone(),
            url: self.url.to_string(),
            category_name: self.category.clone(),
            brand_name: self.brand.clone(),
            marketplace_id,
            description: self.description.clone(),
            characteristics: self
                .characteristics
                .iter()
                .map(|c| ProductCharacteristic {
                    name: c.name.clone(),
                    value: c.value.clone(),
                })
                .collect(),
        }
    }
}
