use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

/// Name of the characteristic whose value designates a product's category.
pub const DEFAULT_PRODUCT_TYPE_MARKER: &str = "Тип";

/// A product record as delivered by the upstream parser, one per message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Marketplace SKU. The catalog API stores it as a numeric external id.
    pub sku: String,
    pub name: String,
    /// Brand name, synchronized as a taxonomy entity before the product.
    pub brand: String,
    pub description: String,
    /// Ordered name/value pairs. Names may repeat.
    pub characteristics: Vec<Characteristic>,
    /// Absolute http(s) image URLs, fetched only when the product is newly
    /// created.
    #[serde(default, deserialize_with = "http_urls")]
    pub images: Vec<Url>,
    /// Canonical storefront URL.
    #[serde(deserialize_with = "http_url")]
    pub url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Characteristic {
    pub name: String,
    pub value: String,
}

impl Characteristic {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Accepts only absolute `http`/`https` URLs with a host.
fn ensure_http(url: Url) -> Result<Url, String> {
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        _ => Err(format!("expected an http(s) url, got '{url}'")),
    }
}

fn http_url<'de, D>(deserializer: D) -> Result<Url, D::Error>
where
    D: Deserializer<'de>,
{
    ensure_http(Url::deserialize(deserializer)?).map_err(D::Error::custom)
}

fn http_urls<'de, D>(deserializer: D) -> Result<Vec<Url>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<Url>::deserialize(deserializer)?
        .into_iter()
        .map(ensure_http)
        .collect::<Result<_, _>>()
        .map_err(D::Error::custom)
}
