use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryPayload {
    pub name: String,
    pub marketplace_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandPayload {
    pub name: String,
    pub marketplace_id: i64,
}

/// A characteristic scoped to the category (product type) that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacteristicPayload {
    pub name: String,
    pub product_type_name: String,
    pub marketplace_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacteristicValuePayload {
    pub value: String,
    pub characteristic_name: String,
    pub marketplace_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductCharacteristic {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductPayload {
    pub external_id: i64,
    pub name: String,
    pub url: String,
    pub category_name: String,
    pub brand_name: String,
    pub marketplace_id: i64,
    pub description: String,
    pub characteristics: Vec<ProductCharacteristic>,
}

/// Raw image bytes destined for an already-created product.
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub body: Vec<u8>,
    pub product_id: i64,
}

impl std::fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePayload")
            .field("body_len", &self.body.len())
            .field("product_id", &self.product_id)
            .finish()
    }
}

/// Result of an upsert: the remote identity and whether this call created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Upserted {
    pub id: i64,
    /// `true` on `201 Created`, `false` when an existing entity was returned.
    pub created: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IdResponse {
    pub id: i64,
}

#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

impl std::fmt::Debug for LoginRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

/// `refresh` is only present when the server rotates refresh tokens.
#[derive(Debug, Deserialize)]
pub(crate) struct RefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}
