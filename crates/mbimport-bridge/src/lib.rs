pub mod accessor;
pub mod client;
pub mod error;
pub mod fetcher;
pub mod retry;
pub mod sink;
pub mod transport;
pub mod types;

pub use accessor::{Accessor, Credentials};
pub use client::MarketsBridgeClient;
pub use error::BridgeError;
pub use fetcher::HttpImageFetcher;
pub use retry::RetryPolicy;
pub use sink::{CatalogSink, ImageSource};
pub use transport::{Endpoint, HttpTransport};
pub use types::{
    BrandPayload, CategoryPayload, CharacteristicPayload, CharacteristicValuePayload,
    ImagePayload, ProductCharacteristic, ProductPayload, Upserted,
};
