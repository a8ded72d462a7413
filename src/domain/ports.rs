use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Source of the undiscounted fare for a journey.
///
/// `Ok(None)` means the service answered but had no usable price; transport
/// failures are reported as `Err`.
#[async_trait]
pub trait PriceLookup: Send + Sync {
    async fn base_fare(&self, from: &str, to: &str, when: DateTime<Utc>)
        -> Result<Option<Decimal>>;
}

#[async_trait]
impl<L: PriceLookup + ?Sized> PriceLookup for std::sync::Arc<L> {
    async fn base_fare(
        &self,
        from: &str,
        to: &str,
        when: DateTime<Utc>,
    ) -> Result<Option<Decimal>> {
        (**self).base_fare(from, to, when).await
    }
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
}
