use crate::domain::ports::PriceLookup;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Answers every lookup with the same fare. Used for offline pricing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPriceLookup {
    price: Option<Decimal>,
}

impl FixedPriceLookup {
    pub fn new(price: Decimal) -> Self {
        Self { price: Some(price) }
    }

    pub fn unavailable() -> Self {
        Self { price: None }
    }
}

#[async_trait]
impl PriceLookup for FixedPriceLookup {
    async fn base_fare(
        &self,
        from: &str,
        to: &str,
        _when: DateTime<Utc>,
    ) -> Result<Option<Decimal>> {
        tracing::debug!("Using fixed fare {:?} for {} -> {}", self.price, from, to);
        Ok(self.price)
    }
}
