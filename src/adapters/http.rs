use crate::domain::ports::{ConfigProvider, PriceLookup};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://sncf.com/api/train/estimate/price";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Fetches base fares from the pricing service.
///
/// `GET {endpoint}?from=..&to=..&date=..` answering `{"price": <number>}`;
/// a price of `-1` means the service has no fare for the journey.
#[derive(Debug, Clone)]
pub struct HttpPriceLookup {
    client: Client,
    endpoint: String,
}

impl HttpPriceLookup {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::with_timeout(
            config.api_endpoint(),
            Duration::from_secs(config.timeout_seconds()),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PriceLookup for HttpPriceLookup {
    async fn base_fare(
        &self,
        from: &str,
        to: &str,
        when: DateTime<Utc>,
    ) -> Result<Option<Decimal>> {
        let date = when.to_rfc3339_opts(SecondsFormat::Secs, true);

        tracing::debug!("Making API request to: {}", self.endpoint);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("from", from), ("to", to), ("date", date.as_str())])
            .send()
            .await?;

        tracing::debug!("API response status: {}", response.status());

        if !response.status().is_success() {
            tracing::warn!("Pricing service answered {}", response.status());
            return Ok(None);
        }

        let body: Value = response.json().await?;
        Ok(parse_price(&body))
    }
}

fn parse_price(body: &Value) -> Option<Decimal> {
    let number = match body.get("price")? {
        Value::Number(number) => number,
        _ => return None,
    };

    // Parse the textual form first so 19.99 stays 19.99.
    let price = number
        .to_string()
        .parse::<Decimal>()
        .ok()
        .or_else(|| number.as_f64().and_then(Decimal::from_f64))?;

    if price == Decimal::NEGATIVE_ONE {
        return None;
    }

    Some(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price(&json!({"price": 20})), Some(dec!(20)));
        assert_eq!(parse_price(&json!({"price": 19.99})), Some(dec!(19.99)));
    }

    #[test]
    fn test_parse_price_sentinel_and_missing() {
        assert_eq!(parse_price(&json!({"price": -1})), None);
        assert_eq!(parse_price(&json!({"fare": 20})), None);
        assert_eq!(parse_price(&json!({"price": "20"})), None);
        assert_eq!(parse_price(&json!([])), None);
    }

    #[test]
    fn test_from_config_uses_configured_endpoint() {
        let config = crate::config::toml_config::EstimatorConfig::from_toml_str(
            "[api]\nendpoint = \"http://localhost:9000/price\"\ntimeout_seconds = 2",
        )
        .unwrap();

        let lookup = HttpPriceLookup::from_config(&config).unwrap();
        assert_eq!(lookup.endpoint(), "http://localhost:9000/price");
    }
}
