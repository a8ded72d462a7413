use crate::config::toml_config::EstimatorConfig;
use crate::domain::model::{DiscountCard, DiscountCards, Passenger, TripDetails, TripRequest};
use crate::utils::error::{EstimatorError, Result};
use crate::utils::validation::{self, Validate};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::Parser;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Parser)]
#[command(name = "train-estimator")]
#[command(about = "Estimate a train ticket price for a group of passengers")]
pub struct CliArgs {
    /// Departure city
    #[arg(long)]
    pub from: Option<String>,

    /// Destination city
    #[arg(long)]
    pub to: Option<String>,

    /// Departure time, RFC 3339 or YYYY-MM-DD (midnight UTC)
    #[arg(long, value_parser = parse_departure)]
    pub when: Option<DateTime<Utc>>,

    /// Passenger as AGE[:CARD,CARD...][:LAST_NAME], repeatable
    #[arg(long = "passenger", short = 'p', value_parser = parse_passenger)]
    pub passengers: Vec<Passenger>,

    /// JSON file holding a full trip request
    #[arg(long, conflicts_with_all = ["from", "to", "when", "passengers"])]
    pub request: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the pricing service endpoint
    #[arg(long)]
    pub api_endpoint: Option<String>,

    /// Override the pricing service timeout
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Price against this base fare instead of calling the pricing service
    #[arg(long)]
    pub base_fare: Option<Decimal>,

    /// Print the per-passenger breakdown
    #[arg(long)]
    pub breakdown: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}

impl CliArgs {
    /// 載入配置檔 (若有) 並套用命令列覆蓋設定
    pub fn resolve_config(&self) -> Result<EstimatorConfig> {
        let mut config = match &self.config {
            Some(path) => EstimatorConfig::from_file(path)?,
            None => EstimatorConfig::default(),
        };

        if let Some(endpoint) = &self.api_endpoint {
            config.api.endpoint = endpoint.clone();
        }

        if let Some(timeout) = self.timeout_seconds {
            config.api.timeout_seconds = timeout;
        }

        if self.json_logs {
            config.logging.json = Some(true);
        }

        Ok(config)
    }

    pub fn trip_request(&self) -> Result<TripRequest> {
        if let Some(path) = &self.request {
            let content = std::fs::read_to_string(path)?;
            return Ok(serde_json::from_str(&content)?);
        }

        let from = required("--from", &self.from)?;
        let to = required("--to", &self.to)?;
        let when = required("--when", &self.when)?;

        Ok(TripRequest::new(
            TripDetails::new(from.clone(), to.clone(), *when),
            self.passengers.clone(),
        ))
    }
}

impl Validate for CliArgs {
    fn validate(&self) -> Result<()> {
        if let Some(endpoint) = &self.api_endpoint {
            validation::validate_url("--api-endpoint", endpoint)?;
        }

        if let Some(timeout) = self.timeout_seconds {
            validation::validate_positive_number("--timeout-seconds", timeout, 1)?;
        }

        if let Some(path) = &self.request {
            validation::validate_non_empty_string("--request", path)?;
        }

        Ok(())
    }
}

fn required<'a, T>(flag: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| EstimatorError::ConfigError {
        message: format!("missing {} (or pass --request <file>)", flag),
    })
}

pub fn parse_departure(value: &str) -> std::result::Result<DateTime<Utc>, String> {
    if let Ok(date_time) = DateTime::parse_from_rfc3339(value) {
        return Ok(date_time.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| format!("'{}' is neither RFC 3339 nor YYYY-MM-DD", value))
}

pub fn parse_passenger(value: &str) -> std::result::Result<Passenger, String> {
    let mut parts = value.splitn(3, ':');

    let age = parts
        .next()
        .unwrap_or_default()
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid age in '{}': {}", value, e))?;

    let discounts = match parts.next() {
        Some(cards) => cards
            .split(',')
            .map(str::trim)
            .filter(|card| !card.is_empty())
            .map(|card| card.parse::<DiscountCard>().map_err(|e| e.to_string()))
            .collect::<std::result::Result<DiscountCards, String>>()?,
        None => DiscountCards::empty(),
    };

    let passenger = Passenger::new(age, discounts);
    Ok(match parts.next().map(str::trim) {
        Some(last_name) if !last_name.is_empty() => passenger.with_last_name(last_name),
        _ => passenger,
    })
}
