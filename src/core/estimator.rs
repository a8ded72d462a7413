use crate::core::pricing;
use crate::core::{PriceLookup, Quote, TripRequest};
use crate::utils::error::{EstimatorError, InvalidTripInput, Result};
use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const LOOKUP_FAILURE_SENTINEL: Decimal = dec!(-1);

/// Largest base fare the rules accept. Keeps every rate product and the
/// passenger sum far from `Decimal`'s overflow range.
pub const MAX_BASE_FARE: Decimal = dec!(1000000000);

/// Prices trip requests against a base fare obtained from `L`.
///
/// Holds no mutable state; concurrent calls on a shared estimator are independent.
pub struct PriceEstimator<L: PriceLookup> {
    lookup: L,
}

impl<L: PriceLookup> PriceEstimator<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// Total price for the trip, reading the wall clock once.
    pub async fn estimate(&self, request: &TripRequest) -> Result<Decimal> {
        self.estimate_at(request, Utc::now()).await
    }

    pub async fn estimate_at(&self, request: &TripRequest, now: DateTime<Utc>) -> Result<Decimal> {
        Ok(self.quote_at(request, now).await?.total)
    }

    pub async fn quote(&self, request: &TripRequest) -> Result<Quote> {
        self.quote_at(request, Utc::now()).await
    }

    /// Full price breakdown at the given instant.
    ///
    /// Validation runs before the lookup; an empty passenger list short-circuits
    /// to an empty quote without touching the lookup.
    pub async fn quote_at(&self, request: &TripRequest, now: DateTime<Utc>) -> Result<Quote> {
        if request.passengers.is_empty() {
            tracing::debug!("No passengers, skipping fare lookup");
            return Ok(Quote::empty());
        }

        if let Err(reason) = validate_trip_request(request, now) {
            tracing::debug!("Rejected trip request: {}", reason);
            return Err(reason.into());
        }

        let details = &request.details;
        let base_fare = self
            .fetch_base_fare(&details.from, &details.to, details.when)
            .await?;

        let passengers: Vec<_> = request
            .passengers
            .iter()
            .map(|passenger| {
                let price = pricing::passenger_fare(base_fare, passenger, details.when, now);
                tracing::debug!(
                    "Passenger age {} priced as {:?}: {}",
                    passenger.age,
                    price.kind,
                    price.amount
                );
                price
            })
            .collect();

        let subtotal: Decimal = passengers.iter().map(|p| p.amount).sum();
        let group_adjustment = pricing::group_adjustment(base_fare, &request.passengers);
        let total = subtotal + group_adjustment;

        tracing::info!(
            "Estimated {} -> {} for {} passenger(s): {} (base fare {}, group adjustment {})",
            details.from,
            details.to,
            passengers.len(),
            total,
            base_fare,
            group_adjustment
        );

        Ok(Quote {
            base_fare,
            passengers,
            group_adjustment,
            total,
        })
    }

    async fn fetch_base_fare(&self, from: &str, to: &str, when: DateTime<Utc>) -> Result<Decimal> {
        tracing::debug!("Looking up base fare for {} -> {} at {}", from, to, when);

        match self.lookup.base_fare(from, to, when).await {
            Ok(Some(price)) if price == LOOKUP_FAILURE_SENTINEL => {
                tracing::warn!("Fare lookup returned the failure sentinel");
                Err(EstimatorError::lookup_failed("service returned the failure sentinel"))
            }
            Ok(Some(price)) if price < Decimal::ZERO => {
                tracing::warn!("Fare lookup returned a negative price: {}", price);
                Err(EstimatorError::lookup_failed(format!("negative price {}", price)))
            }
            Ok(Some(price)) if price > MAX_BASE_FARE => {
                tracing::warn!("Fare lookup returned an out-of-range price: {}", price);
                Err(EstimatorError::lookup_failed(format!(
                    "price {} exceeds the maximum base fare {}",
                    price, MAX_BASE_FARE
                )))
            }
            Ok(Some(price)) => Ok(price),
            Ok(None) => {
                tracing::warn!("Fare lookup returned no price");
                Err(EstimatorError::lookup_failed("no price returned"))
            }
            Err(e) => {
                tracing::warn!("Fare lookup failed: {}", e);
                Err(EstimatorError::lookup_failed(e.to_string()))
            }
        }
    }
}

/// Checks run in a fixed order: ages, origin, destination, date.
fn validate_trip_request(
    request: &TripRequest,
    now: DateTime<Utc>,
) -> std::result::Result<(), InvalidTripInput> {
    if request.passengers.iter().any(|p| p.age.is_nan() || p.age < 0.0) {
        return Err(InvalidTripInput::Age);
    }

    if request.details.from.trim().is_empty() {
        return Err(InvalidTripInput::StartCity);
    }

    if request.details.to.trim().is_empty() {
        return Err(InvalidTripInput::DestinationCity);
    }

    if request.details.when < start_of_day(now) {
        return Err(InvalidTripInput::Date);
    }

    Ok(())
}

fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}
