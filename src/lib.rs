pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;
pub use config::EstimatorConfig;

pub use adapters::{FixedPriceLookup, HttpPriceLookup};
pub use core::{estimator::PriceEstimator, PriceLookup};
pub use domain::model::{
    DiscountCard, DiscountCards, FareKind, Passenger, PassengerPrice, Quote, TripDetails,
    TripRequest,
};
pub use utils::error::{EstimatorError, InvalidTripInput, Result};
