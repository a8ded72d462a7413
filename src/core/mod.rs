pub mod estimator;
pub mod pricing;

pub use crate::domain::model::{Passenger, PassengerPrice, Quote, TripDetails, TripRequest};
pub use crate::domain::ports::{ConfigProvider, PriceLookup};
pub use crate::utils::error::Result;
