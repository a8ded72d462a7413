// Adapters layer: concrete price lookups for the estimator.

pub mod fixed;
pub mod http;

pub use fixed::FixedPriceLookup;
pub use http::HttpPriceLookup;
