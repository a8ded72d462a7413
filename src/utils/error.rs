use thiserror::Error;

/// Reasons a trip request is rejected before any fare lookup.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidTripInput {
    #[error("Age is invalid")]
    Age,
    #[error("Start city is invalid")]
    StartCity,
    #[error("Destination city is invalid")]
    DestinationCity,
    #[error("Date is invalid")]
    Date,
}

#[derive(Error, Debug)]
pub enum EstimatorError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidTripInput),

    #[error("Price lookup failed: {reason}")]
    PriceLookupFailed { reason: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl EstimatorError {
    pub fn lookup_failed(reason: impl Into<String>) -> Self {
        EstimatorError::PriceLookupFailed {
            reason: reason.into(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EstimatorError::InvalidInput(InvalidTripInput::Age) => {
                "Passenger ages must be zero or greater"
            }
            EstimatorError::InvalidInput(InvalidTripInput::StartCity)
            | EstimatorError::InvalidInput(InvalidTripInput::DestinationCity) => {
                "Provide non-empty origin and destination cities"
            }
            EstimatorError::InvalidInput(InvalidTripInput::Date) => {
                "Departure must be today or later"
            }
            EstimatorError::PriceLookupFailed { .. } | EstimatorError::ApiError(_) => {
                "Check the pricing service endpoint or pass --base-fare to price offline"
            }
            EstimatorError::IoError(_) => "Check that the file exists and is readable",
            EstimatorError::SerializationError(_) => "Check the trip request JSON format",
            EstimatorError::ConfigError { .. }
            | EstimatorError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line arguments"
            }
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            EstimatorError::InvalidInput(_) => 2,
            EstimatorError::PriceLookupFailed { .. } | EstimatorError::ApiError(_) => 3,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, EstimatorError>;
