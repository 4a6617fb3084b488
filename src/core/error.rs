//! Error types for the pricing engine

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    /// A kernel input outside the supported domain (spot or strike not > 0).
    #[error("Invalid input: {param} must be positive and finite, got {value}")]
    InvalidInput { param: &'static str, value: f64 },

    /// No implied volatility supplied for a leg.
    #[error("Missing volatility for leg {leg}")]
    MissingVolatility { leg: String },

    #[error("Invalid position: {0}")]
    InvalidPosition(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type PricingResult<T> = Result<T, PricingError>;

impl PricingError {
    pub fn invalid_input(param: &'static str, value: f64) -> Self {
        Self::InvalidInput { param, value }
    }

    pub fn missing_volatility(leg: impl Into<String>) -> Self {
        Self::MissingVolatility { leg: leg.into() }
    }

    pub fn invalid_position(msg: impl Into<String>) -> Self {
        Self::InvalidPosition(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
