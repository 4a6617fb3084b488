//! Engine configuration
//!
//! The engine reads two scalars: the risk-free rate and the continuous
//! dividend yield. Both can still be overridden per call.

use serde::{Deserialize, Serialize};

use crate::core::{PricingError, PricingResult};

/// Rate and yield defaults shared by the calculators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Annualized, continuously compounded
    /// Default: 0.05
    pub risk_free_rate: f64,

    /// Continuous dividend yield
    /// Default: 0.0
    pub dividend_yield: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.05,
            dividend_yield: 0.0,
        }
    }
}

impl EngineConfig {
    pub fn new(risk_free_rate: f64, dividend_yield: f64) -> PricingResult<Self> {
        let config = Self {
            risk_free_rate,
            dividend_yield,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_rate(mut self, risk_free_rate: f64) -> Self {
        self.risk_free_rate = risk_free_rate;
        self
    }

    pub fn with_dividend_yield(mut self, dividend_yield: f64) -> Self {
        self.dividend_yield = dividend_yield;
        self
    }

    /// Parse a JSON object such as `{"risk_free_rate": 0.04}`; missing keys
    /// take their defaults.
    pub fn from_json_str(json: &str) -> PricingResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| PricingError::invalid_config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PricingResult<()> {
        if !self.risk_free_rate.is_finite() {
            return Err(PricingError::invalid_config(format!(
                "risk_free_rate must be finite, got {}",
                self.risk_free_rate
            )));
        }
        if !self.dividend_yield.is_finite() {
            return Err(PricingError::invalid_config(format!(
                "dividend_yield must be finite, got {}",
                self.dividend_yield
            )));
        }
        Ok(())
    }
}
