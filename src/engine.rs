//! Engine wiring
//!
//! Builds the three calculators from one [`EngineConfig`] so they share the
//! same rate and yield defaults.

use chrono::NaiveDate;

use crate::config::EngineConfig;
use crate::core::PricingResult;
use crate::pricing::{GreeksCalculator, PayoffCalculator, PositionAnalyzer};

#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    pub greeks: GreeksCalculator,
    pub payoff: PayoffCalculator,
    pub analyzer: PositionAnalyzer,
}

impl Default for Engine {
    fn default() -> Self {
        Self::from_valid(EngineConfig::default())
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> PricingResult<Self> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    /// Parse and validate a JSON config, then build the engine
    pub fn from_json_str(json: &str) -> PricingResult<Self> {
        EngineConfig::from_json_str(json).map(Self::from_valid)
    }

    fn from_valid(config: EngineConfig) -> Self {
        let greeks = GreeksCalculator::from_config(&config);
        tracing::debug!(
            risk_free_rate = config.risk_free_rate,
            dividend_yield = config.dividend_yield,
            "engine configured"
        );
        Self {
            config,
            greeks,
            payoff: PayoffCalculator::from_config(&config),
            analyzer: PositionAnalyzer::new(greeks),
        }
    }

    /// Fix the analyzer's valuation date
    pub fn with_valuation_date(mut self, date: NaiveDate) -> Self {
        self.analyzer = self.analyzer.with_valuation_date(date);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
