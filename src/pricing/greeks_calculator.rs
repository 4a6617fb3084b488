//! Greeks with engine defaults
//!
//! Thin wrapper over the Black-Scholes kernel. Rate and dividend yield
//! resolve as: explicit argument, then the construction-time default.

use crate::config::EngineConfig;
use crate::core::{FirstOrderGreeks, FullGreeks, OptionType, PricingResult, SecondOrderGreeks};
use crate::models::BlackScholes;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreeksCalculator {
    risk_free_rate: f64,
    dividend_yield: f64,
}

impl Default for GreeksCalculator {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl GreeksCalculator {
    pub fn new(risk_free_rate: f64, dividend_yield: f64) -> Self {
        Self {
            risk_free_rate,
            dividend_yield,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.risk_free_rate, config.dividend_yield)
    }

    pub fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    pub fn dividend_yield(&self) -> f64 {
        self.dividend_yield
    }

    fn kernel(
        &self,
        spot: f64,
        strike: f64,
        time: f64,
        vol: f64,
        rate: Option<f64>,
        div: Option<f64>,
    ) -> PricingResult<BlackScholes> {
        let rate = rate.unwrap_or(self.risk_free_rate);
        let div = div.unwrap_or(self.dividend_yield);
        BlackScholes::new(spot, strike, time, rate, vol, div)
    }

    /// Delta, gamma, theta, vega, rho and the input vol
    #[allow(clippy::too_many_arguments)]
    pub fn first_order(
        &self,
        spot: f64,
        strike: f64,
        time: f64,
        vol: f64,
        option_type: OptionType,
        rate: Option<f64>,
        div: Option<f64>,
    ) -> PricingResult<FirstOrderGreeks> {
        Ok(self
            .kernel(spot, strike, time, vol, rate, div)?
            .first_order(option_type, vol))
    }

    /// Vanna, volga, charm, veta, speed, color
    #[allow(clippy::too_many_arguments)]
    pub fn second_order(
        &self,
        spot: f64,
        strike: f64,
        time: f64,
        vol: f64,
        option_type: OptionType,
        rate: Option<f64>,
        div: Option<f64>,
    ) -> PricingResult<SecondOrderGreeks> {
        Ok(self
            .kernel(spot, strike, time, vol, rate, div)?
            .second_order(option_type))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn full(
        &self,
        spot: f64,
        strike: f64,
        time: f64,
        vol: f64,
        option_type: OptionType,
        rate: Option<f64>,
        div: Option<f64>,
    ) -> PricingResult<FullGreeks> {
        let bs = self.kernel(spot, strike, time, vol, rate, div)?;
        Ok(FullGreeks::new(bs.first_order(option_type, vol), bs.second_order(option_type)))
    }
}
