//! Payoff and P&L
//!
//! Expiration payoff, theoretical P&L before expiry, and P&L surfaces over
//! price × time. P&L is per position: each leg contributes
//! `signed_quantity × multiplier × (value − open_price)`.

use ndarray::Array2;
use rayon::prelude::*;

use super::{dte_to_years, resolve_legs, ResolvedLeg};
use crate::config::EngineConfig;
use crate::core::{IvMap, Position, PricingResult};
use crate::models;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayoffCalculator {
    risk_free_rate: f64,
    dividend_yield: f64,
}

impl Default for PayoffCalculator {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl PayoffCalculator {
    pub fn new(risk_free_rate: f64, dividend_yield: f64) -> Self {
        Self {
            risk_free_rate,
            dividend_yield,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.risk_free_rate, config.dividend_yield)
    }

    /// P&L at expiration for each price, in input order
    pub fn expiration_payoff(&self, position: &Position, prices: &[f64]) -> Vec<f64> {
        prices
            .iter()
            .map(|&spot| {
                position
                    .legs()
                    .iter()
                    .map(|leg| {
                        let intrinsic = leg
                            .contract
                            .option_type
                            .intrinsic(spot, leg.contract.strike_f64());
                        leg.scale() * (intrinsic - leg.open_price_f64())
                    })
                    .sum()
            })
            .collect()
    }

    /// Black-Scholes P&L for each price with `dte` calendar days remaining.
    /// Converges to [`expiration_payoff`](Self::expiration_payoff) as `dte → 0`.
    pub fn theoretical_pnl(
        &self,
        position: &Position,
        prices: &[f64],
        ivs: &IvMap,
        dte: f64,
    ) -> PricingResult<Vec<f64>> {
        let legs = resolve_legs(position, ivs)?;
        self.pnl_row(&legs, prices, dte)
    }

    /// P&L grid indexed `[dte_index, price_index]`
    pub fn pnl_surface(
        &self,
        position: &Position,
        prices: &[f64],
        ivs: &IvMap,
        dte_range: &[f64],
    ) -> PricingResult<Array2<f64>> {
        let legs = resolve_legs(position, ivs)?;
        tracing::debug!(
            position = position.id(),
            legs = legs.len(),
            rows = dte_range.len(),
            cols = prices.len(),
            "pnl surface"
        );

        let rows = dte_range
            .par_iter()
            .map(|&dte| self.pnl_row(&legs, prices, dte))
            .collect::<PricingResult<Vec<_>>>()?;

        Ok(Array2::from_shape_fn((dte_range.len(), prices.len()), |(i, j)| {
            rows[i][j]
        }))
    }

    fn pnl_row(&self, legs: &[ResolvedLeg<'_>], prices: &[f64], dte: f64) -> PricingResult<Vec<f64>> {
        let time = dte_to_years(dte);
        prices
            .iter()
            .map(|&spot| -> PricingResult<f64> {
                let mut total = 0.0;
                for leg in legs {
                    let value = models::price(
                        spot,
                        leg.strike,
                        time,
                        self.risk_free_rate,
                        leg.vol,
                        self.dividend_yield,
                        leg.option_type,
                    )?;
                    total += leg.scale * (value - leg.open_price);
                }
                Ok(total)
            })
            .collect()
    }
}
