//! Position-level pricing
//!
//! - [`GreeksCalculator`]: kernel Greeks with rate/yield defaults
//! - [`PayoffCalculator`]: expiration payoff and theoretical P&L grids
//! - [`PositionAnalyzer`]: aggregated Greeks and their price/time profiles
//!
//! Every grid operation validates the implied volatilities against the
//! position before evaluating any point.

pub mod greeks_calculator;
pub mod payoff;
pub mod position;

pub use greeks_calculator::*;
pub use payoff::*;
pub use position::*;

use crate::core::{IvMap, Leg, OptionType, Position, PricingResult, DAYS_PER_YEAR};

/// Convert calendar days to expiry into years
pub fn dte_to_years(dte: f64) -> f64 {
    dte / DAYS_PER_YEAR
}

/// A leg with its volatility looked up and its decimals converted
#[derive(Debug, Clone, Copy)]
pub(crate) struct ResolvedLeg<'a> {
    pub leg: &'a Leg,
    pub option_type: OptionType,
    pub strike: f64,
    pub vol: f64,
    pub scale: f64,
    pub open_price: f64,
}

/// Pair every leg with its volatility, in declaration order
pub(crate) fn resolve_legs<'a>(position: &'a Position, ivs: &IvMap) -> PricingResult<Vec<ResolvedLeg<'a>>> {
    let vols = position.resolve_ivs(ivs)?;
    Ok(position
        .legs()
        .iter()
        .zip(vols)
        .map(|(leg, vol)| {
            let resolved = ResolvedLeg {
                leg,
                option_type: leg.contract.option_type,
                strike: leg.contract.strike_f64(),
                vol,
                scale: leg.scale(),
                open_price: leg.open_price_f64(),
            };
            tracing::trace!(
                leg = leg.id(),
                strike = resolved.strike,
                vol,
                scale = resolved.scale,
                "resolved leg"
            );
            resolved
        })
        .collect())
}
