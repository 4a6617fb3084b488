//! Position Greeks
//!
//! Aggregates per-leg Greeks into position totals and evaluates them across
//! price and time grids. A leg contributes its single-contract Greeks scaled
//! by `signed_quantity × multiplier`; legs are summed in declaration order.

use chrono::{NaiveDate, Utc};
use ndarray::Array2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{dte_to_years, resolve_legs, GreeksCalculator, ResolvedLeg};
use crate::core::{FullGreeks, GreekSet, IvMap, LegGreeks, Position, PositionGreeks, PricingResult};

/// One ordered curve per Greek
pub type GreekCurves = GreekSet<Vec<f64>>;

/// One `[dte_index, price_index]` grid per Greek
pub type GreekSurfaces = GreekSet<Array2<f64>>;

/// Position delta across prices at one DTE
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaCurve {
    pub dte: f64,
    /// e.g. `"30 DTE"`
    pub label: String,
    pub delta: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct PositionAnalyzer {
    greeks: GreeksCalculator,
    /// Date leg time-to-expiry is measured from; today (UTC) when unset
    valuation_date: Option<NaiveDate>,
}

impl PositionAnalyzer {
    pub fn new(greeks: GreeksCalculator) -> Self {
        Self {
            greeks,
            valuation_date: None,
        }
    }

    /// Measure time to expiry from a fixed date instead of today
    pub fn with_valuation_date(mut self, date: NaiveDate) -> Self {
        self.valuation_date = Some(date);
        self
    }

    pub fn greeks_calculator(&self) -> &GreeksCalculator {
        &self.greeks
    }

    pub fn valuation_date(&self) -> NaiveDate {
        self.valuation_date.unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Per-leg and aggregated Greeks at `spot`, each leg at its own time remaining
    pub fn position_greeks(&self, position: &Position, spot: f64, ivs: &IvMap) -> PricingResult<PositionGreeks> {
        let legs = resolve_legs(position, ivs)?;
        let as_of = self.valuation_date();

        let mut per_leg = Vec::with_capacity(legs.len());
        let mut aggregated = FullGreeks::default();
        for leg in &legs {
            let time = leg.leg.contract.time_to_expiry(as_of);
            let greeks = self.leg_greeks(leg, spot, time)?;
            let contribution = greeks.scale(leg.scale);
            aggregated = aggregated.add(&contribution);
            per_leg.push(LegGreeks {
                leg_id: leg.leg.id().to_string(),
                greeks,
                contribution,
            });
        }
        aggregated.first_order.iv = mean_vol(&legs);

        Ok(PositionGreeks { per_leg, aggregated })
    }

    /// Aggregated Greeks at each price, legs at their own time remaining
    pub fn greeks_vs_price(&self, position: &Position, prices: &[f64], ivs: &IvMap) -> PricingResult<GreekCurves> {
        let legs = resolve_legs(position, ivs)?;
        let as_of = self.valuation_date();
        let times: Vec<f64> = legs
            .iter()
            .map(|l| l.leg.contract.time_to_expiry(as_of))
            .collect();

        let points = prices
            .iter()
            .map(|&spot| self.aggregate(&legs, spot, |i| times[i]))
            .collect::<PricingResult<Vec<_>>>()?;
        Ok(curves(&points))
    }

    /// Aggregated Greeks at `spot` for each DTE (calendar days), all legs
    /// evaluated at the same time remaining
    pub fn greeks_vs_time(
        &self,
        position: &Position,
        spot: f64,
        ivs: &IvMap,
        dte_range: &[f64],
    ) -> PricingResult<GreekCurves> {
        let legs = resolve_legs(position, ivs)?;
        let points = dte_range
            .iter()
            .map(|&dte| {
                let time = dte_to_years(dte);
                self.aggregate(&legs, spot, |_| time)
            })
            .collect::<PricingResult<Vec<_>>>()?;
        Ok(curves(&points))
    }

    /// Aggregated Greeks over the `[dte_index, price_index]` grid
    pub fn greeks_surface(
        &self,
        position: &Position,
        prices: &[f64],
        ivs: &IvMap,
        dte_range: &[f64],
    ) -> PricingResult<GreekSurfaces> {
        let legs = resolve_legs(position, ivs)?;
        let (rows, cols) = (dte_range.len(), prices.len());
        tracing::debug!(position = position.id(), legs = legs.len(), rows, cols, "greeks surface");

        // Flat row-major arena, one cell per (dte, price)
        let cells = (0..rows * cols)
            .into_par_iter()
            .map(|idx| {
                let time = dte_to_years(dte_range[idx / cols]);
                self.aggregate(&legs, prices[idx % cols], |_| time)
            })
            .collect::<PricingResult<Vec<_>>>()?;

        Ok(GreekSet::from_fn(|name| {
            Array2::from_shape_fn((rows, cols), |(i, j)| cells[i * cols + j].get(name))
        }))
    }

    /// Aggregated delta across prices for each DTE, in `dtes` order
    pub fn delta_vs_price_at_dtes(
        &self,
        position: &Position,
        prices: &[f64],
        ivs: &IvMap,
        dtes: &[f64],
    ) -> PricingResult<Vec<DeltaCurve>> {
        let legs = resolve_legs(position, ivs)?;
        dtes.iter()
            .map(|&dte| -> PricingResult<DeltaCurve> {
                let time = dte_to_years(dte);
                let delta = prices
                    .iter()
                    .map(|&spot| self.aggregate(&legs, spot, |_| time).map(|g| g.first_order.delta))
                    .collect::<PricingResult<Vec<_>>>()?;
                Ok(DeltaCurve {
                    dte,
                    label: format!("{} DTE", dte),
                    delta,
                })
            })
            .collect()
    }

    fn leg_greeks(&self, leg: &ResolvedLeg<'_>, spot: f64, time: f64) -> PricingResult<FullGreeks> {
        self.greeks
            .full(spot, leg.strike, time, leg.vol, leg.option_type, None, None)
    }

    /// Scaled sum over legs; `time_of(i)` gives leg `i`'s time to expiry
    fn aggregate(
        &self,
        legs: &[ResolvedLeg<'_>],
        spot: f64,
        time_of: impl Fn(usize) -> f64,
    ) -> PricingResult<FullGreeks> {
        let mut total = FullGreeks::default();
        for (i, leg) in legs.iter().enumerate() {
            let greeks = self.leg_greeks(leg, spot, time_of(i))?;
            total = total.add(&greeks.scale(leg.scale));
        }
        total.first_order.iv = mean_vol(legs);
        Ok(total)
    }
}

fn mean_vol(legs: &[ResolvedLeg<'_>]) -> f64 {
    if legs.is_empty() {
        return 0.0;
    }
    legs.iter().map(|l| l.vol).sum::<f64>() / legs.len() as f64
}

fn curves(points: &[FullGreeks]) -> GreekCurves {
    GreekSet::from_fn(|name| points.iter().map(|g| g.get(name)).collect())
}
