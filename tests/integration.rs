//! Integration tests for end-to-end position scenarios.
//!
//! Each test builds a realistic position through the public API and checks
//! payoff shape, P&L convergence and Greek aggregation together.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use bsm_risk::prelude::*;
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 16).unwrap()
}

fn engine() -> Engine {
    Engine::default().with_valuation_date(today())
}

fn contract(kind: OptionType, strike: Decimal, days: i64) -> OptionContract {
    OptionContract::listed("XYZ", kind, strike, today() + Duration::days(days))
}

fn flat_ivs(position: &Position, vol: f64) -> IvMap {
    position
        .legs()
        .iter()
        .map(|l| (l.id().to_string(), vol))
        .collect()
}

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| start + (end - start) * i as f64 / (n - 1) as f64)
        .collect()
}

#[test]
fn long_call_expiration_profile() {
    let position = Position::builder("lc", "XYZ")
        .leg(Leg::long(contract(OptionType::Call, dec!(100), 30), 1, dec!(5)))
        .build()
        .unwrap();
    let payoff = engine().payoff.expiration_payoff(&position, &[80.0, 100.0, 105.0, 120.0]);
    assert_eq!(payoff, vec![-500.0, -500.0, 0.0, 1500.0]);
    assert_eq!(position.net_debit_credit(), dec!(500));
}

#[test]
fn bull_call_spread_is_capped_both_ways() {
    let position = Position::builder("bcs", "XYZ")
        .leg(Leg::long(contract(OptionType::Call, dec!(100), 30), 1, dec!(5)))
        .leg(Leg::short(contract(OptionType::Call, dec!(110), 30), 1, dec!(2)))
        .build()
        .unwrap();
    let prices = linspace(60.0, 160.0, 101);
    let payoff = engine().payoff.expiration_payoff(&position, &prices);

    for (s, pnl) in prices.iter().zip(&payoff) {
        if *s <= 100.0 {
            assert_abs_diff_eq!(*pnl, -300.0, epsilon = 1e-9);
        } else if *s >= 110.0 {
            assert_abs_diff_eq!(*pnl, 700.0, epsilon = 1e-9);
        }
    }
    assert_eq!(position.net_debit_credit(), dec!(300));
}

#[test]
fn long_butterfly_peaks_at_body() {
    let position = Position::builder("fly", "XYZ")
        .leg(Leg::long(contract(OptionType::Call, dec!(100), 30), 1, dec!(12)))
        .leg(Leg::short(contract(OptionType::Call, dec!(110), 30), 2, dec!(6)))
        .leg(Leg::long(contract(OptionType::Call, dec!(120), 30), 1, dec!(2)))
        .build()
        .unwrap();
    let prices = linspace(90.0, 130.0, 41);
    let payoff = engine().payoff.expiration_payoff(&position, &prices);

    let (peak_idx, peak) = payoff
        .iter()
        .enumerate()
        .fold((0, f64::MIN), |acc, (i, &v)| if v > acc.1 { (i, v) } else { acc });
    assert_eq!(prices[peak_idx], 110.0);
    // Width 10 less a 2.00 debit, times 100
    assert_abs_diff_eq!(peak, 800.0, epsilon = 1e-9);
    assert_abs_diff_eq!(payoff[0], -200.0, epsilon = 1e-9);
    assert_abs_diff_eq!(payoff[40], -200.0, epsilon = 1e-9);
}

#[test]
fn theoretical_pnl_converges_as_expiry_nears() {
    let position = Position::builder("strangle", "XYZ")
        .leg(Leg::short(contract(OptionType::Put, dec!(95), 30), 1, dec!(1.5)))
        .leg(Leg::short(contract(OptionType::Call, dec!(105), 30), 1, dec!(1.5)))
        .build()
        .unwrap();
    let ivs = flat_ivs(&position, 0.3);
    let prices = linspace(80.0, 120.0, 17);
    let e = engine();
    let expiry = e.payoff.expiration_payoff(&position, &prices);

    let mut prev_err = f64::INFINITY;
    for dte in [30.0, 7.0, 1.0, 0.01] {
        let theo = e.payoff.theoretical_pnl(&position, &prices, &ivs, dte).unwrap();
        let err = theo
            .iter()
            .zip(&expiry)
            .map(|(t, x)| (t - x).abs())
            .fold(0.0, f64::max);
        assert!(err <= prev_err + 1e-9, "error grew from {} to {} at {} DTE", prev_err, err, dte);
        prev_err = err;
    }
    assert!(prev_err < 10.0);
}

#[test]
fn pnl_surface_rows_follow_dte_order() {
    let position = Position::builder("lc", "XYZ")
        .leg(Leg::long(contract(OptionType::Call, dec!(100), 60), 1, dec!(4)))
        .build()
        .unwrap();
    let ivs = flat_ivs(&position, 0.2);
    let prices = [90.0, 100.0, 110.0];
    let surface = engine()
        .payoff
        .pnl_surface(&position, &prices, &ivs, &[60.0, 30.0, 1.0])
        .unwrap();

    assert_eq!(surface.dim(), (3, 3));
    // Long premium decays at the money
    assert!(surface[[0, 1]] > surface[[1, 1]]);
    assert!(surface[[1, 1]] > surface[[2, 1]]);
}

#[test]
fn aggregated_greeks_are_linear_in_legs() {
    let e = engine();
    let call = contract(OptionType::Call, dec!(100), 45);
    let put = contract(OptionType::Put, dec!(95), 45);

    let combined = Position::builder("combo", "XYZ")
        .leg(Leg::long(call.clone(), 3, dec!(4)))
        .leg(Leg::short(put.clone(), 2, dec!(2)))
        .build()
        .unwrap();
    let calls_only = Position::builder("calls", "XYZ")
        .leg(Leg::long(call, 1, dec!(4)))
        .build()
        .unwrap();
    let puts_only = Position::builder("puts", "XYZ")
        .leg(Leg::long(put, 1, dec!(2)))
        .build()
        .unwrap();

    let ivs = flat_ivs(&combined, 0.22);
    let g = e.analyzer.position_greeks(&combined, 98.0, &ivs).unwrap().aggregated;
    let c = e.analyzer.position_greeks(&calls_only, 98.0, &ivs).unwrap().aggregated;
    let p = e.analyzer.position_greeks(&puts_only, 98.0, &ivs).unwrap().aggregated;

    for name in GreekName::ALL {
        let expected = 3.0 * c.get(name) - 2.0 * p.get(name);
        assert_relative_eq!(g.get(name), expected, max_relative = 1e-10, epsilon = 1e-12);
    }
}

#[test]
fn per_leg_greeks_sum_to_aggregate() {
    let position = Position::builder("ratio", "XYZ")
        .leg(Leg::long(contract(OptionType::Call, dec!(100), 20), 1, dec!(3)))
        .leg(Leg::short(contract(OptionType::Call, dec!(105), 20), 2, dec!(1.2)))
        .leg(Leg::long(contract(OptionType::Put, dec!(90), 50), 1, dec!(0.8)))
        .build()
        .unwrap();
    let mut ivs = flat_ivs(&position, 0.25);
    ivs.insert(position.legs()[2].id().to_string(), 0.31);

    let result = engine().analyzer.position_greeks(&position, 101.0, &ivs).unwrap();
    assert_eq!(result.per_leg.len(), 3);
    for name in GreekName::ALL {
        let sum: f64 = result.per_leg.iter().map(|l| l.contribution.get(name)).sum();
        assert_relative_eq!(result.aggregated.get(name), sum, max_relative = 1e-12, epsilon = 1e-12);
    }
    assert_relative_eq!(result.aggregated.first_order.iv, (0.25 + 0.25 + 0.31) / 3.0);
    for (leg, greeks) in position.legs().iter().zip(&result.per_leg) {
        assert_eq!(greeks.leg_id, leg.id());
        assert_eq!(greeks.contribution, greeks.greeks.scale(leg.scale()));
    }
}

#[test]
fn greek_profiles_cover_every_name() {
    let position = Position::builder("straddle", "XYZ")
        .leg(Leg::long(contract(OptionType::Call, dec!(100), 30), 1, dec!(4)))
        .leg(Leg::long(contract(OptionType::Put, dec!(100), 30), 1, dec!(4)))
        .build()
        .unwrap();
    let ivs = flat_ivs(&position, 0.2);
    let prices = linspace(85.0, 115.0, 7);
    let dtes = [30.0, 10.0];
    let e = engine();

    let by_price = e.analyzer.greeks_vs_price(&position, &prices, &ivs).unwrap();
    let by_time = e.analyzer.greeks_vs_time(&position, 100.0, &ivs, &dtes).unwrap();
    let surfaces = e.analyzer.greeks_surface(&position, &prices, &ivs, &dtes).unwrap();

    for name in GreekName::ALL {
        assert_eq!(by_price.get(name).len(), 7);
        assert_eq!(by_time.get(name).len(), 2);
        assert_eq!(surfaces.get(name).dim(), (2, 7));
        assert!(surfaces.get(name).iter().all(|v| v.is_finite()));
    }
    // Straddle: long gamma and vega everywhere
    assert!(by_price.gamma.iter().all(|&g| g > 0.0));
    assert!(surfaces.vega.iter().all(|&v| v > 0.0));
    // 30 DTE row equals the price profile measured from the valuation date
    for j in 0..7 {
        assert_relative_eq!(surfaces.delta[[0, j]], by_price.delta[j], max_relative = 1e-12, epsilon = 1e-12);
    }
}

#[test]
fn expired_position_has_finite_greeks() {
    let position = Position::builder("old", "XYZ")
        .leg(Leg::long(contract(OptionType::Call, dec!(100), -3), 1, dec!(5)))
        .leg(Leg::short(contract(OptionType::Put, dec!(100), 0), 1, dec!(5)))
        .build()
        .unwrap();
    let ivs = flat_ivs(&position, 0.0);
    let result = engine().analyzer.position_greeks(&position, 100.0, &ivs).unwrap();
    assert!(result.aggregated.is_finite());
    for leg in &result.per_leg {
        assert!(leg.greeks.is_finite());
    }
}

#[test]
fn missing_volatility_is_reported_by_leg() {
    let position = Position::builder("bcs", "XYZ")
        .leg(Leg::long(contract(OptionType::Call, dec!(100), 30), 1, dec!(5)))
        .leg(Leg::short(contract(OptionType::Call, dec!(110), 30), 1, dec!(2)))
        .build()
        .unwrap();
    let ivs: IvMap = [(position.legs()[0].id().to_string(), 0.2)].into();
    let err = engine().payoff.theoretical_pnl(&position, &[100.0], &ivs, 10.0).unwrap_err();
    assert_eq!(err, PricingError::MissingVolatility { leg: "XYZ   241016C00110000".to_string() });
}

#[test]
fn invalid_positions_are_rejected() {
    let other = OptionContract::listed("ABC", OptionType::Call, dec!(100), today());
    assert!(matches!(
        Position::builder("mixed", "XYZ")
            .leg(Leg::long(contract(OptionType::Call, dec!(100), 30), 1, dec!(5)))
            .leg(Leg::long(other, 1, dec!(5)))
            .build(),
        Err(PricingError::InvalidPosition(_))
    ));
    assert!(matches!(
        Position::builder("empty-qty", "XYZ")
            .leg(Leg::long(contract(OptionType::Call, dec!(100), 30), 0, dec!(5)))
            .build(),
        Err(PricingError::InvalidPosition(_))
    ));
}
