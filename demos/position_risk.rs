//! Example: Risk profile of an iron condor
//!
//! Run with: RUST_LOG=bsm_risk=debug cargo run --example position_risk

use bsm_risk::prelude::*;
use chrono::{Duration, NaiveDate};
use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;

fn main() -> PricingResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let today = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap_or_default();
    let expiry = today + Duration::days(30);
    let contract = |kind, strike| OptionContract::listed("SPY", kind, strike, expiry);

    let condor = Position::builder("condor-1", "SPY")
        .name("SPY 30 DTE iron condor")
        .leg(Leg::long(contract(OptionType::Put, dec!(480)), 1, dec!(1.10)))
        .leg(Leg::short(contract(OptionType::Put, dec!(490)), 1, dec!(2.35)))
        .leg(Leg::short(contract(OptionType::Call, dec!(510)), 1, dec!(2.20)))
        .leg(Leg::long(contract(OptionType::Call, dec!(520)), 1, dec!(0.95)))
        .build()?;

    // Mild put skew
    let ivs: IvMap = condor
        .legs()
        .iter()
        .zip([0.21, 0.19, 0.16, 0.15])
        .map(|(leg, iv)| (leg.id().to_string(), iv))
        .collect();

    let engine = Engine::from_json_str(r#"{"risk_free_rate": 0.045}"#)?.with_valuation_date(today);
    let spot = 500.0;

    println!("=== {} ===\n", condor.name());
    println!("Net debit/credit: {}", condor.net_debit_credit());

    let greeks = engine.analyzer.position_greeks(&condor, spot, &ivs)?;
    println!("\nPer-leg contributions at ${:.2}:", spot);
    for leg in &greeks.per_leg {
        let c = &leg.contribution.first_order;
        println!(
            "  {}  delta {:>8.2}  gamma {:>7.3}  theta {:>9.2}  vega {:>8.2}",
            leg.leg_id, c.delta, c.gamma, c.theta, c.vega
        );
    }
    let total = &greeks.aggregated;
    println!("\nAggregated (mean iv {:.1}%):", total.first_order.iv * 100.0);
    for name in GreekName::ALL {
        println!("  {:<6} {:>12.4}", name, total.get(name));
    }

    let prices: Vec<f64> = (0..=8).map(|i| 470.0 + 7.5 * i as f64).collect();
    let expiration = engine.payoff.expiration_payoff(&condor, &prices);
    let two_weeks = engine.payoff.theoretical_pnl(&condor, &prices, &ivs, 14.0)?;

    println!("\nP&L profile:");
    println!("  {:>8} {:>12} {:>12}", "spot", "14 DTE", "expiry");
    for ((s, theo), exp) in prices.iter().zip(&two_weeks).zip(&expiration) {
        println!("  {:>8.2} {:>12.2} {:>12.2}", s, theo, exp);
    }

    let dtes = [30.0, 14.0, 7.0, 1.0];
    let surface = engine.payoff.pnl_surface(&condor, &prices, &ivs, &dtes)?;
    let max_loss = surface.iter().copied().fold(f64::INFINITY, f64::min);
    println!("\nWorst P&L on the {:?} grid: {:.2}", surface.dim(), max_loss);

    println!("\nDelta by DTE:");
    for curve in engine.analyzer.delta_vs_price_at_dtes(&condor, &prices, &ivs, &dtes)? {
        let cells: Vec<String> = curve.delta.iter().map(|d| format!("{:>7.1}", d)).collect();
        println!("  {:>8} {}", curve.label, cells.join(""));
    }

    let gamma = engine.analyzer.greeks_surface(&condor, &prices, &ivs, &dtes)?.gamma;
    println!("\nPeak short gamma: {:.4}", gamma.iter().copied().fold(0.0, f64::min));

    Ok(())
}
