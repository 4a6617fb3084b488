//! Example: Basic options pricing with Black-Scholes
//!
//! Run with: cargo run --example basic_pricing

use bsm_risk::prelude::*;

fn main() -> PricingResult<()> {
    // Option parameters
    let spot = 500.0;
    let strike = 505.0;
    let time = 0.25; // 3 months
    let rate = 0.05; // 5% risk-free rate
    let div = 0.01; // 1% dividend yield
    let vol = 0.20; // 20% volatility

    println!("=== Black-Scholes Pricing ===\n");
    println!("Spot:     ${:.2}", spot);
    println!("Strike:   ${:.2}", strike);
    println!("Time:     {:.2} years ({:.0} days)", time, time * 365.0);
    println!("Rate:     {:.1}%", rate * 100.0);
    println!("Div:      {:.1}%", div * 100.0);
    println!("Vol:      {:.1}%\n", vol * 100.0);

    let call_price = bs_price(spot, strike, time, rate, vol, div, OptionType::Call)?;
    println!("Call Price: ${:.4}", call_price);

    let put_price = bs_price(spot, strike, time, rate, vol, div, OptionType::Put)?;
    println!("Put Price:  ${:.4}", put_price);

    // Put-call parity: C - P = S*e^(-qT) - K*e^(-rT)
    let parity_lhs = call_price - put_price;
    let parity_rhs = spot * (-div * time).exp() - strike * (-rate * time).exp();
    println!("\nPut-Call Parity Check:");
    println!("  C - P = {:.4}", parity_lhs);
    println!("  S*e^(-qT) - K*e^(-rT) = {:.4}", parity_rhs);
    println!("  Difference: {:.2e}", (parity_lhs - parity_rhs).abs());

    for option_type in [OptionType::Call, OptionType::Put] {
        let g = bs_greeks(spot, strike, time, rate, vol, div, option_type)?;
        let (f, s) = (&g.first_order, &g.second_order);
        println!("\n=== Greeks ({:?}) ===\n", option_type);
        println!("Delta:  {:.4}", f.delta);
        println!("Gamma:  {:.6}", f.gamma);
        println!("Theta:  {:.4} (per day: {:.4})", f.theta, f.theta / 365.0);
        println!("Vega:   {:.4} (per vol point: {:.4})", f.vega, f.vega / 100.0);
        println!("Rho:    {:.4}", f.rho);
        println!("Vanna:  {:.6}", s.vanna);
        println!("Volga:  {:.4}", s.volga);
        println!("Charm:  {:.6}", s.charm);
        println!("Veta:   {:.4}", s.veta);
        println!("Speed:  {:.8}", s.speed);
        println!("Color:  {:.6}", s.color);
    }

    // Degenerate inputs stay finite
    println!("\n=== Edge Cases ===\n");
    println!(
        "Expired ITM call:   ${:.4}",
        bs_price(spot, 480.0, 0.0, rate, vol, div, OptionType::Call)?
    );
    println!(
        "Zero-vol call:      ${:.4}",
        bs_price(spot, 480.0, time, rate, 0.0, div, OptionType::Call)?
    );
    let expiring = bs_greeks(spot, spot, 0.0, rate, vol, div, OptionType::Call)?;
    println!("ATM gamma at expiry: {:.4e} (finite: {})", expiring.first_order.gamma, expiring.is_finite());

    match bs_price(-1.0, strike, time, rate, vol, div, OptionType::Call) {
        Ok(p) => println!("Unexpected price {}", p),
        Err(e) => println!("Negative spot rejected: {}", e),
    }

    Ok(())
}
