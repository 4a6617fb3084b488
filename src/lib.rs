//! # BSM Risk - Black-Scholes-Merton Pricing and Position Risk
//!
//! Closed-form European option pricing, first and second order Greeks, and
//! risk aggregation for multi-leg option positions.
//!
//! ## Overview
//!
//! The engine receives already-resolved inputs (spot prices and implied
//! volatilities per leg) and returns plain numeric structures:
//! - **Pricing Kernel**: BSM price plus eleven analytical Greeks
//! - **Payoff**: expiration payoff, theoretical P&L and P&L surfaces
//! - **Position Analyzer**: aggregated Greeks and their price/time profiles
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bsm_risk::prelude::*;
//! use chrono::NaiveDate;
//! use rust_decimal::Decimal;
//!
//! let expiry = NaiveDate::from_ymd_opt(2025, 3, 21).unwrap();
//! let call = OptionContract::listed("SPY", OptionType::Call, Decimal::from(500), expiry);
//! let position = Position::builder("long-call", "SPY")
//!     .leg(Leg::long(call, 1, Decimal::from(12)))
//!     .build()
//!     .unwrap();
//!
//! let ivs: IvMap = [(position.legs()[0].id().to_string(), 0.18)].into();
//! let engine = Engine::default();
//! let greeks = engine.analyzer.position_greeks(&position, 505.0, &ivs).unwrap();
//! println!("position delta: {:.2}", greeks.aggregated.first_order.delta);
//! ```
//!
//! ## What This Engine Does NOT Do
//!
//! - Solve for implied volatility
//! - Price early exercise (American contracts are valued as European)
//! - Fetch market data or render charts

pub mod config;
pub mod core;
pub mod engine;
pub mod models;
pub mod pricing;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        ExerciseStyle, FirstOrderGreeks, FullGreeks, GreekName, GreekSet, IvMap, Leg, LegGreeks,
        OptionContract, OptionType, Position, PositionGreeks, PositionSide, PricingError,
        PricingResult, SecondOrderGreeks,
    };

    // Kernel
    pub use crate::models::{
        d1, d2, greeks as bs_greeks, norm_cdf, norm_pdf, price as bs_price, BlackScholes,
    };

    // Calculators
    pub use crate::pricing::{
        dte_to_years, DeltaCurve, GreekCurves, GreekSurfaces, GreeksCalculator, PayoffCalculator,
        PositionAnalyzer,
    };

    pub use crate::config::EngineConfig;
    pub use crate::engine::Engine;
}

// Re-export main types at crate root
pub use crate::config::EngineConfig;
pub use crate::core::{PricingError, PricingResult};
pub use crate::engine::Engine;
