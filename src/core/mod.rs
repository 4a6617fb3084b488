//! Core data types for the pricing engine
//!
//! Defines fundamental types:
//! - OptionContract, Leg, Position: the instruments being analyzed
//! - FullGreeks, PositionGreeks: computed sensitivities
//! - PricingError: the error taxonomy

pub mod error;
pub mod greeks;
pub mod option;

pub use error::*;
pub use greeks::*;
pub use option::*;
