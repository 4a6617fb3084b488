//! Pricing Models
//!
//! Implements:
//! - Black-Scholes-Merton (closed-form prices and Greeks)

pub mod black_scholes;

pub use black_scholes::*;
