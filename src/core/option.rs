//! Option contract, leg and position definitions
//!
//! These are read-only inputs to the engine. A [`Position`] is validated once
//! at build time and never mutated afterwards.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{PricingError, PricingResult};

/// Calendar days per year used for every DTE to year-fraction conversion.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Implied volatility per leg, keyed by the leg identifier (contract symbol).
pub type IvMap = HashMap<String, f64>;

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Intrinsic value at given spot
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }

    fn occ_code(&self) -> char {
        match self {
            OptionType::Call => 'C',
            OptionType::Put => 'P',
        }
    }
}

/// Exercise style. Recorded on the contract only; pricing is always European.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseStyle {
    European,
    American,
}

/// Long or short
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    Long,
    Short,
}

impl PositionSide {
    pub fn sign(&self) -> i64 {
        match self {
            PositionSide::Long => 1,
            PositionSide::Short => -1,
        }
    }
}

/// Option contract terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    /// Contract symbol, also the leg identifier for IV lookups
    pub symbol: String,
    /// Underlying symbol (e.g., "SPY", "AAPL")
    pub underlying: String,
    /// Option type (Call/Put)
    pub option_type: OptionType,
    /// Strike price
    pub strike: Decimal,
    /// Expiration date
    pub expiry: NaiveDate,
    /// Exercise style
    pub exercise: ExerciseStyle,
    /// Shares per contract (e.g., 100 for equity options)
    pub multiplier: u32,
}

impl OptionContract {
    /// Create a contract with an explicit symbol. Defaults to American
    /// exercise and a multiplier of 100.
    pub fn new(
        symbol: impl Into<String>,
        underlying: impl Into<String>,
        option_type: OptionType,
        strike: Decimal,
        expiry: NaiveDate,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            underlying: underlying.into(),
            option_type,
            strike,
            expiry,
            exercise: ExerciseStyle::American,
            multiplier: 100,
        }
    }

    /// Create a listed contract whose symbol is the OCC option symbol,
    /// e.g. `AAPL  240119C00150000`.
    pub fn listed(
        underlying: impl Into<String>,
        option_type: OptionType,
        strike: Decimal,
        expiry: NaiveDate,
    ) -> Self {
        let underlying = underlying.into();
        let symbol = occ_symbol(&underlying, option_type, strike, expiry);
        Self::new(symbol, underlying, option_type, strike, expiry)
    }

    pub fn with_multiplier(mut self, multiplier: u32) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn with_exercise(mut self, exercise: ExerciseStyle) -> Self {
        self.exercise = exercise;
        self
    }

    /// Strike as `f64` for the pricing kernel. NaN if unrepresentable, which
    /// the kernel rejects as invalid input.
    pub fn strike_f64(&self) -> f64 {
        self.strike.to_f64().unwrap_or(f64::NAN)
    }

    /// Time to expiry in years from given date, floored at zero
    pub fn time_to_expiry(&self, from: NaiveDate) -> f64 {
        let days = (self.expiry - from).num_days();
        (days as f64 / DAYS_PER_YEAR).max(0.0)
    }
}

/// OCC symbology: root padded to six characters, `yymmdd`, `C`/`P`, and the
/// strike times 1000 as eight digits. Strikes the eight-digit field cannot
/// hold exactly (non-positive, finer than 0.001, or 100000 and up) keep their
/// full decimal text instead, so distinct strikes always get distinct symbols.
fn occ_symbol(underlying: &str, option_type: OptionType, strike: Decimal, expiry: NaiveDate) -> String {
    let root = format!("{:<6}{}{}", underlying, expiry.format("%y%m%d"), option_type.occ_code());
    let strike = strike.normalize();
    let millis = (strike * Decimal::from(1000)).to_u64().filter(|m| *m < 100_000_000);
    match millis {
        Some(m) if strike > Decimal::ZERO && strike.scale() <= 3 => format!("{}{:08}", root, m),
        _ => format!("{}{}", root, strike),
    }
}

/// A contract held long or short in some quantity at an opening price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub contract: OptionContract,
    pub side: PositionSide,
    /// Number of contracts, always positive; the sign lives in `side`
    pub quantity: u32,
    /// Premium per share paid (long) or received (short)
    pub open_price: Decimal,
}

impl Leg {
    pub fn new(contract: OptionContract, side: PositionSide, quantity: u32, open_price: Decimal) -> Self {
        Self {
            contract,
            side,
            quantity,
            open_price,
        }
    }

    pub fn long(contract: OptionContract, quantity: u32, open_price: Decimal) -> Self {
        Self::new(contract, PositionSide::Long, quantity, open_price)
    }

    pub fn short(contract: OptionContract, quantity: u32, open_price: Decimal) -> Self {
        Self::new(contract, PositionSide::Short, quantity, open_price)
    }

    /// Leg identifier used to key implied volatilities
    pub fn id(&self) -> &str {
        &self.contract.symbol
    }

    /// +quantity if long, -quantity if short
    pub fn signed_quantity(&self) -> i64 {
        self.side.sign() * i64::from(self.quantity)
    }

    /// `signed_quantity × multiplier`, the factor applied to every per-contract value
    pub fn scale(&self) -> f64 {
        (self.signed_quantity() * i64::from(self.contract.multiplier)) as f64
    }

    pub fn open_price_f64(&self) -> f64 {
        self.open_price.to_f64().unwrap_or(f64::NAN)
    }
}

/// An immutable multi-leg position on a single underlying
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    id: String,
    name: String,
    underlying: String,
    legs: Vec<Leg>,
    opened_at: DateTime<Utc>,
}

impl Position {
    pub fn builder(id: impl Into<String>, underlying: impl Into<String>) -> PositionBuilder {
        PositionBuilder {
            id: id.into(),
            name: None,
            underlying: underlying.into(),
            legs: Vec::new(),
            opened_at: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn underlying(&self) -> &str {
        &self.underlying
    }

    /// Legs in declaration order
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Σ signed_quantity × open_price × multiplier. Positive is a net debit.
    pub fn net_debit_credit(&self) -> Decimal {
        self.legs
            .iter()
            .map(|leg| {
                Decimal::from(leg.signed_quantity())
                    * leg.open_price
                    * Decimal::from(leg.contract.multiplier)
            })
            .sum()
    }

    /// Look up every leg's volatility in declaration order, failing on the
    /// first leg without one.
    pub fn resolve_ivs(&self, ivs: &IvMap) -> PricingResult<Vec<f64>> {
        self.legs
            .iter()
            .map(|leg| {
                ivs.get(leg.id())
                    .copied()
                    .ok_or_else(|| PricingError::missing_volatility(leg.id()))
            })
            .collect()
    }
}

/// Collects legs and validates them into a [`Position`]
#[derive(Debug, Clone)]
pub struct PositionBuilder {
    id: String,
    name: Option<String>,
    underlying: String,
    legs: Vec<Leg>,
    opened_at: Option<DateTime<Utc>>,
}

impl PositionBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn opened_at(mut self, opened_at: DateTime<Utc>) -> Self {
        self.opened_at = Some(opened_at);
        self
    }

    pub fn leg(mut self, leg: Leg) -> Self {
        self.legs.push(leg);
        self
    }

    pub fn legs(mut self, legs: impl IntoIterator<Item = Leg>) -> Self {
        self.legs.extend(legs);
        self
    }

    pub fn build(self) -> PricingResult<Position> {
        let mut seen = HashSet::new();
        for leg in &self.legs {
            if leg.contract.underlying != self.underlying {
                return Err(PricingError::invalid_position(format!(
                    "leg {} is on {}, position is on {}",
                    leg.id(),
                    leg.contract.underlying,
                    self.underlying
                )));
            }
            if leg.quantity == 0 {
                return Err(PricingError::invalid_position(format!(
                    "leg {} has zero quantity",
                    leg.id()
                )));
            }
            if leg.contract.multiplier == 0 {
                return Err(PricingError::invalid_position(format!(
                    "leg {} has zero multiplier",
                    leg.id()
                )));
            }
            if !seen.insert(leg.id()) {
                return Err(PricingError::invalid_position(format!(
                    "duplicate leg {}",
                    leg.id()
                )));
            }
        }

        Ok(Position {
            name: self.name.unwrap_or_else(|| self.id.clone()),
            id: self.id,
            underlying: self.underlying,
            legs: self.legs,
            opened_at: self.opened_at.unwrap_or_else(Utc::now),
        })
    }
}
