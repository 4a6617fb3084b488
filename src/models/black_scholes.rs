//! Black-Scholes-Merton Model
//!
//! Provides:
//! - European option pricing with continuous dividend yield
//! - First-order Greeks (delta, gamma, theta, vega, rho)
//! - Second-order Greeks (vanna, volga, charm, veta, speed, color)
//!
//! Argument order everywhere is `(spot, strike, time, rate, vol, div)`.
//! Time-based Greeks (theta aside) are derivatives with respect to time to
//! expiry `T`; theta is `-dV/dT`, per year.
//!
//! Degenerate inputs never produce NaN or infinity. Prices at `T <= 0` or
//! `vol <= 0` take the intrinsic shortcut; Greeks clamp `T` and `vol` to
//! [`MIN_TIME`] and [`MIN_VOL`] instead.

use std::f64::consts::{PI, SQRT_2};

use statrs::function::erf::erfc;

use crate::core::{FirstOrderGreeks, FullGreeks, OptionType, PricingError, PricingResult, SecondOrderGreeks};

/// Smallest time to expiry used when evaluating Greeks
pub const MIN_TIME: f64 = 1e-10;
/// Smallest volatility used when evaluating Greeks
pub const MIN_VOL: f64 = 1e-10;

/// Standard normal CDF
pub fn norm_cdf(x: f64) -> f64 {
    // erfc keeps full relative precision in the lower tail
    0.5 * erfc(-x / SQRT_2)
}

/// Standard normal PDF
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Black-Scholes d1 parameter, with `time` and `vol` clamped as for Greeks
pub fn d1(spot: f64, strike: f64, time: f64, rate: f64, vol: f64, div: f64) -> PricingResult<f64> {
    Ok(BlackScholes::new(spot, strike, time, rate, vol, div)?.d1())
}

/// Black-Scholes d2 parameter, with `time` and `vol` clamped as for Greeks
pub fn d2(spot: f64, strike: f64, time: f64, rate: f64, vol: f64, div: f64) -> PricingResult<f64> {
    Ok(BlackScholes::new(spot, strike, time, rate, vol, div)?.d2())
}

fn raw_d1(spot: f64, strike: f64, time: f64, rate: f64, vol: f64, div: f64) -> f64 {
    ((spot / strike).ln() + (rate - div + 0.5 * vol * vol) * time) / (vol * time.sqrt())
}

fn check_domain(spot: f64, strike: f64) -> PricingResult<()> {
    if !(spot > 0.0 && spot.is_finite()) {
        return Err(PricingError::invalid_input("spot", spot));
    }
    if !(strike > 0.0 && strike.is_finite()) {
        return Err(PricingError::invalid_input("strike", strike));
    }
    Ok(())
}

/// Map NaN to zero and saturate infinities
fn finite(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(f64::MIN, f64::MAX)
    }
}

/// Black-Scholes European option price
pub fn price(
    spot: f64,
    strike: f64,
    time: f64,
    rate: f64,
    vol: f64,
    div: f64,
    option_type: OptionType,
) -> PricingResult<f64> {
    check_domain(spot, strike)?;

    if !(time > 0.0) {
        return Ok(option_type.intrinsic(spot, strike));
    }

    if !(vol > 0.0) {
        // Zero vol = intrinsic value of the discounted forward
        let pv_spot = spot * (-div * time).exp();
        let pv_strike = strike * (-rate * time).exp();
        return Ok(finite(option_type.intrinsic(pv_spot, pv_strike)));
    }

    Ok(BlackScholes::evaluate(spot, strike, time, rate, vol, div).price(option_type))
}

pub fn call_price(spot: f64, strike: f64, time: f64, rate: f64, vol: f64, div: f64) -> PricingResult<f64> {
    price(spot, strike, time, rate, vol, div, OptionType::Call)
}

pub fn put_price(spot: f64, strike: f64, time: f64, rate: f64, vol: f64, div: f64) -> PricingResult<f64> {
    price(spot, strike, time, rate, vol, div, OptionType::Put)
}

/// Intermediate terms shared by every closed-form Greek at one point.
///
/// `time` and `vol` are stored after clamping, so every method is finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackScholes {
    spot: f64,
    strike: f64,
    time: f64,
    rate: f64,
    vol: f64,
    div: f64,
    sqrt_t: f64,
    d1: f64,
    d2: f64,
    pdf_d1: f64,
    /// e^(-rT)
    df: f64,
    /// e^(-qT)
    div_factor: f64,
}

impl BlackScholes {
    pub fn new(spot: f64, strike: f64, time: f64, rate: f64, vol: f64, div: f64) -> PricingResult<Self> {
        check_domain(spot, strike)?;
        Ok(Self::evaluate(spot, strike, time, rate, vol, div))
    }

    fn evaluate(spot: f64, strike: f64, time: f64, rate: f64, vol: f64, div: f64) -> Self {
        let time = time.max(MIN_TIME);
        let vol = vol.max(MIN_VOL);
        let sqrt_t = time.sqrt();
        let d1 = finite(raw_d1(spot, strike, time, rate, vol, div));
        let d2 = finite(d1 - vol * sqrt_t);

        Self {
            spot,
            strike,
            time,
            rate,
            vol,
            div,
            sqrt_t,
            d1,
            d2,
            pdf_d1: norm_pdf(d1),
            df: (-rate * time).exp(),
            div_factor: (-div * time).exp(),
        }
    }

    pub fn d1(&self) -> f64 {
        self.d1
    }

    pub fn d2(&self) -> f64 {
        self.d2
    }

    pub fn price(&self, option_type: OptionType) -> f64 {
        let spot_pv = self.spot * self.div_factor;
        let strike_pv = self.strike * self.df;
        let value = match option_type {
            OptionType::Call => spot_pv * norm_cdf(self.d1) - strike_pv * norm_cdf(self.d2),
            OptionType::Put => strike_pv * norm_cdf(-self.d2) - spot_pv * norm_cdf(-self.d1),
        };
        // Cancellation can leave a tiny negative value deep out of the money
        finite(value.max(0.0))
    }

    pub fn delta(&self, option_type: OptionType) -> f64 {
        let delta = match option_type {
            OptionType::Call => self.div_factor * norm_cdf(self.d1),
            OptionType::Put => -self.div_factor * norm_cdf(-self.d1),
        };
        finite(delta)
    }

    /// Same for call and put
    pub fn gamma(&self) -> f64 {
        finite(self.div_factor * self.pdf_d1 / (self.spot * self.vol * self.sqrt_t))
    }

    /// Per year
    pub fn theta(&self, option_type: OptionType) -> f64 {
        let decay = -self.spot * self.div_factor * self.pdf_d1 * self.vol / (2.0 * self.sqrt_t);
        let carry = match option_type {
            OptionType::Call => {
                self.div * self.spot * self.div_factor * norm_cdf(self.d1)
                    - self.rate * self.strike * self.df * norm_cdf(self.d2)
            }
            OptionType::Put => {
                -self.div * self.spot * self.div_factor * norm_cdf(-self.d1)
                    + self.rate * self.strike * self.df * norm_cdf(-self.d2)
            }
        };
        finite(decay + carry)
    }

    /// Same for call and put, per unit of volatility
    pub fn vega(&self) -> f64 {
        finite(self.spot * self.div_factor * self.pdf_d1 * self.sqrt_t)
    }

    /// Per unit of rate
    pub fn rho(&self, option_type: OptionType) -> f64 {
        let rho = match option_type {
            OptionType::Call => self.strike * self.time * self.df * norm_cdf(self.d2),
            OptionType::Put => -self.strike * self.time * self.df * norm_cdf(-self.d2),
        };
        finite(rho)
    }

    /// d(delta)/d(vol) = d(vega)/d(spot)
    pub fn vanna(&self) -> f64 {
        finite(-self.div_factor * self.pdf_d1 * self.d2 / self.vol)
    }

    /// d(vega)/d(vol)
    pub fn volga(&self) -> f64 {
        finite(self.vega() * self.d1 * self.d2 / self.vol)
    }

    /// d(delta)/dT. The put differs from the call by the derivative of e^(-qT).
    pub fn charm(&self, option_type: OptionType) -> f64 {
        let common = self.div_factor * self.pdf_d1 * self.d1_time_slope();
        let carry = match option_type {
            OptionType::Call => -self.div * self.div_factor * norm_cdf(self.d1),
            OptionType::Put => self.div * self.div_factor * norm_cdf(-self.d1),
        };
        finite(common + carry)
    }

    /// d(vega)/dT. Vega is kind-independent at every T, so veta is too.
    pub fn veta(&self) -> f64 {
        let bracket = self.div + (self.rate - self.div) * self.d1 / (self.vol * self.sqrt_t)
            - (1.0 + self.d1 * self.d2) / (2.0 * self.time);
        finite(-self.spot * self.div_factor * self.pdf_d1 * self.sqrt_t * bracket)
    }

    /// d(gamma)/d(spot)
    pub fn speed(&self) -> f64 {
        finite(-(self.gamma() / self.spot) * (1.0 + self.d1 / (self.vol * self.sqrt_t)))
    }

    /// d(gamma)/dT
    pub fn color(&self) -> f64 {
        let bracket = 2.0 * self.div * self.time + 1.0 + 2.0 * self.time * self.d1 * self.d1_time_slope();
        finite(-self.gamma() / (2.0 * self.time) * bracket)
    }

    /// dd1/dT = (2(r-q)T - d2·σ√T) / (2Tσ√T)
    fn d1_time_slope(&self) -> f64 {
        let vol_sqrt_t = self.vol * self.sqrt_t;
        (2.0 * (self.rate - self.div) * self.time - self.d2 * vol_sqrt_t) / (2.0 * self.time * vol_sqrt_t)
    }

    pub fn first_order(&self, option_type: OptionType, iv: f64) -> FirstOrderGreeks {
        FirstOrderGreeks {
            delta: self.delta(option_type),
            gamma: self.gamma(),
            theta: self.theta(option_type),
            vega: self.vega(),
            rho: self.rho(option_type),
            iv,
        }
    }

    pub fn second_order(&self, option_type: OptionType) -> SecondOrderGreeks {
        SecondOrderGreeks {
            vanna: self.vanna(),
            volga: self.volga(),
            charm: self.charm(option_type),
            veta: self.veta(),
            speed: self.speed(),
            color: self.color(),
        }
    }
}

macro_rules! kind_greek {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        pub fn $name(
            spot: f64,
            strike: f64,
            time: f64,
            rate: f64,
            vol: f64,
            div: f64,
            option_type: OptionType,
        ) -> PricingResult<f64> {
            Ok(BlackScholes::new(spot, strike, time, rate, vol, div)?.$name(option_type))
        }
    };
}

macro_rules! symmetric_greek {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        pub fn $name(spot: f64, strike: f64, time: f64, rate: f64, vol: f64, div: f64) -> PricingResult<f64> {
            Ok(BlackScholes::new(spot, strike, time, rate, vol, div)?.$name())
        }
    };
}

kind_greek!(
    /// dV/dS
    delta
);
kind_greek!(
    /// -dV/dT per year
    theta
);
kind_greek!(
    /// dV/dr
    rho
);
kind_greek!(
    /// d(delta)/dT
    charm
);
symmetric_greek!(
    /// d²V/dS²
    gamma
);
symmetric_greek!(
    /// dV/dσ
    vega
);
symmetric_greek!(
    /// d(delta)/dσ
    vanna
);
symmetric_greek!(
    /// d(vega)/dσ
    volga
);
symmetric_greek!(
    /// d(vega)/dT
    veta
);
symmetric_greek!(
    /// d(gamma)/dS
    speed
);
symmetric_greek!(
    /// d(gamma)/dT
    color
);

/// All eleven Greeks at one point; `iv` records the input volatility
pub fn greeks(
    spot: f64,
    strike: f64,
    time: f64,
    rate: f64,
    vol: f64,
    div: f64,
    option_type: OptionType,
) -> PricingResult<FullGreeks> {
    let bs = BlackScholes::new(spot, strike, time, rate, vol, div)?;
    Ok(FullGreeks::new(bs.first_order(option_type, vol), bs.second_order(option_type)))
}
