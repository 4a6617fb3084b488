//! Option Greeks
//!
//! First and second order sensitivities for single contracts and positions.
//! Every Greek has a fixed field, so containers keyed by Greek name
//! ([`GreekSet`]) always carry all eleven quantities.

use std::fmt;

use serde::{Deserialize, Serialize};

/// First-order sensitivities
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FirstOrderGreeks {
    /// Delta: dV/dS
    pub delta: f64,
    /// Gamma: d²V/dS²
    pub gamma: f64,
    /// Theta: -dV/dT, per year
    pub theta: f64,
    /// Vega: dV/dσ, per unit of volatility
    pub vega: f64,
    /// Rho: dV/dr, per unit of rate
    pub rho: f64,
    /// Volatility the Greeks were evaluated at
    pub iv: f64,
}

/// Second-order sensitivities
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SecondOrderGreeks {
    /// Vanna: d²V/dSdσ
    pub vanna: f64,
    /// Volga/Vomma: d²V/dσ²
    pub volga: f64,
    /// Charm: d(delta)/dT
    pub charm: f64,
    /// Veta: d(vega)/dT
    pub veta: f64,
    /// Speed: d(gamma)/dS
    pub speed: f64,
    /// Color: d(gamma)/dT
    pub color: f64,
}

/// First and second order Greeks together
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FullGreeks {
    pub first_order: FirstOrderGreeks,
    pub second_order: SecondOrderGreeks,
}

impl FullGreeks {
    pub fn new(first_order: FirstOrderGreeks, second_order: SecondOrderGreeks) -> Self {
        Self {
            first_order,
            second_order,
        }
    }

    /// Scale every sensitivity by a factor (e.g., signed quantity × multiplier).
    /// `iv` is a level, not a sensitivity, and is left unscaled.
    pub fn scale(&self, factor: f64) -> Self {
        let f = &self.first_order;
        let s = &self.second_order;
        Self {
            first_order: FirstOrderGreeks {
                delta: f.delta * factor,
                gamma: f.gamma * factor,
                theta: f.theta * factor,
                vega: f.vega * factor,
                rho: f.rho * factor,
                iv: f.iv,
            },
            second_order: SecondOrderGreeks {
                vanna: s.vanna * factor,
                volga: s.volga * factor,
                charm: s.charm * factor,
                veta: s.veta * factor,
                speed: s.speed * factor,
                color: s.color * factor,
            },
        }
    }

    /// Add the sensitivities of `other`, keeping this value's `iv`
    pub fn add(&self, other: &FullGreeks) -> Self {
        let (a, b) = (&self.first_order, &other.first_order);
        let (x, y) = (&self.second_order, &other.second_order);
        Self {
            first_order: FirstOrderGreeks {
                delta: a.delta + b.delta,
                gamma: a.gamma + b.gamma,
                theta: a.theta + b.theta,
                vega: a.vega + b.vega,
                rho: a.rho + b.rho,
                iv: a.iv,
            },
            second_order: SecondOrderGreeks {
                vanna: x.vanna + y.vanna,
                volga: x.volga + y.volga,
                charm: x.charm + y.charm,
                veta: x.veta + y.veta,
                speed: x.speed + y.speed,
                color: x.color + y.color,
            },
        }
    }

    pub fn get(&self, name: GreekName) -> f64 {
        let f = &self.first_order;
        let s = &self.second_order;
        match name {
            GreekName::Delta => f.delta,
            GreekName::Gamma => f.gamma,
            GreekName::Theta => f.theta,
            GreekName::Vega => f.vega,
            GreekName::Rho => f.rho,
            GreekName::Vanna => s.vanna,
            GreekName::Volga => s.volga,
            GreekName::Charm => s.charm,
            GreekName::Veta => s.veta,
            GreekName::Speed => s.speed,
            GreekName::Color => s.color,
        }
    }

    pub fn is_finite(&self) -> bool {
        GreekName::ALL.iter().all(|&n| self.get(n).is_finite()) && self.first_order.iv.is_finite()
    }
}

/// The eleven named sensitivities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GreekName {
    Delta,
    Gamma,
    Theta,
    Vega,
    Rho,
    Vanna,
    Volga,
    Charm,
    Veta,
    Speed,
    Color,
}

impl GreekName {
    pub const ALL: [GreekName; 11] = [
        GreekName::Delta,
        GreekName::Gamma,
        GreekName::Theta,
        GreekName::Vega,
        GreekName::Rho,
        GreekName::Vanna,
        GreekName::Volga,
        GreekName::Charm,
        GreekName::Veta,
        GreekName::Speed,
        GreekName::Color,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GreekName::Delta => "delta",
            GreekName::Gamma => "gamma",
            GreekName::Theta => "theta",
            GreekName::Vega => "vega",
            GreekName::Rho => "rho",
            GreekName::Vanna => "vanna",
            GreekName::Volga => "volga",
            GreekName::Charm => "charm",
            GreekName::Veta => "veta",
            GreekName::Speed => "speed",
            GreekName::Color => "color",
        }
    }

    pub fn is_second_order(&self) -> bool {
        !matches!(
            self,
            GreekName::Delta | GreekName::Gamma | GreekName::Theta | GreekName::Vega | GreekName::Rho
        )
    }
}

impl fmt::Display for GreekName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One value of `T` per Greek name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GreekSet<T> {
    pub delta: T,
    pub gamma: T,
    pub theta: T,
    pub vega: T,
    pub rho: T,
    pub vanna: T,
    pub volga: T,
    pub charm: T,
    pub veta: T,
    pub speed: T,
    pub color: T,
}

impl<T> GreekSet<T> {
    pub fn from_fn(mut f: impl FnMut(GreekName) -> T) -> Self {
        Self {
            delta: f(GreekName::Delta),
            gamma: f(GreekName::Gamma),
            theta: f(GreekName::Theta),
            vega: f(GreekName::Vega),
            rho: f(GreekName::Rho),
            vanna: f(GreekName::Vanna),
            volga: f(GreekName::Volga),
            charm: f(GreekName::Charm),
            veta: f(GreekName::Veta),
            speed: f(GreekName::Speed),
            color: f(GreekName::Color),
        }
    }

    pub fn get(&self, name: GreekName) -> &T {
        match name {
            GreekName::Delta => &self.delta,
            GreekName::Gamma => &self.gamma,
            GreekName::Theta => &self.theta,
            GreekName::Vega => &self.vega,
            GreekName::Rho => &self.rho,
            GreekName::Vanna => &self.vanna,
            GreekName::Volga => &self.volga,
            GreekName::Charm => &self.charm,
            GreekName::Veta => &self.veta,
            GreekName::Speed => &self.speed,
            GreekName::Color => &self.color,
        }
    }

    /// Iterate `(name, value)` in [`GreekName::ALL`] order
    pub fn iter(&self) -> impl Iterator<Item = (GreekName, &T)> {
        GreekName::ALL.into_iter().map(move |n| (n, self.get(n)))
    }
}

/// Greeks for one leg of a position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegGreeks {
    pub leg_id: String,
    /// Single-contract value, unscaled
    pub greeks: FullGreeks,
    /// `greeks` × signed quantity × multiplier
    pub contribution: FullGreeks,
}

/// Greeks for a whole position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionGreeks {
    /// One entry per leg, in declaration order
    pub per_leg: Vec<LegGreeks>,
    /// Sum of the leg contributions; `iv` is the mean leg volatility
    pub aggregated: FullGreeks,
}

impl PositionGreeks {
    pub fn leg(&self, leg_id: &str) -> Option<&LegGreeks> {
        self.per_leg.iter().find(|l| l.leg_id == leg_id)
    }
}
