use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::foundation::error::{TweenError, TweenResult};

const ELASTIC_AMPLITUDE: f64 = 4.0 / 3.0;
const ELASTIC_PERIOD: f64 = 1.0 / 3.0;

/// Signature of an ease-in base curve over `[0, 1]`.
pub type BaseFn = fn(f64) -> f64;

/// Base shaping curve. Every curve is defined in its ease-in form; the
/// other variants are derived from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Curve {
    /// `pos`
    Linear,
    /// `pos^2`
    Quad,
    /// `pos^3`
    Cubic,
    /// `pos^4`
    Quart,
    /// Quarter cosine.
    Sine,
    /// Exponential, `2^(10(pos-1))`.
    Expo,
    /// Circular arc.
    Circ,
    /// Damped sine that overshoots both ends.
    Elastic,
    /// Anticipation: dips below zero before accelerating.
    Expect,
    /// Piecewise parabolic bounce.
    Bounce,
    /// Caller-registered curve.
    Custom(CustomCurve),
}

/// A named caller-supplied ease-in curve.
///
/// Identity is the name; two custom curves with the same name are treated
/// as the same curve.
#[derive(Clone, Copy, Debug)]
pub struct CustomCurve {
    /// Registry name.
    pub name: &'static str,
    /// Ease-in form of the curve.
    pub base: BaseFn,
}

impl PartialEq for CustomCurve {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for CustomCurve {}

impl std::hash::Hash for CustomCurve {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl Curve {
    /// The built-in curves, in registry order.
    pub const STANDARD: [Curve; 10] = [
        Curve::Linear,
        Curve::Quad,
        Curve::Cubic,
        Curve::Quart,
        Curve::Sine,
        Curve::Expo,
        Curve::Circ,
        Curve::Elastic,
        Curve::Expect,
        Curve::Bounce,
    ];

    /// Registry name of this curve.
    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Quad => "quad",
            Self::Cubic => "cubic",
            Self::Quart => "quart",
            Self::Sine => "sine",
            Self::Expo => "expo",
            Self::Circ => "circ",
            Self::Elastic => "elastic",
            Self::Expect => "expect",
            Self::Bounce => "bounce",
            Self::Custom(c) => c.name,
        }
    }

    /// Evaluate the ease-in form at `pos`.
    pub fn ease_in(self, pos: f64) -> f64 {
        match self {
            Self::Linear => pos,
            Self::Quad => pos.powi(2),
            Self::Cubic => pos.powi(3),
            Self::Quart => pos.powi(4),
            Self::Sine => 1.0 - (pos * PI / 2.0).cos(),
            Self::Expo => {
                if pos == 0.0 {
                    0.0
                } else {
                    2f64.powf(10.0 * (pos - 1.0))
                }
            }
            Self::Circ => 1.0 - (1.0 - pos.powi(2)).sqrt(),
            Self::Elastic => elastic(pos),
            Self::Expect => pos.powi(2) * (4.0 * pos - 3.0),
            Self::Bounce => bounce(pos),
            Self::Custom(c) => (c.base)(pos),
        }
    }
}

fn elastic(pos: f64) -> f64 {
    if pos == 0.0 || pos == 1.0 {
        return pos;
    }
    let phase = ELASTIC_PERIOD * 2.0 * PI * (1.0 / ELASTIC_AMPLITUDE).asin();
    -(ELASTIC_AMPLITUDE
        * 2f64.powf(10.0 * (pos - 1.0))
        * ((pos - phase) * 2.0 * PI / ELASTIC_PERIOD).sin())
}

fn bounce(pos: f64) -> f64 {
    let x = 1.0 - pos;
    let g = |a: f64, b: f64| 1.0 - 121.0 / 16.0 * (x - a / 11.0).powi(2) - b;
    if x < 4.0 / 11.0 {
        g(0.0, 0.0)
    } else if x < 8.0 / 11.0 {
        g(6.0, 3.0 / 4.0)
    } else if x < 10.0 / 11.0 {
        g(9.0, 15.0 / 16.0)
    } else {
        g(10.5, 63.0 / 64.0)
    }
}

/// Which derived form of a base curve to apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Variant {
    /// The base curve itself.
    In,
    /// Mirror image: `1 - in(1 - pos)`.
    Out,
    /// Point-symmetric blend of `in` and `out`.
    InOut,
}

impl Variant {
    /// Suffix used in selectors such as `"quad.out"`.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
            Self::InOut => "inout",
        }
    }

    fn from_suffix(s: &str) -> Option<Self> {
        match s {
            "in" => Some(Self::In),
            "out" => Some(Self::Out),
            "inout" => Some(Self::InOut),
            _ => None,
        }
    }
}

/// An easing function with a stable identity (`curve name` + `variant`).
///
/// Equality compares identities, so callers can tell a recognized easing
/// apart from any other callable without comparing closures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ease {
    curve: Curve,
    variant: Variant,
}

impl Ease {
    /// Default easing when an animation specifies none: `sine.inout`.
    pub const DEFAULT: Ease = Ease::new(Curve::Sine, Variant::InOut);

    /// Pair a curve with a variant.
    pub const fn new(curve: Curve, variant: Variant) -> Self {
        Self { curve, variant }
    }

    /// Linear easing.
    pub const fn linear() -> Self {
        Self::new(Curve::Linear, Variant::In)
    }

    /// The underlying base curve.
    pub fn curve(self) -> Curve {
        self.curve
    }

    /// The derived form.
    pub fn variant(self) -> Variant {
        self.variant
    }

    /// Apply this easing function to normalized progress `pos` in `[0, 1]`.
    pub fn apply(self, pos: f64) -> f64 {
        let pos = pos.clamp(0.0, 1.0);
        let f = |p: f64| self.curve.ease_in(p);
        match self.variant {
            Variant::In => f(pos),
            Variant::Out => 1.0 - f(1.0 - pos),
            Variant::InOut => {
                if pos < 0.5 {
                    f(pos * 2.0) / 2.0
                } else {
                    1.0 - f(2.0 - pos * 2.0) / 2.0
                }
            }
        }
    }
}

impl Default for Ease {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.curve.name(), self.variant.suffix())
    }
}

impl FromStr for Ease {
    type Err = TweenError;

    /// Resolve a selector against the standard table.
    fn from_str(s: &str) -> TweenResult<Self> {
        EasingTable::standard().resolve(s)
    }
}

impl serde::Serialize for Ease {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Ease {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The three derived forms of one base curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EaseSet {
    /// Ease-in form.
    pub ease_in: Ease,
    /// Ease-out form.
    pub ease_out: Ease,
    /// Ease-in/out form.
    pub ease_in_out: Ease,
}

impl EaseSet {
    fn of(curve: Curve) -> Self {
        Self {
            ease_in: Ease::new(curve, Variant::In),
            ease_out: Ease::new(curve, Variant::Out),
            ease_in_out: Ease::new(curve, Variant::InOut),
        }
    }

    /// Select one form.
    pub fn get(&self, variant: Variant) -> Ease {
        match variant {
            Variant::In => self.ease_in,
            Variant::Out => self.ease_out,
            Variant::InOut => self.ease_in_out,
        }
    }
}

/// Immutable name → [`EaseSet`] mapping.
///
/// Built once and shared by reference; extending it produces a new table.
#[derive(Clone, Debug)]
pub struct EasingTable {
    sets: BTreeMap<&'static str, EaseSet>,
}

impl EasingTable {
    /// Table holding the built-in curves, initialized on first use.
    pub fn standard() -> &'static EasingTable {
        static TABLE: OnceLock<EasingTable> = OnceLock::new();
        TABLE.get_or_init(|| Self {
            sets: Curve::STANDARD
                .iter()
                .map(|&c| (c.name(), EaseSet::of(c)))
                .collect(),
        })
    }

    /// Copy of this table with one extra custom curve.
    ///
    /// A custom curve may not shadow an existing name.
    pub fn with_curve(&self, name: &'static str, base: BaseFn) -> TweenResult<Self> {
        if self.sets.contains_key(name) {
            return Err(TweenError::easing(format!("curve '{name}' already exists")));
        }
        if name.is_empty() || name.contains('.') {
            return Err(TweenError::easing(format!("invalid curve name '{name}'")));
        }
        let mut sets = self.sets.clone();
        sets.insert(name, EaseSet::of(Curve::Custom(CustomCurve { name, base })));
        Ok(Self { sets })
    }

    /// Look up a curve by name.
    pub fn get(&self, name: &str) -> Option<&EaseSet> {
        self.sets.get(name)
    }

    /// Registered curve names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.sets.keys().copied()
    }

    /// Resolve a selector of the form `name` or `name.variant`.
    ///
    /// A bare name selects the in/out form.
    pub fn resolve(&self, selector: &str) -> TweenResult<Ease> {
        let selector = selector.trim();
        let (name, variant) = match selector.split_once('.') {
            Some((name, suffix)) => {
                let variant = Variant::from_suffix(suffix).ok_or_else(|| {
                    TweenError::easing(format!("unknown variant '{suffix}' in '{selector}'"))
                })?;
                (name, variant)
            }
            None => (selector, Variant::InOut),
        };
        self.get(name)
            .map(|set| set.get(variant))
            .ok_or_else(|| TweenError::easing(format!("unknown curve '{name}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
