//! Numeric values carried by resource vectors.
//!
//! Vendor specs and workload definitions mix integral and fractional
//! numbers (`cores = 16`, `bandwidth_gbps = 2.5`). [`Quantity`] keeps the
//! distinction and defines arithmetic once so every component agrees on
//! the result type:
//!
//! - `Int + Int` stays `Int` (promotes to `Float` only on overflow).
//! - `Float + _` is `Float`.
//! - `Int + Float` stays `Int` when the float is integral, otherwise it
//!   promotes so the fractional part is not lost.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// An integral or fractional resource amount.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Int(i64),
    Float(f64),
}

/// Returns `f` as an `i64` if it is finite, integral and in range.
fn integral(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

impl Quantity {
    pub const ZERO: Quantity = Quantity::Int(0);

    pub fn as_f64(self) -> f64 {
        match self {
            Quantity::Int(v) => v as f64,
            Quantity::Float(v) => v,
        }
    }

    pub fn is_int(self) -> bool {
        matches!(self, Quantity::Int(_))
    }

    pub fn is_zero(self) -> bool {
        self.as_f64() == 0.0
    }

    pub fn is_positive(self) -> bool {
        self.as_f64() > 0.0
    }

    /// Multiply by an instance count.
    pub fn times(self, count: u32) -> Quantity {
        match self {
            Quantity::Int(v) => v
                .checked_mul(i64::from(count))
                .map(Quantity::Int)
                .unwrap_or(Quantity::Float(v as f64 * f64::from(count))),
            Quantity::Float(v) => Quantity::Float(v * f64::from(count)),
        }
    }

    /// Multiply by a unit-conversion factor. Integral factors keep `Int`.
    pub fn scale(self, factor: f64) -> Quantity {
        match (self, integral(factor)) {
            (Quantity::Int(v), Some(f)) => v
                .checked_mul(f)
                .map(Quantity::Int)
                .unwrap_or(Quantity::Float(v as f64 * factor)),
            _ => Quantity::Float(self.as_f64() * factor),
        }
    }

    /// Halve, staying integral when the value is even.
    pub fn halve(self) -> Quantity {
        match self {
            Quantity::Int(v) if v % 2 == 0 => Quantity::Int(v / 2),
            other => Quantity::Float(other.as_f64() / 2.0),
        }
    }

    /// The smaller of two quantities; `self` wins ties.
    pub fn min(self, other: Quantity) -> Quantity {
        if other < self { other } else { self }
    }

    /// `self / total` as a ratio, `None` when `total` is not positive.
    pub fn ratio_of(self, total: Quantity) -> Option<f64> {
        total.is_positive().then(|| self.as_f64() / total.as_f64())
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::ZERO
    }
}

impl Add for Quantity {
    type Output = Quantity;

    fn add(self, rhs: Quantity) -> Quantity {
        match (self, rhs) {
            (Quantity::Int(a), Quantity::Int(b)) => a
                .checked_add(b)
                .map(Quantity::Int)
                .unwrap_or(Quantity::Float(a as f64 + b as f64)),
            (Quantity::Int(a), Quantity::Float(b)) => match integral(b) {
                Some(b) => Quantity::Int(a) + Quantity::Int(b),
                None => Quantity::Float(a as f64 + b),
            },
            (Quantity::Float(a), b) => Quantity::Float(a + b.as_f64()),
        }
    }
}

impl Sub for Quantity {
    type Output = Quantity;

    fn sub(self, rhs: Quantity) -> Quantity {
        match (self, rhs) {
            (Quantity::Int(a), Quantity::Int(b)) => a
                .checked_sub(b)
                .map(Quantity::Int)
                .unwrap_or(Quantity::Float(a as f64 - b as f64)),
            (Quantity::Int(a), Quantity::Float(b)) => match integral(b) {
                Some(b) => Quantity::Int(a) - Quantity::Int(b),
                None => Quantity::Float(a as f64 - b),
            },
            (Quantity::Float(a), b) => Quantity::Float(a - b.as_f64()),
        }
    }
}

impl AddAssign for Quantity {
    fn add_assign(&mut self, rhs: Quantity) {
        *self = *self + rhs;
    }
}

impl SubAssign for Quantity {
    fn sub_assign(&mut self, rhs: Quantity) {
        *self = *self - rhs;
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Quantity::Int(a), Quantity::Int(b)) => Some(a.cmp(b)),
            _ => Some(self.as_f64().total_cmp(&other.as_f64())),
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Int(v) => write!(f, "{v}"),
            Quantity::Float(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for Quantity {
    fn from(v: i64) -> Self {
        Quantity::Int(v)
    }
}

impl From<i32> for Quantity {
    fn from(v: i32) -> Self {
        Quantity::Int(i64::from(v))
    }
}

impl From<u32> for Quantity {
    fn from(v: u32) -> Self {
        Quantity::Int(i64::from(v))
    }
}

impl From<u64> for Quantity {
    fn from(v: u64) -> Self {
        i64::try_from(v)
            .map(Quantity::Int)
            .unwrap_or(Quantity::Float(v as f64))
    }
}

impl From<f64> for Quantity {
    fn from(v: f64) -> Self {
        Quantity::Float(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_addition_stays_integral() {
        let sum = Quantity::Int(3) + Quantity::Int(4);
        assert!(sum.is_int());
        assert_eq!(sum, Quantity::Int(7));
    }

    #[test]
    fn int_accumulator_keeps_integral_float_operand() {
        let sum = Quantity::Int(3) + Quantity::Float(2.0);
        assert!(sum.is_int());
        assert_eq!(sum, Quantity::Int(5));
    }

    #[test]
    fn fractional_operand_promotes() {
        let sum = Quantity::Int(3) + Quantity::Float(0.5);
        assert!(!sum.is_int());
        assert_eq!(sum.as_f64(), 3.5);
    }

    #[test]
    fn float_accumulator_stays_float() {
        let sum = Quantity::Float(1.5) + Quantity::Int(2);
        assert!(!sum.is_int());
        assert_eq!(sum.as_f64(), 3.5);
    }

    #[test]
    fn overflow_promotes_instead_of_wrapping() {
        let sum = Quantity::Int(i64::MAX) + Quantity::Int(1);
        assert!(!sum.is_int());
        assert!(sum.as_f64() > 9.0e18);
    }

    #[test]
    fn compares_across_variants() {
        assert_eq!(Quantity::Int(2), Quantity::Float(2.0));
        assert!(Quantity::Int(2) < Quantity::Float(2.5));
        assert!(Quantity::Float(4.1) > Quantity::Int(4));
    }

    #[test]
    fn scale_by_integral_factor_keeps_int() {
        assert_eq!(Quantity::Int(32).scale(1024.0), Quantity::Int(32768));
        assert!(Quantity::Int(32).scale(1024.0).is_int());
        assert!(!Quantity::Int(2500).scale(0.001).is_int());
    }

    #[test]
    fn halve_odd_int_goes_fractional() {
        assert_eq!(Quantity::Int(400).halve(), Quantity::Int(200));
        assert_eq!(Quantity::Int(3).halve(), Quantity::Float(1.5));
    }

    #[test]
    fn serializes_preserving_kind() {
        let json = serde_json::to_string(&vec![Quantity::Int(2), Quantity::Float(2.5)]).unwrap();
        assert_eq!(json, "[2,2.5]");

        let parsed: Vec<Quantity> = serde_json::from_str("[4, 0.25, 8.0]").unwrap();
        assert!(parsed[0].is_int());
        assert!(!parsed[1].is_int());
        assert!(!parsed[2].is_int());
    }

    #[test]
    fn ratio_requires_positive_total() {
        assert_eq!(Quantity::Int(2).ratio_of(Quantity::Int(8)), Some(0.25));
        assert_eq!(Quantity::Int(2).ratio_of(Quantity::ZERO), None);
    }
}
