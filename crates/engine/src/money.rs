use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Sub},
};

use crate::{EngineError, ResultEngine};

/// Largest absolute decimal amount accepted from clients.
///
/// Keeps `amount * 100` well inside `i64` and exactly representable in `f64`.
const MAX_DECIMAL: f64 = 1e13;

/// Signed money amount represented as **integer cents**.
///
/// Every revenue, expense and net value in the engine is a `MoneyCents`, so
/// sums and the `net == revenue - expense` invariant are exact. Conversion
/// to and from the decimal numbers of the JSON API happens at the edges with
/// fixed 2-decimal rounding.
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::from_decimal(12.3).unwrap();
/// assert_eq!(amount.cents(), 1230);
/// assert_eq!(amount.to_string(), "12.30");
/// assert_eq!(amount.to_decimal(), 12.3);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Converts a decimal amount, rounding half away from zero to the cent.
    ///
    /// Rejects `NaN`, infinities and magnitudes above 10^13.
    pub fn from_decimal(value: f64) -> ResultEngine<Self> {
        if !value.is_finite() {
            return Err(EngineError::InvalidInput(
                "amount must be a finite number".to_string(),
            ));
        }
        if value.abs() > MAX_DECIMAL {
            return Err(EngineError::InvalidInput("amount too large".to_string()));
        }

        Ok(Self((value * 100.0).round() as i64))
    }

    /// Returns the amount as a decimal number with two fractional digits.
    #[must_use]
    pub fn to_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Adds two amounts, returning `None` on overflow.
    #[must_use]
    pub const fn checked_add(self, rhs: MoneyCents) -> Option<Self> {
        match self.0.checked_add(rhs.0) {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }

    /// Divides the amount by `count`, rounding half away from zero.
    ///
    /// Returns zero when `count` is zero.
    #[must_use]
    pub fn div_rounded(self, count: usize) -> Self {
        if count == 0 {
            return Self::ZERO;
        }
        let value = i128::from(self.0);
        let count = count as i128;
        let half = count / 2;
        let rounded = if value >= 0 {
            (value + half) / count
        } else {
            (value - half) / count
        };
        Self(rounded as i64)
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{units}.{cents:02}")
    }
}

impl From<i64> for MoneyCents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<MoneyCents> for i64 {
    fn from(value: MoneyCents) -> Self {
        value.0
    }
}

impl Add for MoneyCents {
    type Output = MoneyCents;

    fn add(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 + rhs.0)
    }
}

impl AddAssign for MoneyCents {
    fn add_assign(&mut self, rhs: MoneyCents) {
        self.0 += rhs.0;
    }
}

impl Sub for MoneyCents {
    type Output = MoneyCents;

    fn sub(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 - rhs.0)
    }
}

impl Sum for MoneyCents {
    fn sum<I: Iterator<Item = MoneyCents>>(iter: I) -> Self {
        iter.fold(MoneyCents::ZERO, Add::add)
    }
}
