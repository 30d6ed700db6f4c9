use derive_more::{Display, FromStr};
use rust_decimal::{Decimal as WrappedDecimal, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};

///
/// Decimal
///
/// Exact fixed-point decimal payload for `Value::Decimal`.
/// All arithmetic is checked; callers decide how overflow surfaces.
///

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    FromStr,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
pub struct Decimal(WrappedDecimal);

impl Decimal {
    pub const ZERO: Self = Self(WrappedDecimal::ZERO);
    pub const MAX: Self = Self(WrappedDecimal::MAX);

    /// Largest scale the payload can carry.
    pub const MAX_SCALE: u32 = 28;

    /// Construct a decimal from mantissa and scale.
    ///
    /// Scales above [`Self::MAX_SCALE`] round to the nearest representable
    /// value; use [`Self::try_new`] to reject them instead.
    #[must_use]
    pub fn new(num: i64, scale: u32) -> Self {
        Self::try_new(num, scale).unwrap_or_else(|| Self::rescaled(num, scale))
    }

    /// Construct a decimal from mantissa and scale, or `None` when the scale
    /// exceeds [`Self::MAX_SCALE`].
    #[must_use]
    pub fn try_new(num: i64, scale: u32) -> Option<Self> {
        WrappedDecimal::try_new(num, scale).ok().map(Self)
    }

    // num * 10^-scale for scale > MAX_SCALE. An i64 mantissa has at most 19
    // digits, so past MAX_SCALE + 19 every value rounds to zero.
    fn rescaled(num: i64, scale: u32) -> Self {
        let excess = scale.saturating_sub(Self::MAX_SCALE);
        if excess > 19 {
            return Self::ZERO;
        }

        WrappedDecimal::new(num, Self::MAX_SCALE)
            .checked_div(WrappedDecimal::from(10u64.pow(excess)))
            .map_or(Self::ZERO, Self)
    }

    #[must_use]
    pub fn from_i64(value: i64) -> Self {
        Self(WrappedDecimal::from(value))
    }

    /// Fallible widening from an i128 accumulator total.
    #[must_use]
    pub fn from_i128(value: i128) -> Option<Self> {
        WrappedDecimal::try_from_i128_with_scale(value, 0)
            .ok()
            .map(Self)
    }

    /// Strip trailing zeros so `1.0`, `1.00`, and `1` share one representation.
    #[must_use]
    pub fn normalize(self) -> Self {
        Self(self.0.normalize())
    }

    #[must_use]
    pub const fn mantissa(&self) -> i128 {
        self.0.mantissa()
    }

    #[must_use]
    pub const fn scale(&self) -> u32 {
        self.0.scale()
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Exact integer view, when the value has no fractional part and fits.
    #[must_use]
    pub fn to_i64_exact(&self) -> Option<i64> {
        if self.0.fract().is_zero() {
            self.0.to_i64()
        } else {
            None
        }
    }

    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    #[must_use]
    pub fn checked_mul(self, other: Self) -> Option<Self> {
        self.0.checked_mul(other.0).map(Self)
    }

    /// Checked division. Returns `None` on overflow and on a zero divisor;
    /// callers test for zero first when the two must be told apart.
    #[must_use]
    pub fn checked_div(self, other: Self) -> Option<Self> {
        self.0.checked_div(other.0).map(Self)
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

///
/// TESTS
///
