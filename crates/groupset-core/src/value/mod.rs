mod arith;
mod compare;
mod error;
mod func;
mod hash;
mod tribool;


use crate::types::{Decimal, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

// re-exports
pub use arith::{ArithOp, arith};
pub use compare::{CompareOp, canonical_cmp, compare, group_equal};
pub use error::ValueError;
pub use func::{coalesce, null_if};
pub use hash::{StableHash, stable_hash_value, stable_hash_values};
pub use tribool::TriBool;

pub(crate) use compare::{outranks_representative, strict_order_cmp};

#[cfg(test)]
pub(crate) use hash::with_test_hash_override;

///
/// ValueType
///
/// Declared type of a schema column. `Null` is a value, not a type: any
/// column may carry it.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum ValueType {
    Null,
    Boolean,
    Integer,
    Decimal,
    Text,
    Timestamp,
}

impl ValueType {
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Decimal)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Text => "text",
            Self::Timestamp => "timestamp",
        };
        write!(f, "{label}")
    }
}

///
/// Value
///
/// Nullable scalar carried by rows, keys, and aggregate results.
///
/// Derived `PartialEq` is structural (`Null == Null`) and exists for tests
/// and bookkeeping. SQL equality lives in [`compare`]; grouping equality
/// lives in [`group_equal`].
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Decimal(Decimal),
    Text(String),
    Timestamp(Timestamp),
}

impl Value {
    ///
    /// CONSTRUCTION
    ///

    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Decimal from mantissa and scale; see [`Decimal::new`] for scales
    /// beyond the representable range.
    #[must_use]
    pub fn decimal(num: i64, scale: u32) -> Self {
        Self::Decimal(Decimal::new(num, scale))
    }

    #[must_use]
    pub const fn timestamp(secs: u64) -> Self {
        Self::Timestamp(Timestamp::from_seconds(secs))
    }

    ///
    /// INSPECTION
    ///

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::Null => ValueType::Null,
            Self::Boolean(_) => ValueType::Boolean,
            Self::Integer(_) => ValueType::Integer,
            Self::Decimal(_) => ValueType::Decimal,
            Self::Text(_) => ValueType::Text,
            Self::Timestamp(_) => ValueType::Timestamp,
        }
    }

    /// Numeric view with Integer widened to Decimal.
    #[must_use]
    pub(crate) fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Integer(v) => Some(Decimal::from_i64(*v)),
            Self::Decimal(v) => Some(*v),
            _ => None,
        }
    }

    // Rank used by the total canonical order; numerics share one rank.
    pub(crate) const fn canonical_rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Boolean(_) => 1,
            Self::Integer(_) | Self::Decimal(_) => 2,
            Self::Text(_) => 3,
            Self::Timestamp(_) => 4,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "'{v}'"),
            Self::Timestamp(v) => write!(f, "@{v}"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Timestamp> for Value {
    fn from(value: Timestamp) -> Self {
        Self::Timestamp(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
