use crate::value::Value;
use std::ops::{BitAnd, BitOr, Not};

///
/// TriBool
///
/// Kleene three-valued boolean. `Unknown` is what any comparison against
/// `Null` produces; only `True` admits a row.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TriBool {
    True,
    False,
    Unknown,
}

impl TriBool {
    #[must_use]
    pub const fn from_bool(value: bool) -> Self {
        if value { Self::True } else { Self::False }
    }

    /// Kleene conjunction: `False` dominates, then `Unknown`.
    #[must_use]
    pub const fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::False, _) | (_, Self::False) => Self::False,
            (Self::True, Self::True) => Self::True,
            _ => Self::Unknown,
        }
    }

    /// Kleene disjunction: `True` dominates, then `Unknown`.
    #[must_use]
    pub const fn or(self, other: Self) -> Self {
        match (self, other) {
            (Self::True, _) | (_, Self::True) => Self::True,
            (Self::False, Self::False) => Self::False,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub const fn negate(self) -> Self {
        match self {
            Self::True => Self::False,
            Self::False => Self::True,
            Self::Unknown => Self::Unknown,
        }
    }

    /// Row-admission decision: `False` and `Unknown` both reject.
    #[must_use]
    pub const fn is_true(self) -> bool {
        matches!(self, Self::True)
    }

    #[must_use]
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Project into a nullable boolean value.
    #[must_use]
    pub const fn into_value(self) -> Value {
        match self {
            Self::True => Value::Boolean(true),
            Self::False => Value::Boolean(false),
            Self::Unknown => Value::Null,
        }
    }
}

impl From<bool> for TriBool {
    fn from(value: bool) -> Self {
        Self::from_bool(value)
    }
}

impl From<Option<bool>> for TriBool {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Self::Unknown, Self::from_bool)
    }
}

impl BitAnd for TriBool {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(rhs)
    }
}

impl BitOr for TriBool {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

impl Not for TriBool {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.negate()
    }
}
