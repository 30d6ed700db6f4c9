use crate::expr::Expr;
use serde::{Deserialize, Serialize};

///
/// AggregateKind
///
/// Closed set of aggregate functions. `CountStar` and `Count` are distinct
/// kinds: the first counts rows, the second counts non-null inputs.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum AggregateKind {
    CountStar,
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CountStar => "COUNT(*)",
            Self::Count => "COUNT",
            Self::Sum => "SUM",
            Self::Avg => "AVG",
            Self::Min => "MIN",
            Self::Max => "MAX",
        }
    }

    /// Return whether this kind reads an input expression.
    #[must_use]
    pub const fn requires_input(self) -> bool {
        !matches!(self, Self::CountStar)
    }

    /// Return whether DISTINCT changes the result of this kind.
    ///
    /// MIN/MAX are duplicate-insensitive, so DISTINCT is accepted and ignored.
    #[must_use]
    pub const fn distinct_changes_result(self) -> bool {
        matches!(self, Self::Count | Self::Sum | Self::Avg)
    }
}

///
/// AggregateSpec
///
/// One aggregate expression: function kind, input expression, and the
/// DISTINCT modifier.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AggregateSpec {
    kind: AggregateKind,
    input: Option<Expr>,
    distinct: bool,
}

impl AggregateSpec {
    #[must_use]
    pub const fn new(kind: AggregateKind, input: Option<Expr>, distinct: bool) -> Self {
        Self {
            kind,
            input,
            distinct,
        }
    }

    #[must_use]
    pub const fn count_star() -> Self {
        Self::new(AggregateKind::CountStar, None, false)
    }

    #[must_use]
    pub const fn count(input: Expr) -> Self {
        Self::new(AggregateKind::Count, Some(input), false)
    }

    #[must_use]
    pub const fn count_distinct(input: Expr) -> Self {
        Self::new(AggregateKind::Count, Some(input), true)
    }

    #[must_use]
    pub const fn sum(input: Expr) -> Self {
        Self::new(AggregateKind::Sum, Some(input), false)
    }

    #[must_use]
    pub const fn sum_distinct(input: Expr) -> Self {
        Self::new(AggregateKind::Sum, Some(input), true)
    }

    #[must_use]
    pub const fn avg(input: Expr) -> Self {
        Self::new(AggregateKind::Avg, Some(input), false)
    }

    #[must_use]
    pub const fn avg_distinct(input: Expr) -> Self {
        Self::new(AggregateKind::Avg, Some(input), true)
    }

    #[must_use]
    pub const fn min(input: Expr) -> Self {
        Self::new(AggregateKind::Min, Some(input), false)
    }

    #[must_use]
    pub const fn max(input: Expr) -> Self {
        Self::new(AggregateKind::Max, Some(input), false)
    }

    #[must_use]
    pub const fn kind(&self) -> AggregateKind {
        self.kind
    }

    #[must_use]
    pub const fn input(&self) -> Option<&Expr> {
        self.input.as_ref()
    }

    #[must_use]
    pub const fn is_distinct(&self) -> bool {
        self.distinct
    }

    /// Return true when accumulation must deduplicate its inputs.
    #[must_use]
    pub const fn needs_distinct_state(&self) -> bool {
        self.distinct && self.kind.distinct_changes_result()
    }
}
