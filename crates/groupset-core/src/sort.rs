//! Downstream ordering of result rows with an explicit NULL placement policy.

use crate::{
    config::NullOrder,
    engine::ResultRow,
    value::{Value, canonical_cmp},
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

static NULL: Value = Value::Null;

///
/// Direction
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

///
/// SortTarget
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum SortTarget {
    Key(usize),
    Aggregate(usize),

    /// `GROUPING(c1, ..., cn)` over every key column.
    GroupingId,
}

///
/// SortKey
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SortKey {
    pub target: SortTarget,
    pub direction: Direction,
}

impl SortKey {
    #[must_use]
    pub const fn asc(target: SortTarget) -> Self {
        Self {
            target,
            direction: Direction::Asc,
        }
    }

    #[must_use]
    pub const fn desc(target: SortTarget) -> Self {
        Self {
            target,
            direction: Direction::Desc,
        }
    }
}

/// Stable sort of result rows by `keys`, left to right.
///
/// `Null` lands first or last per `null_order` regardless of direction.
/// Targets past the end of a row read as `Null`; callers validate targets
/// against the plan beforehand.
pub fn sort_result_rows(rows: &mut [ResultRow], keys: &[SortKey], null_order: NullOrder) {
    rows.sort_by(|left, right| {
        keys.iter()
            .map(|key| compare_target(left, right, *key, null_order))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
}

fn compare_target(
    left: &ResultRow,
    right: &ResultRow,
    key: SortKey,
    null_order: NullOrder,
) -> Ordering {
    match key.target {
        SortTarget::Key(column) => {
            compare_values(left.key(column), right.key(column), key.direction, null_order)
        }
        SortTarget::Aggregate(index) => compare_values(
            left.aggregate(index),
            right.aggregate(index),
            key.direction,
            null_order,
        ),
        SortTarget::GroupingId => directed(
            full_grouping_id(left).cmp(&full_grouping_id(right)),
            key.direction,
        ),
    }
}

fn compare_values(
    left: Option<&Value>,
    right: Option<&Value>,
    direction: Direction,
    null_order: NullOrder,
) -> Ordering {
    let left = left.unwrap_or(&NULL);
    let right = right.unwrap_or(&NULL);

    match (left.is_null(), right.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => null_side(null_order),
        (false, true) => null_side(null_order).reverse(),
        (false, false) => directed(canonical_cmp(left, right), direction),
    }
}

const fn null_side(null_order: NullOrder) -> Ordering {
    match null_order {
        NullOrder::NullsFirst => Ordering::Less,
        NullOrder::NullsLast => Ordering::Greater,
    }
}

const fn directed(ordering: Ordering, direction: Direction) -> Ordering {
    match direction {
        Direction::Asc => ordering,
        Direction::Desc => ordering.reverse(),
    }
}

fn full_grouping_id(row: &ResultRow) -> u64 {
    let columns = (0..row.keys().len()).collect::<Vec<_>>();

    row.grouping_id(&columns)
}

///
/// TESTS
///
