//! Module: group
//! Responsibility: grouping key extraction and grouping-set expansion.
//! Does not own: accumulator state or per-group storage.
//! Boundary: produces the flat subset arena and the per-row keys the engine
//! partitions on.

#[cfg(test)]
mod tests;

mod key;
mod set;

pub use key::{GroupKey, GroupKeyExtractor, group_key_equals};
pub use set::{
    GroupingSetError, GroupingSetSpec, GroupingSubset, MAX_GROUPING_SUBSETS, expand,
};
