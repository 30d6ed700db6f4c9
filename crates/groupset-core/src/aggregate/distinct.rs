use crate::value::{StableHash, Value, group_equal, outranks_representative, stable_hash_value};
use std::collections::BTreeMap;

///
/// DistinctValues
///
/// Seen-value set for DISTINCT aggregates. Buckets by stable hash and keeps
/// grouping-equality checks inside each bucket so hash collisions never
/// merge distinct values. Insertion order is preserved; grouping-equal
/// duplicates settle on one representative regardless of arrival order.
///

#[derive(Clone, Debug, Default)]
pub struct DistinctValues {
    buckets: BTreeMap<StableHash, Vec<usize>>,
    values: Vec<Value>,
}

impl DistinctValues {
    /// Insert one value and return true if it was newly observed.
    pub fn insert(&mut self, value: &Value) -> bool {
        let bucket = self.buckets.entry(stable_hash_value(value)).or_default();
        if let Some(&slot) = bucket
            .iter()
            .find(|&&slot| group_equal(&self.values[slot], value))
        {
            if outranks_representative(value, &self.values[slot]) {
                self.values[slot] = value.clone();
            }
            return false;
        }

        bucket.push(self.values.len());
        self.values.push(value.clone());
        true
    }

    /// Union another set into this one.
    pub fn merge(&mut self, other: Self) {
        for value in &other.values {
            self.insert(value);
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.values.iter()
    }
}
