use crate::value::Value;

///
/// ResultRow
///
/// One materialized group. `keys` spans every grouping key column; columns
/// the originating subset omits are `Null` and flagged in `grouping_mask`
/// (bit `i` set for key column `i`), which is what `GROUPING()` reads.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResultRow {
    subset: usize,
    keys: Vec<Value>,
    grouping_mask: u64,
    aggregates: Vec<Value>,
}

impl ResultRow {
    pub(crate) const fn new(
        subset: usize,
        keys: Vec<Value>,
        grouping_mask: u64,
        aggregates: Vec<Value>,
    ) -> Self {
        Self {
            subset,
            keys,
            grouping_mask,
            aggregates,
        }
    }

    /// Position of the originating subset in the plan's expanded list.
    #[must_use]
    pub const fn subset(&self) -> usize {
        self.subset
    }

    #[must_use]
    pub fn keys(&self) -> &[Value] {
        &self.keys
    }

    #[must_use]
    pub fn key(&self, column: usize) -> Option<&Value> {
        self.keys.get(column)
    }

    #[must_use]
    pub fn aggregates(&self) -> &[Value] {
        &self.aggregates
    }

    #[must_use]
    pub fn aggregate(&self, index: usize) -> Option<&Value> {
        self.aggregates.get(index)
    }

    #[must_use]
    pub const fn grouping_mask(&self) -> u64 {
        self.grouping_mask
    }

    /// `GROUPING(col)`: 1 when key column `col` was rolled up in this row.
    #[must_use]
    pub const fn grouping(&self, column: usize) -> u8 {
        if column < u64::BITS as usize && (self.grouping_mask >> column) & 1 == 1 {
            1
        } else {
            0
        }
    }

    #[must_use]
    pub const fn is_subtotal(&self, column: usize) -> bool {
        self.grouping(column) == 1
    }

    /// `GROUPING(c1, ..., cn)` with `c1` as the most significant bit.
    #[must_use]
    pub fn grouping_id(&self, columns: &[usize]) -> u64 {
        columns
            .iter()
            .fold(0, |id, &column| (id << 1) | u64::from(self.grouping(column)))
    }

    /// `GROUPING()` bit for every key column, in key order.
    #[must_use]
    pub fn grouping_flags(&self) -> Vec<bool> {
        (0..self.keys.len())
            .map(|column| self.is_subtotal(column))
            .collect()
    }

    /// True for the `()` row of a subset that rolls up every key column.
    #[must_use]
    pub fn is_grand_total(&self) -> bool {
        (0..self.keys.len()).all(|column| self.is_subtotal(column))
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<Value>, Vec<Value>) {
        (self.keys, self.aggregates)
    }
}
