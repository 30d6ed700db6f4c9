use crate::{
    aggregate::Accumulator,
    engine::{GroupingPlan, ResultRow},
    error::EvalError,
    group::{GroupKey, GroupKeyExtractor, group_key_equals},
    row::Row,
    value::{StableHash, Value},
};
use std::collections::BTreeMap;

///
/// GroupEntry
///

#[derive(Debug)]
struct GroupEntry {
    key: GroupKey,
    states: Vec<Accumulator>,
}

///
/// GroupTable
///
/// Per-subset group map. Buckets by stable hash and checks grouping
/// equality inside each bucket; `groups` keeps first-seen order.
///

#[derive(Debug, Default)]
struct GroupTable {
    buckets: BTreeMap<StableHash, Vec<usize>>,
    groups: Vec<GroupEntry>,
}

impl GroupTable {
    fn find(&self, key: &GroupKey) -> Option<usize> {
        self.buckets.get(&key.hash()).and_then(|slots| {
            slots
                .iter()
                .copied()
                .find(|&slot| group_key_equals(&self.groups[slot].key, key))
        })
    }

    fn insert(&mut self, key: GroupKey, states: Vec<Accumulator>) -> usize {
        let slot = self.groups.len();
        self.buckets.entry(key.hash()).or_default().push(slot);
        self.groups.push(GroupEntry { key, states });

        slot
    }
}

///
/// Partition
///
/// One worker's exclusive (subset, key) → accumulator map. Partitions built
/// over disjoint row ranges of the same plan combine with [`Partition::merge`];
/// no accumulator is ever shared between live partitions.
///

#[derive(Debug)]
pub struct Partition<'a> {
    plan: &'a GroupingPlan,
    max_groups: u64,
    tables: Vec<GroupTable>,
    groups: u64,
    rows: u64,
}

impl<'a> Partition<'a> {
    pub(crate) fn new(plan: &'a GroupingPlan, max_groups: u64) -> Self {
        Self {
            plan,
            max_groups,
            tables: plan.subsets().iter().map(|_| GroupTable::default()).collect(),
            groups: 0,
            rows: 0,
        }
    }

    pub(crate) const fn plan(&self) -> &'a GroupingPlan {
        self.plan
    }

    /// Rows observed by this partition, including merged partitions.
    #[must_use]
    pub const fn rows(&self) -> u64 {
        self.rows
    }

    /// Live (subset, key) groups across every subset.
    #[must_use]
    pub const fn groups(&self) -> u64 {
        self.groups
    }

    /// Route one row into every grouping subset.
    pub fn observe(&mut self, row: &Row) -> Result<(), EvalError> {
        let plan = self.plan;
        plan.schema().check_row(row)?;

        let evaluated = plan.extractor().evaluate(row)?;
        let inputs = plan
            .aggregates()
            .iter()
            // COUNT(*) has no input and counts the row regardless.
            .map(|aggregate| match aggregate.input() {
                Some(input) => input.eval(row),
                None => Ok(Value::Null),
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (index, subset) in plan.subsets().iter().enumerate() {
            let key = GroupKeyExtractor::project(&evaluated, subset);
            let slot = self.slot_for(index, key)?;
            let states = &mut self.tables[index].groups[slot].states;
            for (state, input) in states.iter_mut().zip(&inputs) {
                state.observe(input)?;
            }
        }
        self.rows = self.rows.saturating_add(1);

        Ok(())
    }

    /// Fold another partition of the same plan into this one.
    ///
    /// Groups new to `self` are appended after existing ones, so merging
    /// partitions in row-range order keeps first-seen output order. Both
    /// partitions are consumed; a failed merge leaves nothing to finish.
    pub fn merge(mut self, other: Self) -> Result<Self, EvalError> {
        if !std::ptr::eq(self.plan, other.plan) {
            return Err(EvalError::engine_invariant(
                "cannot merge partitions built from different plans",
            ));
        }

        for (index, table) in other.tables.into_iter().enumerate() {
            for GroupEntry { key, states } in table.groups {
                match self.tables[index].find(&key) {
                    Some(slot) => {
                        let entry = &mut self.tables[index].groups[slot];
                        entry.states = std::mem::take(&mut entry.states)
                            .into_iter()
                            .zip(states)
                            .map(|(mine, theirs)| mine.merge(theirs))
                            .collect::<Result<Vec<_>, _>>()?;
                    }
                    None => {
                        self.reserve_group()?;
                        self.tables[index].insert(key, states);
                    }
                }
            }
        }
        self.rows = self.rows.saturating_add(other.rows);

        Ok(self)
    }

    /// Finalize every group into result rows, subset by subset.
    pub(crate) fn materialize(self) -> Result<Vec<ResultRow>, EvalError> {
        let key_count = self.plan.key_count();
        let capacity = usize::try_from(self.groups).unwrap_or(0);
        let mut rows = Vec::with_capacity(capacity);

        for (index, (subset, table)) in self.plan.subsets().iter().zip(self.tables).enumerate() {
            for GroupEntry { key, states } in table.groups {
                let mut keys = vec![Value::Null; key_count];
                for (&column, value) in subset.columns().iter().zip(key.into_values()) {
                    keys[column] = value;
                }
                let aggregates = states
                    .into_iter()
                    .map(Accumulator::finalize)
                    .collect::<Result<Vec<_>, _>>()?;

                rows.push(ResultRow::new(index, keys, subset.grouping_mask(), aggregates));
            }
        }

        Ok(rows)
    }

    fn slot_for(&mut self, index: usize, key: GroupKey) -> Result<usize, EvalError> {
        if let Some(slot) = self.tables[index].find(&key) {
            return Ok(slot);
        }

        self.reserve_group()?;
        let states = self
            .plan
            .aggregates()
            .iter()
            .map(Accumulator::for_spec)
            .collect();

        Ok(self.tables[index].insert(key, states))
    }

    fn reserve_group(&mut self) -> Result<(), EvalError> {
        let next = self.groups.saturating_add(1);
        if next > self.max_groups {
            return Err(EvalError::group_limit_exceeded(next, self.max_groups));
        }
        self.groups = next;

        Ok(())
    }
}
