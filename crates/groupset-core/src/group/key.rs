use crate::{
    engine::PlanError,
    error::EvalError,
    expr::Expr,
    group::GroupingSubset,
    row::Row,
    value::{StableHash, Value, group_equal, stable_hash_values},
};

///
/// GroupKey
///
/// Projected key tuple for one grouping subset plus its stable hash.
/// Two keys are the same group when [`group_key_equals`] holds; the hash only
/// selects the bucket that equality is checked in.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GroupKey {
    values: Vec<Value>,
    hash: StableHash,
}

impl GroupKey {
    #[must_use]
    pub fn new(values: Vec<Value>) -> Self {
        let hash = stable_hash_values(&values);

        Self { values, hash }
    }

    #[must_use]
    pub const fn hash(&self) -> StableHash {
        self.hash
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

/// Grouping equality over whole keys: pairwise [`group_equal`], so `Null`
/// components match each other.
#[must_use]
pub fn group_key_equals(left: &GroupKey, right: &GroupKey) -> bool {
    left.values.len() == right.values.len()
        && left
            .values
            .iter()
            .zip(&right.values)
            .all(|(l, r)| group_equal(l, r))
}

///
/// GroupKeyExtractor
///
/// Evaluates the plan's grouping key expressions against a row. Keys are
/// evaluated once per row and then projected onto every active subset.
///

#[derive(Clone, Debug)]
pub struct GroupKeyExtractor {
    keys: Vec<Expr>,
}

impl GroupKeyExtractor {
    /// Build an extractor, rejecting any key that references an aggregate.
    pub fn new(keys: Vec<Expr>) -> Result<Self, PlanError> {
        if let Some(index) = keys.iter().position(Expr::contains_aggregate) {
            return Err(PlanError::AggregateInGroupKey { index });
        }

        Ok(Self { keys })
    }

    #[must_use]
    pub const fn key_count(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn keys(&self) -> &[Expr] {
        &self.keys
    }

    /// Evaluate every key expression against one row.
    pub fn evaluate(&self, row: &Row) -> Result<Vec<Value>, EvalError> {
        self.keys.iter().map(|key| key.eval(row)).collect()
    }

    /// Evaluate only the keys one subset groups by.
    pub fn extract(&self, row: &Row, subset: &GroupingSubset) -> Result<GroupKey, EvalError> {
        let values = subset
            .columns()
            .iter()
            .map(|&column| self.key_expr(column)?.eval(row))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(GroupKey::new(values))
    }

    /// Project a full evaluated key tuple onto one subset.
    #[must_use]
    pub fn project(evaluated: &[Value], subset: &GroupingSubset) -> GroupKey {
        let values = subset
            .columns()
            .iter()
            .map(|&column| evaluated.get(column).cloned().unwrap_or(Value::Null))
            .collect();

        GroupKey::new(values)
    }

    fn key_expr(&self, column: usize) -> Result<&Expr, EvalError> {
        self.keys.get(column).ok_or_else(|| {
            EvalError::engine_invariant(format!(
                "grouping subset references key column {column} of {}",
                self.keys.len()
            ))
        })
    }
}
