use crate::{
    aggregate::AggregateSpec,
    error::{ErrorOrigin, EvalError},
    expr::Expr,
    group::{GroupKeyExtractor, GroupingSetSpec, GroupingSubset, expand},
    having::HavingPredicate,
    row::Schema,
};
use thiserror::Error as ThisError;

///
/// PlanError
///
/// Configuration failures detected before any row is processed.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum PlanError {
    #[error("grouping key {index} references an aggregate function")]
    AggregateInGroupKey { index: usize },

    #[error("grouping key {index} references column {column} but the schema has {width} columns")]
    UnknownKeyColumn {
        index: usize,
        column: usize,
        width: usize,
    },

    #[error("grouping key {index} is not used by any grouping set")]
    UnusedGroupKey { index: usize },

    #[error("aggregate {index} nests another aggregate in its input")]
    NestedAggregate { index: usize },

    #[error("aggregate {index} references column {column} but the schema has {width} columns")]
    UnknownAggregateColumn {
        index: usize,
        column: usize,
        width: usize,
    },

    #[error("aggregate {index} ({kind}) requires an input expression")]
    MissingAggregateInput { index: usize, kind: &'static str },

    #[error("aggregate {index} is COUNT(*) and takes no input expression or DISTINCT")]
    CountStarWithInput { index: usize },

    #[error("HAVING references grouping key {index} but only {key_count} are declared")]
    UnknownHavingKey { index: usize, key_count: usize },

    #[error("HAVING references aggregate {index} but only {aggregate_count} are declared")]
    UnknownHavingAggregate {
        index: usize,
        aggregate_count: usize,
    },

    #[error("GROUPING() requires at least one key column")]
    EmptyGroupingCall,
}

impl PlanError {
    /// Component whose configuration was rejected.
    #[must_use]
    pub const fn origin(&self) -> ErrorOrigin {
        match self {
            Self::AggregateInGroupKey { .. } | Self::UnusedGroupKey { .. } => ErrorOrigin::Grouping,
            Self::UnknownKeyColumn { .. } | Self::UnknownAggregateColumn { .. } => {
                ErrorOrigin::Expr
            }
            Self::NestedAggregate { .. }
            | Self::MissingAggregateInput { .. }
            | Self::CountStarWithInput { .. } => ErrorOrigin::Aggregate,
            Self::UnknownHavingKey { .. }
            | Self::UnknownHavingAggregate { .. }
            | Self::EmptyGroupingCall => ErrorOrigin::Having,
        }
    }
}

///
/// GroupingPlan
///
/// Resolved, validated grouping specification. Construction is the only
/// place configuration errors arise; a built plan never fails on shape.
///

#[derive(Clone, Debug)]
pub struct GroupingPlan {
    schema: Schema,
    extractor: GroupKeyExtractor,
    subsets: Vec<GroupingSubset>,
    aggregates: Vec<AggregateSpec>,
    having: Option<HavingPredicate>,
}

impl GroupingPlan {
    /// Validate and expand one grouping request.
    pub fn new(
        schema: Schema,
        keys: Vec<Expr>,
        grouping: &GroupingSetSpec,
        aggregates: Vec<AggregateSpec>,
        having: Option<HavingPredicate>,
    ) -> Result<Self, EvalError> {
        let extractor = GroupKeyExtractor::new(keys)?;
        for (index, key) in extractor.keys().iter().enumerate() {
            check_columns(key, schema.len(), |column, width| PlanError::UnknownKeyColumn {
                index,
                column,
                width,
            })?;
        }

        let subsets = expand(grouping, extractor.key_count())?;
        if let Some(index) = (0..extractor.key_count())
            .find(|&index| !subsets.iter().any(|subset| subset.contains(index)))
        {
            return Err(PlanError::UnusedGroupKey { index }.into());
        }

        for (index, aggregate) in aggregates.iter().enumerate() {
            validate_aggregate(index, aggregate, schema.len())?;
        }
        if let Some(having) = &having {
            having.validate(extractor.key_count(), aggregates.len())?;
        }

        Ok(Self {
            schema,
            extractor,
            subsets,
            aggregates,
            having,
        })
    }

    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    #[must_use]
    pub fn keys(&self) -> &[Expr] {
        self.extractor.keys()
    }

    #[must_use]
    pub const fn key_count(&self) -> usize {
        self.extractor.key_count()
    }

    /// Expanded grouping subsets in evaluation order.
    #[must_use]
    pub fn subsets(&self) -> &[GroupingSubset] {
        &self.subsets
    }

    #[must_use]
    pub fn aggregates(&self) -> &[AggregateSpec] {
        &self.aggregates
    }

    #[must_use]
    pub const fn having(&self) -> Option<&HavingPredicate> {
        self.having.as_ref()
    }

    pub(crate) const fn extractor(&self) -> &GroupKeyExtractor {
        &self.extractor
    }
}

fn validate_aggregate(
    index: usize,
    aggregate: &AggregateSpec,
    width: usize,
) -> Result<(), PlanError> {
    let kind = aggregate.kind();
    match (kind.requires_input(), aggregate.input()) {
        (false, Some(_)) => return Err(PlanError::CountStarWithInput { index }),
        (false, None) if aggregate.is_distinct() => {
            return Err(PlanError::CountStarWithInput { index });
        }
        (true, None) => {
            return Err(PlanError::MissingAggregateInput {
                index,
                kind: kind.name(),
            });
        }
        _ => {}
    }

    if let Some(input) = aggregate.input() {
        if input.contains_aggregate() {
            return Err(PlanError::NestedAggregate { index });
        }
        check_columns(input, width, |column, width| {
            PlanError::UnknownAggregateColumn {
                index,
                column,
                width,
            }
        })?;
    }

    Ok(())
}

// Report the first column slot at or beyond the schema width.
fn check_columns(
    expr: &Expr,
    width: usize,
    error: impl FnOnce(usize, usize) -> PlanError,
) -> Result<(), PlanError> {
    let mut out_of_range = None;
    expr.for_each_column(&mut |column| {
        if column >= width && out_of_range.is_none() {
            out_of_range = Some(column);
        }
    });

    match out_of_range {
        Some(column) => Err(error(column, width)),
        None => Ok(()),
    }
}
