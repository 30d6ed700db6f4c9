use crate::MAX_GROUPING_COLUMNS;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

/// Upper bound on expanded grouping subsets for one plan.
pub const MAX_GROUPING_SUBSETS: usize = 4_096;

///
/// GroupingSetError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum GroupingSetError {
    #[error("grouping set specification has no columns and no explicit grand total")]
    EmptySpec,

    #[error("grouping set references key column {column} but only {key_count} key expressions are declared")]
    ColumnOutOfRange { column: usize, key_count: usize },

    #[error("grouping declares {count} key columns; at most {max} are supported")]
    TooManyColumns { count: usize, max: usize },

    #[error("grouping set expansion produces more than {limit} subsets")]
    TooManySubsets { limit: usize },
}

///
/// GroupingSetSpec
///
/// Resolved `GROUP BY` element over key-column indices.
///
/// `Simple(vec![])` is the explicit grand total `()`. `Composite` is the SQL
/// cross product of several elements, as in `GROUP BY a, ROLLUP(b, c)`.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum GroupingSetSpec {
    Simple(Vec<usize>),
    Rollup(Vec<usize>),
    Cube(Vec<usize>),
    Sets(Vec<Vec<usize>>),
    Composite(Vec<Self>),
}

impl GroupingSetSpec {
    /// `GROUP BY ()`.
    #[must_use]
    pub const fn grand_total() -> Self {
        Self::Simple(Vec::new())
    }

    // Expand to raw column lists in declaration order.
    fn expand_columns(&self) -> Result<Vec<Vec<usize>>, GroupingSetError> {
        match self {
            Self::Simple(columns) => Ok(vec![columns.clone()]),
            Self::Rollup(columns) => {
                if columns.is_empty() {
                    return Err(GroupingSetError::EmptySpec);
                }

                Ok((0..=columns.len())
                    .rev()
                    .map(|len| columns[..len].to_vec())
                    .collect())
            }
            Self::Cube(columns) => expand_cube(columns),
            Self::Sets(sets) => {
                if sets.is_empty() {
                    return Err(GroupingSetError::EmptySpec);
                }

                Ok(sets.clone())
            }
            Self::Composite(elements) => {
                if elements.is_empty() {
                    return Err(GroupingSetError::EmptySpec);
                }

                let mut product = vec![Vec::new()];
                for element in elements {
                    let expanded = element.expand_columns()?;
                    if product.len().saturating_mul(expanded.len()) > MAX_GROUPING_SUBSETS {
                        return Err(GroupingSetError::TooManySubsets {
                            limit: MAX_GROUPING_SUBSETS,
                        });
                    }

                    product = product
                        .iter()
                        .flat_map(|left| {
                            expanded.iter().map(move |right| {
                                let mut combined = left.clone();
                                combined.extend_from_slice(right);
                                combined
                            })
                        })
                        .collect();
                }

                Ok(product)
            }
        }
    }
}

// CUBE enumerates every subset in descending bitmask order with the first
// column as the most significant bit: full set first, `()` last.
fn expand_cube(columns: &[usize]) -> Result<Vec<Vec<usize>>, GroupingSetError> {
    let n = columns.len();
    if n == 0 {
        return Err(GroupingSetError::EmptySpec);
    }
    if n >= usize::BITS as usize || (1usize << n) > MAX_GROUPING_SUBSETS {
        return Err(GroupingSetError::TooManySubsets {
            limit: MAX_GROUPING_SUBSETS,
        });
    }

    Ok((0..1usize << n)
        .rev()
        .map(|mask| {
            columns
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << (n - 1 - i)) != 0)
                .map(|(_, &column)| column)
                .collect()
        })
        .collect())
}

///
/// GroupingSubset
///
/// One expanded grouping set: the key columns it groups by (sorted, unique)
/// and its `GROUPING()` mask, where bit `i` is set when key column `i` is
/// absent and therefore rendered as `Null`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GroupingSubset {
    columns: Vec<usize>,
    grouping_mask: u64,
}

impl GroupingSubset {
    fn new(mut columns: Vec<usize>, key_count: usize) -> Self {
        columns.sort_unstable();
        columns.dedup();

        let grouping_mask = (0..key_count)
            .filter(|column| columns.binary_search(column).is_err())
            .fold(0u64, |mask, column| mask | (1u64 << column));

        Self {
            columns,
            grouping_mask,
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    #[must_use]
    pub const fn grouping_mask(&self) -> u64 {
        self.grouping_mask
    }

    /// Return true when this subset groups by key column `column`.
    #[must_use]
    pub fn contains(&self, column: usize) -> bool {
        self.columns.binary_search(&column).is_ok()
    }

    #[must_use]
    pub const fn is_grand_total(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Expand one grouping specification into the flat, ordered subset arena.
///
/// ROLLUP drops columns from the right, CUBE yields all `2^n` subsets in
/// descending bitmask order, and explicit sets are kept verbatim with
/// duplicates preserved. Every column index must be below `key_count`.
pub fn expand(
    spec: &GroupingSetSpec,
    key_count: usize,
) -> Result<Vec<GroupingSubset>, GroupingSetError> {
    if key_count > MAX_GROUPING_COLUMNS {
        return Err(GroupingSetError::TooManyColumns {
            count: key_count,
            max: MAX_GROUPING_COLUMNS,
        });
    }

    let expanded = spec.expand_columns()?;
    if expanded.len() > MAX_GROUPING_SUBSETS {
        return Err(GroupingSetError::TooManySubsets {
            limit: MAX_GROUPING_SUBSETS,
        });
    }
    if let Some(&column) = expanded.iter().flatten().find(|&&column| column >= key_count) {
        return Err(GroupingSetError::ColumnOutOfRange { column, key_count });
    }

    Ok(expanded
        .into_iter()
        .map(|columns| GroupingSubset::new(columns, key_count))
        .collect())
}
