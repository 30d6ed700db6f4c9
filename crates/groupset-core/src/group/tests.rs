use crate::{
    aggregate::AggregateSpec,
    engine::PlanError,
    expr::{Expr, TruncUnit},
    group::{
        GroupKey, GroupKeyExtractor, GroupingSetError, GroupingSetSpec, MAX_GROUPING_SUBSETS,
        expand, group_key_equals,
    },
    row::Row,
    value::{Value, with_test_hash_override},
};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn columns_of(spec: &GroupingSetSpec, key_count: usize) -> Vec<Vec<usize>> {
    expand(spec, key_count)
        .expect("expand")
        .into_iter()
        .map(|subset| subset.columns().to_vec())
        .collect()
}

// ---- expansion ---------------------------------------------------------

#[test]
fn rollup_drops_rightmost_column_down_to_grand_total() {
    assert_eq!(
        columns_of(&GroupingSetSpec::Rollup(vec![0, 1]), 2),
        vec![vec![0, 1], vec![0], vec![]]
    );
}

#[test]
fn cube_lists_every_subset_full_first_and_grand_total_last() {
    assert_eq!(
        columns_of(&GroupingSetSpec::Cube(vec![0, 1]), 2),
        vec![vec![0, 1], vec![0], vec![1], vec![]]
    );
}

#[test]
fn cube_covers_both_rollup_orders_exactly_once() {
    let cube = columns_of(&GroupingSetSpec::Cube(vec![0, 1, 2]), 3);
    let unique = cube.iter().cloned().collect::<BTreeSet<_>>();

    assert_eq!(cube.len(), 8);
    assert_eq!(unique.len(), 8);
    for rollup in [vec![0, 1, 2], vec![2, 1, 0]] {
        for subset in columns_of(&GroupingSetSpec::Rollup(rollup), 3) {
            assert!(unique.contains(&subset), "missing {subset:?}");
        }
    }
}

#[test]
fn explicit_sets_are_verbatim_with_duplicates() {
    let spec = GroupingSetSpec::Sets(vec![vec![1], vec![0], vec![1], vec![]]);

    assert_eq!(columns_of(&spec, 2), vec![vec![1], vec![0], vec![1], vec![]]);
}

#[test]
fn composite_is_the_cross_product_of_its_elements() {
    // GROUP BY a, ROLLUP(b, c)
    let spec = GroupingSetSpec::Composite(vec![
        GroupingSetSpec::Simple(vec![0]),
        GroupingSetSpec::Rollup(vec![1, 2]),
    ]);

    assert_eq!(
        columns_of(&spec, 3),
        vec![vec![0, 1, 2], vec![0, 1], vec![0]]
    );
}

#[test]
fn subset_columns_are_sorted_and_deduplicated() {
    let spec = GroupingSetSpec::Sets(vec![vec![2, 0, 2]]);

    assert_eq!(columns_of(&spec, 3), vec![vec![0, 2]]);
}

#[test]
fn grouping_mask_sets_a_bit_per_absent_key_column() {
    let subsets = expand(&GroupingSetSpec::Rollup(vec![0, 1, 2]), 3).expect("expand");
    let masks = subsets
        .iter()
        .map(|subset| subset.grouping_mask())
        .collect::<Vec<_>>();

    assert_eq!(masks, vec![0b000, 0b100, 0b110, 0b111]);
    assert!(subsets[3].is_grand_total());
    assert!(subsets[1].contains(1));
    assert!(!subsets[1].contains(2));
}

#[test]
fn explicit_grand_total_is_not_an_empty_spec() {
    assert_eq!(columns_of(&GroupingSetSpec::grand_total(), 0), vec![Vec::<usize>::new()]);
    assert_eq!(
        columns_of(&GroupingSetSpec::Sets(vec![vec![]]), 0),
        vec![Vec::<usize>::new()]
    );
}

#[test]
fn empty_column_lists_are_rejected() {
    for spec in [
        GroupingSetSpec::Rollup(vec![]),
        GroupingSetSpec::Cube(vec![]),
        GroupingSetSpec::Sets(vec![]),
        GroupingSetSpec::Composite(vec![]),
    ] {
        assert_eq!(expand(&spec, 2), Err(GroupingSetError::EmptySpec), "{spec:?}");
    }
}

#[test]
fn out_of_range_columns_are_rejected() {
    assert_eq!(
        expand(&GroupingSetSpec::Rollup(vec![0, 3]), 2),
        Err(GroupingSetError::ColumnOutOfRange {
            column: 3,
            key_count: 2
        })
    );
}

#[test]
fn oversized_cube_is_rejected() {
    let columns = (0..13).collect::<Vec<_>>();

    assert_eq!(
        expand(&GroupingSetSpec::Cube(columns), 13),
        Err(GroupingSetError::TooManySubsets {
            limit: MAX_GROUPING_SUBSETS
        })
    );
}

#[test]
fn too_many_key_columns_are_rejected() {
    assert!(matches!(
        expand(&GroupingSetSpec::grand_total(), 65),
        Err(GroupingSetError::TooManyColumns { count: 65, .. })
    ));
}

proptest! {
    #[test]
    fn rollup_yields_n_plus_one_prefixes(n in 1usize..10) {
        let columns = (0..n).collect::<Vec<_>>();
        let expanded = columns_of(&GroupingSetSpec::Rollup(columns.clone()), n);

        prop_assert_eq!(expanded.len(), n + 1);
        for (dropped, subset) in expanded.iter().enumerate() {
            prop_assert_eq!(subset.as_slice(), &columns[..n - dropped]);
        }
    }

    #[test]
    fn cube_yields_each_subset_once(n in 1usize..8) {
        let expanded = columns_of(&GroupingSetSpec::Cube((0..n).collect()), n);
        let unique = expanded.iter().cloned().collect::<BTreeSet<_>>();

        prop_assert_eq!(expanded.len(), 1 << n);
        prop_assert_eq!(unique.len(), 1 << n);
        prop_assert_eq!(expanded.last().map(Vec::len), Some(0));
    }
}

// ---- key extraction ----------------------------------------------------

#[test]
fn extractor_rejects_aggregate_keys() {
    let keys = vec![
        Expr::column(0),
        Expr::Aggregate(Box::new(AggregateSpec::sum(Expr::column(1)))),
    ];

    assert_eq!(
        GroupKeyExtractor::new(keys).expect_err("aggregate key").to_string(),
        PlanError::AggregateInGroupKey { index: 1 }.to_string()
    );
}

#[test]
fn extractor_evaluates_derived_keys_and_projects_subsets() {
    // region, DATE_TRUNC(day, sold_at)
    let extractor = GroupKeyExtractor::new(vec![
        Expr::column(0),
        Expr::date_trunc(TruncUnit::Day, Expr::column(1)),
    ])
    .expect("extractor");
    let row = Row::new(vec![Value::text("North"), Value::timestamp(1_710_510_330)]);
    let subsets = expand(&GroupingSetSpec::Rollup(vec![0, 1]), 2).expect("expand");

    let evaluated = extractor.evaluate(&row).expect("evaluate");
    let projected = GroupKeyExtractor::project(&evaluated, &subsets[1]);

    assert_eq!(
        evaluated,
        vec![Value::text("North"), Value::timestamp(1_710_460_800)]
    );
    assert_eq!(projected.values(), &[Value::text("North")]);
    assert_eq!(
        extractor.extract(&row, &subsets[1]).expect("extract"),
        projected
    );
}

#[test]
fn null_key_components_group_together() {
    let left = GroupKey::new(vec![Value::Null, Value::text("Laptop")]);
    let right = GroupKey::new(vec![Value::Null, Value::text("Laptop")]);

    assert_eq!(left.hash(), right.hash());
    assert!(group_key_equals(&left, &right));
}

#[test]
fn numerically_equal_keys_group_together() {
    let left = GroupKey::new(vec![Value::Integer(1)]);
    let right = GroupKey::new(vec![Value::decimal(100, 2)]);

    assert_eq!(left.hash(), right.hash());
    assert!(group_key_equals(&left, &right));
}

#[test]
fn colliding_hashes_do_not_merge_distinct_keys() {
    let (left, right) = with_test_hash_override(42, || {
        (
            GroupKey::new(vec![Value::text("North")]),
            GroupKey::new(vec![Value::text("South")]),
        )
    });

    assert_eq!(left.hash(), right.hash());
    assert!(!group_key_equals(&left, &right));
}
