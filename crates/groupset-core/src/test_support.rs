//! Shared fixtures for unit tests: the four-row sales table used throughout.

use crate::{
    aggregate::AggregateSpec,
    config::EvalConfig,
    engine::{Evaluator, GroupingPlan, ResultRow},
    expr::Expr,
    group::GroupingSetSpec,
    having::HavingPredicate,
    row::{ColumnDef, Row, Schema},
    value::{Value, ValueType},
};

pub(crate) const REGION: usize = 0;
pub(crate) const PRODUCT: usize = 1;
pub(crate) const REVENUE: usize = 2;

pub(crate) fn sales_schema() -> Schema {
    Schema::new(vec![
        ColumnDef::new("region", ValueType::Text),
        ColumnDef::new("product", ValueType::Text),
        ColumnDef::new("revenue", ValueType::Integer),
    ])
}

pub(crate) fn sale(region: Option<&str>, product: &str, revenue: Option<i64>) -> Row {
    Row::new(vec![
        Value::from(region),
        Value::text(product),
        Value::from(revenue),
    ])
}

/// (North, Laptop, 1000), (South, Phone, 500), (North, Phone, 600), (South, Laptop, 1200)
pub(crate) fn sales_rows() -> Vec<Row> {
    vec![
        sale(Some("North"), "Laptop", Some(1000)),
        sale(Some("South"), "Phone", Some(500)),
        sale(Some("North"), "Phone", Some(600)),
        sale(Some("South"), "Laptop", Some(1200)),
    ]
}

/// Keys `[region, product]` with `SUM(revenue)` and `COUNT(*)`.
pub(crate) fn sales_plan(
    grouping: &GroupingSetSpec,
    having: Option<HavingPredicate>,
) -> GroupingPlan {
    GroupingPlan::new(
        sales_schema(),
        vec![Expr::column(REGION), Expr::column(PRODUCT)],
        grouping,
        vec![
            AggregateSpec::sum(Expr::column(REVENUE)),
            AggregateSpec::count_star(),
        ],
        having,
    )
    .expect("sales plan")
}

pub(crate) fn sales_evaluator(grouping: &GroupingSetSpec) -> Evaluator {
    Evaluator::new(sales_plan(grouping, None), EvalConfig::default())
}

pub(crate) fn result_row(keys: Vec<Value>, grouping_mask: u64, aggregates: Vec<Value>) -> ResultRow {
    ResultRow::new(0, keys, grouping_mask, aggregates)
}
