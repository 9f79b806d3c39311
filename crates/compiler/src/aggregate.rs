//! Post-aggregation ("HAVING"-style) conditions extracted from the filter.

use catalog::{AggregateFunction, AggregateSpec};
use model::{core::value::Value, filter::ast::CompareOp};
use serde::Serialize;
use std::fmt;

/// An aggregate column reference flowing through compilation. Comparisons
/// against it compile to an [`AggregateCondition`] instead of a predicate.
#[derive(Debug, Clone, Copy)]
pub struct AggregateRef {
    pub column: &'static str,
    pub spec: AggregateSpec,
}

/// A condition on an aggregate over a related table, evaluated by the
/// executor after grouping. Always normalized to `column OP value`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateCondition {
    pub column: String,
    pub table: String,
    pub function: AggregateFunction,
    pub source_column: Option<String>,
    pub op: CompareOp,
    pub value: Value,
}

impl AggregateCondition {
    /// Build the normalized condition for `aggregate OP value`. Callers with
    /// the aggregate on the right pass the reversed operator.
    pub fn new(aggregate: &AggregateRef, op: CompareOp, value: Value) -> Self {
        AggregateCondition {
            column: aggregate.column.to_string(),
            table: aggregate.spec.table.to_string(),
            function: aggregate.spec.function,
            source_column: aggregate.spec.source_column.map(|c| c.to_string()),
            op,
            value,
        }
    }
}

impl fmt::Display for AggregateCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.column, self.op, self.value)
    }
}
