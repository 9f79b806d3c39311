use crate::{aggregate::AggregateCondition, predicate::Predicate};
use catalog::JoinName;
use serde::Serialize;

/// The compiled form of one filter expression, handed to the query executor
/// and then discarded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledQuery {
    /// The row predicate. `None` when aggregate extraction consumed the
    /// whole filter.
    pub predicate: Option<Predicate>,
    /// Joins to apply, dependency-resolved and in application order.
    pub joins: Vec<JoinName>,
    /// Post-grouping conditions, in the order they appeared in the filter.
    pub aggregates: Vec<AggregateCondition>,
}
