//! The recursive filter-expression compiler.

use crate::{
    aggregate::{AggregateCondition, AggregateRef},
    anycol,
    error::CompileError,
    predicate::{CastTarget, Operand, Predicate},
    query::CompiledQuery,
};
use catalog::{Catalog, ColumnKind, JoinName, PhysicalColumn, resolve_joins};
use model::{
    core::value::Value,
    filter::ast::{CompareOp, FilterNode},
};
use std::collections::HashSet;
use tracing::debug;

/// Compile one filter expression against the column catalog.
///
/// Compilation is pure and synchronous: the catalog is read-only shared
/// state, all working state lives in this call, and the first error aborts.
pub fn compile(catalog: &Catalog, filter: &FilterNode) -> Result<CompiledQuery, CompileError> {
    let mut compiler = QueryCompiler::new(catalog);
    let outcome = compiler.compile_boolean(filter)?;
    let joins = resolve_joins(&compiler.joins);

    debug!(
        joins = joins.len(),
        aggregates = outcome.aggregates.len(),
        has_predicate = outcome.predicate.is_some(),
        "filter compiled"
    );

    Ok(CompiledQuery {
        predicate: outcome.predicate,
        joins,
        aggregates: outcome.aggregates,
    })
}

/// What one AST node compiles to.
enum Compiled {
    Value(Value),
    Operand(Operand),
    /// The key-value header column, before key access.
    Header(PhysicalColumn),
    /// The wildcard column marker.
    AnyColumn,
    /// An aggregate column marker; comparisons specialize on it.
    Aggregate(AggregateRef),
    Predicate(Predicate),
}

/// A compiled boolean position: a row predicate and any aggregate conditions
/// hoisted out of it. AND concatenates both; OR and NOT require the
/// aggregate list to be empty.
struct BoolOutcome {
    predicate: Option<Predicate>,
    aggregates: Vec<AggregateCondition>,
}

impl BoolOutcome {
    fn from_predicate(predicate: Predicate) -> Self {
        BoolOutcome {
            predicate: Some(predicate),
            aggregates: Vec::new(),
        }
    }

    fn from_aggregate(condition: AggregateCondition) -> Self {
        BoolOutcome {
            predicate: None,
            aggregates: vec![condition],
        }
    }
}

struct QueryCompiler<'a> {
    catalog: &'a Catalog,
    joins: HashSet<JoinName>,
}

impl<'a> QueryCompiler<'a> {
    fn new(catalog: &'a Catalog) -> Self {
        QueryCompiler {
            catalog,
            joins: HashSet::new(),
        }
    }

    /// Compile a node that sits in boolean position.
    fn compile_boolean(&mut self, node: &FilterNode) -> Result<BoolOutcome, CompileError> {
        match node {
            FilterNode::And(args) => {
                let mut predicates = Vec::new();
                let mut aggregates = Vec::new();
                for arg in args {
                    let outcome = self.compile_boolean(arg)?;
                    if let Some(predicate) = outcome.predicate {
                        predicates.push(predicate);
                    }
                    aggregates.extend(outcome.aggregates);
                }
                Ok(BoolOutcome {
                    predicate: Predicate::and(predicates),
                    aggregates,
                })
            }

            FilterNode::Or(args) => {
                let mut predicates = Vec::new();
                for arg in args {
                    let outcome = self.compile_boolean(arg)?;
                    // Aggregate conditions run after grouping; OR over a
                    // per-row predicate and a post-grouping condition would
                    // change the shape of the query.
                    if let Some(condition) = outcome.aggregates.first() {
                        return Err(CompileError::AggregateInIllegalPosition(
                            condition.column.clone(),
                        ));
                    }
                    if let Some(predicate) = outcome.predicate {
                        predicates.push(predicate);
                    }
                }
                Ok(BoolOutcome {
                    predicate: Predicate::or(predicates),
                    aggregates: Vec::new(),
                })
            }

            FilterNode::Not(arg) => {
                let outcome = self.compile_boolean(arg)?;
                if let Some(condition) = outcome.aggregates.first() {
                    return Err(CompileError::AggregateInIllegalPosition(
                        condition.column.clone(),
                    ));
                }
                let predicate = outcome.predicate.ok_or_else(|| {
                    CompileError::unsupported_operator("NOT", "an empty expression")
                })?;
                Ok(BoolOutcome::from_predicate(predicate.null_safe_not()))
            }

            FilterNode::Comparison { op, left, right } => {
                self.compile_comparison(*op, left, right)
            }

            FilterNode::NullTest { arg, is_null } => {
                let operand = self.comparable_operand(arg, "IS NULL")?;
                Ok(BoolOutcome::from_predicate(Predicate::IsNull {
                    arg: operand,
                    negated: !is_null,
                }))
            }

            FilterNode::Between { arg, low, high } => {
                let operand = self.comparable_operand(arg, "BETWEEN")?;
                let low = self.comparable_operand(low, "BETWEEN")?;
                let high = self.comparable_operand(high, "BETWEEN")?;
                // Inclusive on both ends.
                Ok(BoolOutcome::from_predicate(Predicate::And(vec![
                    Predicate::Compare {
                        left: operand.clone(),
                        op: CompareOp::GreaterOrEqual,
                        right: low,
                    },
                    Predicate::Compare {
                        left: operand,
                        op: CompareOp::LessOrEqual,
                        right: high,
                    },
                ])))
            }

            FilterNode::PatternMatch {
                arg,
                pattern,
                case_sensitive,
                negate,
            } => self.compile_pattern_match(arg, pattern, *case_sensitive, *negate),

            FilterNode::Column(_)
            | FilterNode::Constant(_)
            | FilterNode::Indirection { .. }
            | FilterNode::Cast { .. } => match self.compile_term(node)? {
                Compiled::Predicate(predicate) => Ok(BoolOutcome::from_predicate(predicate)),
                Compiled::Aggregate(aggregate) => Err(
                    CompileError::AggregateInIllegalPosition(aggregate.column.to_string()),
                ),
                Compiled::Value(_) => Err(CompileError::unsupported_operator(
                    "WHERE",
                    "a bare literal",
                )),
                Compiled::Operand(_) | Compiled::Header(_) => Err(
                    CompileError::unsupported_operator("WHERE", "a non-boolean column"),
                ),
                Compiled::AnyColumn => Err(CompileError::unsupported_operator(
                    "WHERE",
                    "the wildcard column `any_column`",
                )),
            },
        }
    }

    fn compile_comparison(
        &mut self,
        op: CompareOp,
        left: &FilterNode,
        right: &FilterNode,
    ) -> Result<BoolOutcome, CompileError> {
        let left = self.compile_term(left)?;
        let right = self.compile_term(right)?;

        match (left, right) {
            (Compiled::AnyColumn, Compiled::Value(value))
            | (Compiled::Value(value), Compiled::AnyColumn) => {
                if op == CompareOp::Equal {
                    let predicate =
                        anycol::expand_equals(self.catalog, &mut self.joins, &value)?;
                    Ok(BoolOutcome::from_predicate(predicate))
                } else {
                    Err(CompileError::unsupported_operator(
                        op.to_string(),
                        "the wildcard column `any_column`",
                    ))
                }
            }
            (Compiled::AnyColumn, _) | (_, Compiled::AnyColumn) => {
                Err(CompileError::unsupported_operator(
                    op.to_string(),
                    "`any_column` compared to a non-literal",
                ))
            }

            // Comparisons against aggregates leave the predicate tree and
            // become post-grouping conditions, normalized to `column OP
            // value` (operator reversed when the aggregate is on the right).
            (Compiled::Aggregate(aggregate), Compiled::Value(value)) => Ok(
                BoolOutcome::from_aggregate(AggregateCondition::new(&aggregate, op, value)),
            ),
            (Compiled::Value(value), Compiled::Aggregate(aggregate)) => {
                Ok(BoolOutcome::from_aggregate(AggregateCondition::new(
                    &aggregate,
                    op.reversed(),
                    value,
                )))
            }
            (Compiled::Aggregate(aggregate), _) | (_, Compiled::Aggregate(aggregate)) => Err(
                CompileError::AggregateComparedToNonLiteral(aggregate.column.to_string()),
            ),

            (Compiled::Predicate(_), _) | (_, Compiled::Predicate(_)) => Err(
                CompileError::unsupported_operator(op.to_string(), "a boolean expression"),
            ),
            (Compiled::Header(_), _) | (_, Compiled::Header(_)) => {
                Err(CompileError::unsupported_operator(
                    op.to_string(),
                    "a header column without a key",
                ))
            }

            (left, right) => Ok(BoolOutcome::from_predicate(Predicate::Compare {
                left: to_operand(left),
                op,
                right: to_operand(right),
            })),
        }
    }

    fn compile_pattern_match(
        &mut self,
        arg: &FilterNode,
        pattern: &FilterNode,
        case_sensitive: bool,
        negate: bool,
    ) -> Result<BoolOutcome, CompileError> {
        let pattern = match self.compile_term(pattern)? {
            Compiled::Value(value) => value
                .as_str()
                .map(str::to_string)
                .ok_or(CompileError::PatternNotAString)?,
            _ => return Err(CompileError::PatternNotAString),
        };

        match self.compile_term(arg)? {
            Compiled::AnyColumn => {
                let predicate =
                    anycol::expand_match(self.catalog, &mut self.joins, &pattern, negate)?;
                Ok(BoolOutcome::from_predicate(predicate))
            }
            Compiled::Operand(operand) => {
                let matched = Predicate::Match {
                    arg: operand,
                    pattern,
                    case_insensitive: !case_sensitive,
                };
                Ok(BoolOutcome::from_predicate(if negate {
                    matched.null_safe_not()
                } else {
                    matched
                }))
            }
            Compiled::Value(value) => {
                let matched = Predicate::Match {
                    arg: Operand::Value(value),
                    pattern,
                    case_insensitive: !case_sensitive,
                };
                Ok(BoolOutcome::from_predicate(if negate {
                    matched.null_safe_not()
                } else {
                    matched
                }))
            }
            Compiled::Aggregate(aggregate) => Err(CompileError::unsupported_operator(
                "LIKE",
                format!("aggregate column `{}`", aggregate.column),
            )),
            Compiled::Header(_) => Err(CompileError::unsupported_operator(
                "LIKE",
                "a header column without a key",
            )),
            Compiled::Predicate(_) => Err(CompileError::unsupported_operator(
                "LIKE",
                "a boolean expression",
            )),
        }
    }

    /// Compile a node that sits in operand position.
    fn compile_term(&mut self, node: &FilterNode) -> Result<Compiled, CompileError> {
        match node {
            FilterNode::Constant(value) => Ok(Compiled::Value(value.clone())),

            FilterNode::Column(name) => {
                let descriptor = self.catalog.lookup(name)?;
                self.joins.extend(descriptor.required_joins.iter().copied());
                Ok(match descriptor.kind {
                    ColumnKind::Plain(site) => Compiled::Operand(Operand::Column(site)),
                    ColumnKind::MarkerNotNull(site) => Compiled::Predicate(Predicate::IsNull {
                        arg: Operand::Column(site),
                        negated: true,
                    }),
                    ColumnKind::Header(site) => Compiled::Header(site),
                    ColumnKind::AnyColumn => Compiled::AnyColumn,
                    ColumnKind::Aggregate(spec) => Compiled::Aggregate(AggregateRef {
                        column: descriptor.name,
                        spec,
                    }),
                })
            }

            FilterNode::Indirection { arg, key } => {
                let key = match self.compile_term(key)? {
                    Compiled::Value(value) => value
                        .as_str()
                        .map(str::to_string)
                        .ok_or(CompileError::NonLiteralMapKey)?,
                    _ => return Err(CompileError::NonLiteralMapKey),
                };
                match self.compile_term(arg)? {
                    Compiled::Header(site) => {
                        Ok(Compiled::Operand(Operand::HeaderValue { site, key }))
                    }
                    _ => {
                        let target = match arg.as_ref() {
                            FilterNode::Column(name) => name.clone(),
                            _ => "expression".to_string(),
                        };
                        Err(CompileError::InvalidIndirectionTarget(target))
                    }
                }
            }

            FilterNode::Cast { arg, target } => {
                let target = CastTarget::parse(target)?;
                match self.compile_term(arg)? {
                    Compiled::Operand(operand) => Ok(Compiled::Operand(Operand::Cast {
                        arg: Box::new(operand),
                        target,
                    })),
                    Compiled::Value(value) => Ok(Compiled::Operand(Operand::Cast {
                        arg: Box::new(Operand::Value(value)),
                        target,
                    })),
                    Compiled::AnyColumn => Err(CompileError::unsupported_operator(
                        "cast",
                        "the wildcard column `any_column`",
                    )),
                    Compiled::Aggregate(aggregate) => Err(CompileError::unsupported_operator(
                        "cast",
                        format!("aggregate column `{}`", aggregate.column),
                    )),
                    Compiled::Header(_) => Err(CompileError::unsupported_operator(
                        "cast",
                        "a header column without a key",
                    )),
                    Compiled::Predicate(_) => Err(CompileError::unsupported_operator(
                        "cast",
                        "a boolean expression",
                    )),
                }
            }

            // Boolean node kinds used as a term compile through the boolean
            // path; a nested boolean may not carry aggregate conditions.
            FilterNode::Comparison { .. }
            | FilterNode::And(_)
            | FilterNode::Or(_)
            | FilterNode::Not(_)
            | FilterNode::NullTest { .. }
            | FilterNode::Between { .. }
            | FilterNode::PatternMatch { .. } => {
                let outcome = self.compile_boolean(node)?;
                if let Some(condition) = outcome.aggregates.first() {
                    return Err(CompileError::AggregateInIllegalPosition(
                        condition.column.clone(),
                    ));
                }
                let predicate = outcome.predicate.ok_or_else(|| {
                    CompileError::unsupported_operator("WHERE", "an empty expression")
                })?;
                Ok(Compiled::Predicate(predicate))
            }
        }
    }

    /// Compile a node that must become a plain comparable operand.
    fn comparable_operand(
        &mut self,
        node: &FilterNode,
        context: &str,
    ) -> Result<Operand, CompileError> {
        match self.compile_term(node)? {
            Compiled::Value(value) => Ok(Operand::Value(value)),
            Compiled::Operand(operand) => Ok(operand),
            Compiled::AnyColumn => Err(CompileError::unsupported_operator(
                context,
                "the wildcard column `any_column`",
            )),
            Compiled::Aggregate(aggregate) => Err(CompileError::unsupported_operator(
                context,
                format!("aggregate column `{}`", aggregate.column),
            )),
            Compiled::Header(_) => Err(CompileError::unsupported_operator(
                context,
                "a header column without a key",
            )),
            Compiled::Predicate(_) => Err(CompileError::unsupported_operator(
                context,
                "a boolean expression",
            )),
        }
    }
}

fn to_operand(compiled: Compiled) -> Operand {
    match compiled {
        Compiled::Value(value) => Operand::Value(value),
        Compiled::Operand(operand) => operand,
        // Every other kind is rejected before reaching here.
        Compiled::Header(_)
        | Compiled::AnyColumn
        | Compiled::Aggregate(_)
        | Compiled::Predicate(_) => unreachable!("non-comparable operand"),
    }
}
