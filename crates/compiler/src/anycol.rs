//! Expansion of the `any_column` wildcard.
//!
//! The wildcard stands for "everything a human would plausibly grep for": the
//! curated text-column search list plus a text cast of the primary
//! identifier, so `any_column = '42'` also matches visit 42 by id.

use crate::{
    error::CompileError,
    predicate::{CastTarget, Operand, Predicate},
};
use catalog::{ANY_COLUMN_SEARCH, Catalog, ColumnKind, JoinName};
use model::{core::value::Value, filter::ast::CompareOp};
use std::collections::HashSet;

/// The operands the wildcard searches, accumulating their joins.
fn search_operands(
    catalog: &Catalog,
    joins: &mut HashSet<JoinName>,
) -> Result<Vec<Operand>, CompileError> {
    let mut operands = Vec::with_capacity(ANY_COLUMN_SEARCH.len() + 1);

    for name in ANY_COLUMN_SEARCH {
        let descriptor = catalog.lookup(name)?;
        joins.extend(descriptor.required_joins.iter().copied());
        match descriptor.kind {
            ColumnKind::Plain(site) => operands.push(Operand::Column(site)),
            // The search list is fixed to plain text columns.
            _ => unreachable!("search list entry `{name}` is not a plain column"),
        }
    }

    let id = catalog.lookup("visit_id")?;
    if let ColumnKind::Plain(site) = id.kind {
        operands.push(Operand::Cast {
            arg: Box::new(Operand::Column(site)),
            target: CastTarget::Text,
        });
    }

    Ok(operands)
}

/// `any_column = value` as an OR of per-column equality.
pub fn expand_equals(
    catalog: &Catalog,
    joins: &mut HashSet<JoinName>,
    value: &Value,
) -> Result<Predicate, CompileError> {
    let branches = search_operands(catalog, joins)?
        .into_iter()
        .map(|operand| Predicate::Compare {
            left: operand,
            op: CompareOp::Equal,
            right: Operand::Value(value.clone()),
        })
        .collect();
    Ok(Predicate::Or(branches))
}

/// `any_column LIKE pattern` as an OR of case-insensitive matches.
///
/// A negated match wraps the whole OR in the NULL-safe NOT rather than
/// negating each branch: "no column matches" has to treat columns that are
/// NULL as non-matching, which per-branch negation would get wrong.
pub fn expand_match(
    catalog: &Catalog,
    joins: &mut HashSet<JoinName>,
    pattern: &str,
    negate: bool,
) -> Result<Predicate, CompileError> {
    let branches = search_operands(catalog, joins)?
        .into_iter()
        .map(|operand| Predicate::Match {
            arg: operand,
            pattern: pattern.to_string(),
            case_insensitive: true,
        })
        .collect();

    let matched = Predicate::Or(branches);
    Ok(if negate {
        matched.null_safe_not()
    } else {
        matched
    })
}
