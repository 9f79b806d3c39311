use super::helpers::{compile_err, compile_ok};
use crate::{
    error::CompileError,
    predicate::{CastTarget, Operand, Predicate},
};
use catalog::{ANY_COLUMN_SEARCH, Catalog, JoinName, PhysicalColumn, resolve_joins};
use model::{
    core::value::Value,
    filter::{
        ast::{CompareOp, FilterNode},
        column, int, string,
    },
};
use std::collections::HashSet;

#[test]
fn test_equality_expands_over_the_search_list() {
    let query = compile_ok(FilterNode::compare(
        CompareOp::Equal,
        column("any_column"),
        string("42"),
    ));

    let branches = match query.predicate {
        Some(Predicate::Or(branches)) => branches,
        other => panic!("expected OR expansion, got {other:?}"),
    };
    // One branch per searched column, plus the id-as-text branch.
    assert_eq!(branches.len(), ANY_COLUMN_SEARCH.len() + 1);

    for branch in &branches[..ANY_COLUMN_SEARCH.len()] {
        assert!(matches!(
            branch,
            Predicate::Compare {
                left: Operand::Column(_),
                op: CompareOp::Equal,
                ..
            }
        ));
    }
    assert_eq!(
        branches[ANY_COLUMN_SEARCH.len()],
        Predicate::Compare {
            left: Operand::Cast {
                arg: Box::new(Operand::Column(PhysicalColumn::root("visit_id"))),
                target: CastTarget::Text,
            },
            op: CompareOp::Equal,
            right: Operand::Value(Value::String("42".to_string())),
        }
    );
}

#[test]
fn test_expansion_joins_match_the_catalog_union() {
    let query = compile_ok(FilterNode::compare(
        CompareOp::Equal,
        column("any_column"),
        string("x"),
    ));

    let catalog = Catalog::standard();
    let declared: HashSet<JoinName> = catalog
        .lookup("any_column")
        .unwrap()
        .required_joins
        .iter()
        .copied()
        .collect();
    assert_eq!(query.joins, resolve_joins(&declared));
}

#[test]
fn test_wildcard_on_either_side() {
    let left = compile_ok(FilterNode::compare(
        CompareOp::Equal,
        column("any_column"),
        string("x"),
    ));
    let right = compile_ok(FilterNode::compare(
        CompareOp::Equal,
        string("x"),
        column("any_column"),
    ));
    assert_eq!(left, right);
}

#[test]
fn test_ordering_operators_are_rejected() {
    let err = compile_err(FilterNode::compare(
        CompareOp::GreaterThan,
        column("any_column"),
        string("x"),
    ));
    assert!(matches!(err, CompileError::UnsupportedOperator { .. }));
}

#[test]
fn test_wildcard_compared_to_column_is_rejected() {
    let err = compile_err(FilterNode::compare(
        CompareOp::Equal,
        column("any_column"),
        column("description"),
    ));
    assert!(matches!(err, CompileError::UnsupportedOperator { .. }));
}

#[test]
fn test_pattern_match_expands_case_insensitively() {
    // Wildcard pattern search is case-insensitive even for LIKE.
    let query = compile_ok(FilterNode::PatternMatch {
        arg: Box::new(column("any_column")),
        pattern: Box::new(string("%dither%")),
        case_sensitive: true,
        negate: false,
    });

    let branches = match query.predicate {
        Some(Predicate::Or(branches)) => branches,
        other => panic!("expected OR expansion, got {other:?}"),
    };
    assert!(branches.iter().all(|branch| matches!(
        branch,
        Predicate::Match {
            case_insensitive: true,
            ..
        }
    )));
}

#[test]
fn test_negated_pattern_wraps_the_whole_expansion() {
    let query = compile_ok(FilterNode::PatternMatch {
        arg: Box::new(column("any_column")),
        pattern: Box::new(string("%x%")),
        case_sensitive: false,
        negate: true,
    });

    // `NOT (b1 OR b2 ...) OR (...) IS NULL`, never per-branch negation.
    match query.predicate {
        Some(Predicate::Or(parts)) => {
            assert_eq!(parts.len(), 2);
            match (&parts[0], &parts[1]) {
                (Predicate::Not(inner), Predicate::IsUnknown(unknown)) => {
                    assert!(matches!(inner.as_ref(), Predicate::Or(_)));
                    assert_eq!(inner, unknown);
                }
                other => panic!("expected NULL-safe NOT, got {other:?}"),
            }
        }
        other => panic!("expected NULL-safe NOT, got {other:?}"),
    }
}

#[test]
fn test_wildcard_between_is_rejected() {
    let err = compile_err(FilterNode::Between {
        arg: Box::new(column("any_column")),
        low: Box::new(int(1)),
        high: Box::new(int(2)),
    });
    assert!(matches!(err, CompileError::UnsupportedOperator { .. }));
}
