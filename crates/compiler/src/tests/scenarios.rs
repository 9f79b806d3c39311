use super::helpers::{compile_err, compile_ok};
use crate::{
    error::CompileError,
    predicate::{CastTarget, Operand, Predicate},
};
use catalog::{CatalogError, JoinName, PhysicalColumn};
use model::{
    core::value::Value,
    filter::{
        ast::{CompareOp, FilterNode},
        column, constant, int, string,
    },
};

#[test]
fn test_id_equals_literal() {
    let query = compile_ok(FilterNode::compare(CompareOp::Equal, column("id"), int(100)));

    assert_eq!(
        query.predicate,
        Some(Predicate::Compare {
            left: Operand::Column(PhysicalColumn::root("visit_id")),
            op: CompareOp::Equal,
            right: Operand::Value(Value::Int(100)),
        })
    );
    assert!(query.joins.is_empty());
    assert!(query.aggregates.is_empty());
}

#[test]
fn test_synonym_compiles_identically() {
    let by_id = compile_ok(FilterNode::compare(CompareOp::Equal, column("id"), int(7)));
    let by_visit_id = compile_ok(FilterNode::compare(
        CompareOp::Equal,
        column("visit_id"),
        int(7),
    ));
    assert_eq!(by_id, by_visit_id);
}

#[test]
fn test_status_not_null_pulls_join_chain() {
    let query = compile_ok(FilterNode::NullTest {
        arg: Box::new(column("status")),
        is_null: false,
    });

    assert_eq!(
        query.predicate,
        Some(Predicate::IsNull {
            arg: Operand::Column(PhysicalColumn::joined(
                JoinName::SequenceStatus,
                "cmd_output"
            )),
            negated: true,
        })
    );
    assert_eq!(query.joins, vec![JoinName::Sequence, JoinName::SequenceStatus]);
}

#[test]
fn test_not_computed_column_is_null_safe() {
    let query = compile_ok(FilterNode::not(column("is_sps_visit")));

    let marker = Predicate::IsNull {
        arg: Operand::Column(PhysicalColumn::joined(JoinName::SpsVisit, "visit_id")),
        negated: true,
    };
    assert_eq!(
        query.predicate,
        Some(Predicate::Or(vec![
            Predicate::Not(Box::new(marker.clone())),
            Predicate::IsUnknown(Box::new(marker)),
        ]))
    );
    assert_eq!(query.joins, vec![JoinName::SpsVisit]);
}

#[test]
fn test_not_collapses_unknown_for_plain_comparison() {
    // NOT (comments = 'x') must match rows whose comments are NULL.
    let inner = FilterNode::compare(CompareOp::Equal, column("comments"), string("x"));
    let query = compile_ok(FilterNode::not(inner));

    match query.predicate {
        Some(Predicate::Or(parts)) => {
            assert_eq!(parts.len(), 2);
            assert!(matches!(parts[0], Predicate::Not(_)));
            assert!(matches!(parts[1], Predicate::IsUnknown(_)));
        }
        other => panic!("expected NULL-safe NOT, got {other:?}"),
    }
    assert_eq!(query.joins, vec![JoinName::Sequence]);
}

#[test]
fn test_between_is_inclusive_conjunction() {
    let query = compile_ok(FilterNode::Between {
        arg: Box::new(column("visit_id")),
        low: Box::new(int(10)),
        high: Box::new(int(20)),
    });

    let site = Operand::Column(PhysicalColumn::root("visit_id"));
    assert_eq!(
        query.predicate,
        Some(Predicate::And(vec![
            Predicate::Compare {
                left: site.clone(),
                op: CompareOp::GreaterOrEqual,
                right: Operand::Value(Value::Int(10)),
            },
            Predicate::Compare {
                left: site,
                op: CompareOp::LessOrEqual,
                right: Operand::Value(Value::Int(20)),
            },
        ]))
    );
}

#[test]
fn test_pattern_match_on_plain_column() {
    let query = compile_ok(FilterNode::PatternMatch {
        arg: Box::new(column("visit_note")),
        pattern: Box::new(string("%seeing%")),
        case_sensitive: false,
        negate: false,
    });

    assert_eq!(
        query.predicate,
        Some(Predicate::Match {
            arg: Operand::Column(PhysicalColumn::joined(JoinName::VisitNote, "body")),
            pattern: "%seeing%".to_string(),
            case_insensitive: true,
        })
    );
    assert_eq!(query.joins, vec![JoinName::VisitNote]);
}

#[test]
fn test_negated_pattern_match_is_null_safe() {
    let query = compile_ok(FilterNode::PatternMatch {
        arg: Box::new(column("visit_note")),
        pattern: Box::new(string("%bad%")),
        case_sensitive: true,
        negate: true,
    });

    match query.predicate {
        Some(Predicate::Or(parts)) => {
            assert!(matches!(parts[0], Predicate::Not(_)));
            assert!(matches!(parts[1], Predicate::IsUnknown(_)));
        }
        other => panic!("expected NULL-safe NOT, got {other:?}"),
    }
}

#[test]
fn test_pattern_must_be_a_string_literal() {
    let err = compile_err(FilterNode::PatternMatch {
        arg: Box::new(column("visit_note")),
        pattern: Box::new(int(5)),
        case_sensitive: false,
        negate: false,
    });
    assert_eq!(err, CompileError::PatternNotAString);
}

#[test]
fn test_header_key_access_and_cast() {
    let header = FilterNode::Indirection {
        arg: Box::new(column("fits_header")),
        key: Box::new(string("EXPTIME")),
    };
    let query = compile_ok(FilterNode::compare(
        CompareOp::GreaterThan,
        FilterNode::Cast {
            arg: Box::new(header),
            target: "float".to_string(),
        },
        constant(Value::Float(15.0)),
    ));

    assert_eq!(
        query.predicate,
        Some(Predicate::Compare {
            left: Operand::Cast {
                arg: Box::new(Operand::HeaderValue {
                    site: PhysicalColumn::joined(JoinName::FitsHeader, "cards"),
                    key: "EXPTIME".to_string(),
                }),
                target: CastTarget::Float,
            },
            op: CompareOp::GreaterThan,
            right: Operand::Value(Value::Float(15.0)),
        })
    );
    assert_eq!(query.joins, vec![JoinName::FitsHeader]);
}

#[test]
fn test_indirection_key_must_be_a_string_literal() {
    let err = compile_err(FilterNode::Indirection {
        arg: Box::new(column("fits_header")),
        key: Box::new(int(3)),
    });
    assert_eq!(err, CompileError::NonLiteralMapKey);
}

#[test]
fn test_indirection_only_on_the_header_column() {
    let err = compile_err(FilterNode::Indirection {
        arg: Box::new(column("description")),
        key: Box::new(string("EXPTIME")),
    });
    assert_eq!(
        err,
        CompileError::InvalidIndirectionTarget("description".to_string())
    );
}

#[test]
fn test_cast_target_outside_allow_list() {
    let err = compile_err(FilterNode::compare(
        CompareOp::Equal,
        FilterNode::Cast {
            arg: Box::new(column("description")),
            target: "jsonb".to_string(),
        },
        string("x"),
    ));
    assert_eq!(err, CompileError::UnsupportedTypeCast("jsonb".to_string()));
}

#[test]
fn test_unknown_column() {
    let err = compile_err(FilterNode::compare(
        CompareOp::Equal,
        column("no_such_column"),
        int(1),
    ));
    assert_eq!(
        err,
        CompileError::Catalog(CatalogError::UnknownColumn("no_such_column".to_string()))
    );
}

#[test]
fn test_comparison_of_boolean_expression_is_rejected() {
    let err = compile_err(FilterNode::compare(
        CompareOp::Equal,
        column("is_sps_visit"),
        constant(Value::Boolean(true)),
    ));
    assert!(matches!(err, CompileError::UnsupportedOperator { .. }));
}

#[test]
fn test_joins_deduplicate_across_branches() {
    // Both branches need the Sequence join; it must be applied once.
    let query = compile_ok(FilterNode::And(vec![
        FilterNode::compare(CompareOp::Equal, column("sequence_name"), string("a")),
        FilterNode::compare(CompareOp::Equal, column("comments"), string("b")),
    ]));
    assert_eq!(query.joins, vec![JoinName::Sequence]);
}
