use super::helpers::compile_ok;
use model::filter::{
    ast::{CompareOp, FilterNode},
    column, int,
};

#[test]
fn test_compiled_query_serializes_for_the_executor_boundary() {
    let query = compile_ok(FilterNode::And(vec![
        FilterNode::compare(CompareOp::Equal, column("status"), int(0)),
        FilterNode::compare(CompareOp::GreaterThan, column("sps_count"), int(2)),
    ]));

    let json = serde_json::to_value(&query).unwrap();
    assert_eq!(json["joins"], serde_json::json!(["Sequence", "SequenceStatus"]));
    assert_eq!(json["aggregates"][0]["table"], "sps_exposure");
    assert_eq!(json["aggregates"][0]["function"], "Count");
    assert_eq!(json["aggregates"][0]["value"], serde_json::json!({ "Int": 2 }));
}
