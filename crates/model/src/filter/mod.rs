use crate::{core::value::Value, filter::ast::FilterNode};

pub mod ast;

pub fn column(name: &str) -> FilterNode {
    FilterNode::Column(name.to_string())
}

pub fn constant(value: Value) -> FilterNode {
    FilterNode::Constant(value)
}

pub fn string(value: &str) -> FilterNode {
    FilterNode::Constant(Value::String(value.to_string()))
}

pub fn int(value: i64) -> FilterNode {
    FilterNode::Constant(Value::Int(value))
}
