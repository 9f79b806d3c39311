//! Abstract syntax tree for filter expressions.
//!
//! This is the contract between the external parser and the compiler: the
//! parser produces one immutable `FilterNode` tree per filter text, the
//! compiler consumes it and the tree is discarded.

use crate::core::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Filter expression node kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterNode {
    Constant(Value),
    Column(String),
    Comparison {
        op: CompareOp,
        left: Box<FilterNode>,
        right: Box<FilterNode>,
    },
    And(Vec<FilterNode>),
    Or(Vec<FilterNode>),
    Not(Box<FilterNode>),
    NullTest {
        arg: Box<FilterNode>,
        is_null: bool,
    },
    Between {
        arg: Box<FilterNode>,
        low: Box<FilterNode>,
        high: Box<FilterNode>,
    },
    PatternMatch {
        arg: Box<FilterNode>,
        pattern: Box<FilterNode>,
        case_sensitive: bool,
        negate: bool,
    },
    /// Key access into a key-value column, e.g. `fits_header['EXPTIME']`.
    Indirection {
        arg: Box<FilterNode>,
        key: Box<FilterNode>,
    },
    /// Type cast, e.g. `fits_header['EXPTIME']::float`.
    Cast {
        arg: Box<FilterNode>,
        target: String,
    },
}

impl FilterNode {
    pub fn compare(op: CompareOp, left: FilterNode, right: FilterNode) -> FilterNode {
        FilterNode::Comparison {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn not(arg: FilterNode) -> FilterNode {
        FilterNode::Not(Box::new(arg))
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    Equal,
    NotEqual,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
}

impl CompareOp {
    /// The operator with its operands swapped: `5 < x` holds exactly when
    /// `x > 5` does.
    pub fn reversed(self) -> CompareOp {
        match self {
            CompareOp::Equal => CompareOp::Equal,
            CompareOp::NotEqual => CompareOp::NotEqual,
            CompareOp::LessThan => CompareOp::GreaterThan,
            CompareOp::LessOrEqual => CompareOp::GreaterOrEqual,
            CompareOp::GreaterThan => CompareOp::LessThan,
            CompareOp::GreaterOrEqual => CompareOp::LessOrEqual,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Equal => write!(f, "="),
            CompareOp::NotEqual => write!(f, "<>"),
            CompareOp::LessThan => write!(f, "<"),
            CompareOp::LessOrEqual => write!(f, "<="),
            CompareOp::GreaterThan => write!(f, ">"),
            CompareOp::GreaterOrEqual => write!(f, ">="),
        }
    }
}
