//! The relational predicate tree handed to the query executor.

use crate::error::CompileError;
use catalog::PhysicalColumn;
use model::{core::value::Value, filter::ast::CompareOp};
use serde::Serialize;

/// Cast targets.
///
/// `parse` accepts the caller-facing allow-list; `Text` exists only for the
/// internal id-as-text cast the wildcard expansion builds and is not
/// writable from filter text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CastTarget {
    Date,
    Integer,
    Float,
    /// Integer cast that yields NULL on malformed text instead of failing.
    LenientInteger,
    /// Float cast that yields NULL on malformed text instead of failing.
    LenientFloat,
    Text,
}

impl CastTarget {
    pub fn parse(target: &str) -> Result<CastTarget, CompileError> {
        match target.to_ascii_lowercase().as_str() {
            "date" => Ok(CastTarget::Date),
            "int" | "integer" => Ok(CastTarget::Integer),
            "float" | "double" => Ok(CastTarget::Float),
            "try_int" => Ok(CastTarget::LenientInteger),
            "try_float" => Ok(CastTarget::LenientFloat),
            other => Err(CompileError::UnsupportedTypeCast(other.to_string())),
        }
    }
}

/// One side of a comparison: a literal, a physical column, a header
/// sub-value, or a cast of any of those.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Operand {
    Value(Value),
    Column(PhysicalColumn),
    /// The text value stored under `key` in the key-value header table.
    HeaderValue { site: PhysicalColumn, key: String },
    Cast {
        arg: Box<Operand>,
        target: CastTarget,
    },
}

/// A compiled row predicate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Predicate {
    Compare {
        left: Operand,
        op: CompareOp,
        right: Operand,
    },
    IsNull {
        arg: Operand,
        negated: bool,
    },
    Match {
        arg: Operand,
        pattern: String,
        case_insensitive: bool,
    },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
    /// `(p) IS NULL`: the wrapped predicate evaluated to UNKNOWN.
    IsUnknown(Box<Predicate>),
}

impl Predicate {
    /// Conjoin `parts`, collapsing the trivial cases.
    pub fn and(mut parts: Vec<Predicate>) -> Option<Predicate> {
        match parts.len() {
            0 => None,
            1 => parts.pop(),
            _ => Some(Predicate::And(parts)),
        }
    }

    pub fn or(mut parts: Vec<Predicate>) -> Option<Predicate> {
        match parts.len() {
            0 => None,
            1 => parts.pop(),
            _ => Some(Predicate::Or(parts)),
        }
    }

    /// NULL-safe negation: `NOT p OR (p) IS NULL`.
    ///
    /// Under three-valued logic a bare `NOT p` stays UNKNOWN when `p` is
    /// UNKNOWN, which would silently drop rows with NULLs from a negated
    /// filter. For filtering purposes "not known to be true" must read as
    /// true, so UNKNOWN collapses to matched.
    pub fn null_safe_not(self) -> Predicate {
        Predicate::Or(vec![
            Predicate::Not(Box::new(self.clone())),
            Predicate::IsUnknown(Box::new(self)),
        ])
    }
}
