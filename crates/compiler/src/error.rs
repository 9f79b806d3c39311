use catalog::CatalogError;
use thiserror::Error;

/// Why a filter expression was rejected.
///
/// Every variant is a caller-input error: compilation stops at the first one
/// and the message is surfaced to the filter author as a validation failure,
/// never as an internal fault.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CompileError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Operator `{op}` is not supported for {context}")]
    UnsupportedOperator { op: String, context: String },

    #[error("The pattern of a LIKE match must be a string literal")]
    PatternNotAString,

    #[error("Unsupported cast target `{0}`")]
    UnsupportedTypeCast(String),

    #[error("A header key must be a string literal")]
    NonLiteralMapKey,

    #[error("`{0}` does not support key access")]
    InvalidIndirectionTarget(String),

    #[error("Aggregate column `{0}` may only appear in a top-level AND")]
    AggregateInIllegalPosition(String),

    #[error("Aggregate column `{0}` may only be compared to a literal value")]
    AggregateComparedToNonLiteral(String),
}

impl CompileError {
    pub fn unsupported_operator(op: impl Into<String>, context: impl Into<String>) -> Self {
        CompileError::UnsupportedOperator {
            op: op.into(),
            context: context.into(),
        }
    }
}
