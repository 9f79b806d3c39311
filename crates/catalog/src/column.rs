use crate::joins::JoinName;
use serde::Serialize;

/// The physical site of an attribute: a column on the root `visit` table
/// (`join: None`) or on one of the joined tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhysicalColumn {
    pub join: Option<JoinName>,
    pub column: &'static str,
}

impl PhysicalColumn {
    pub const fn root(column: &'static str) -> Self {
        PhysicalColumn { join: None, column }
    }

    pub const fn joined(join: JoinName, column: &'static str) -> Self {
        PhysicalColumn {
            join: Some(join),
            column,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AggregateFunction {
    Count,
    Average,
}

/// An aggregate over a table related to `visit`, evaluated after grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AggregateSpec {
    pub table: &'static str,
    pub function: AggregateFunction,
    /// The aggregated column. Required for `Average`, absent for `Count`.
    pub source_column: Option<&'static str>,
}

impl AggregateSpec {
    pub const fn count(table: &'static str) -> Self {
        AggregateSpec {
            table,
            function: AggregateFunction::Count,
            source_column: None,
        }
    }

    pub const fn average(table: &'static str, source_column: &'static str) -> Self {
        AggregateSpec {
            table,
            function: AggregateFunction::Average,
            source_column: Some(source_column),
        }
    }
}

/// What a queryable name resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnKind {
    /// A real attribute.
    Plain(PhysicalColumn),
    /// Computed boolean: the related row exists, i.e. its marker column
    /// IS NOT NULL under an outer join.
    MarkerNotNull(PhysicalColumn),
    /// The extensible key-value header payload. The only legal target of
    /// key access (`fits_header['KEY']`).
    Header(PhysicalColumn),
    /// The wildcard column that expands to an OR over the search list.
    AnyColumn,
    /// An aggregate over a related table.
    Aggregate(AggregateSpec),
}

/// Descriptor for one queryable column name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    pub name: &'static str,
    /// Joins the compiler must request when this column is referenced.
    pub required_joins: Vec<JoinName>,
    pub kind: ColumnKind,
}

impl ColumnDescriptor {
    pub fn new(name: &'static str, required_joins: &[JoinName], kind: ColumnKind) -> Self {
        ColumnDescriptor {
            name,
            required_joins: required_joins.to_vec(),
            kind,
        }
    }
}
