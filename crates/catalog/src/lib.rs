pub mod catalog;
pub mod column;
pub mod error;
pub mod joins;

pub use catalog::{ANY_COLUMN_SEARCH, Catalog};
pub use column::{AggregateFunction, AggregateSpec, ColumnDescriptor, ColumnKind, PhysicalColumn};
pub use error::CatalogError;
pub use joins::{JoinName, application_order_is_valid, resolve_joins};
