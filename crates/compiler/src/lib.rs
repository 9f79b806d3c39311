pub mod aggregate;
pub mod anycol;
pub mod compile;
pub mod error;
pub mod predicate;
pub mod query;

pub use compile::compile;
pub use error::CompileError;
pub use query::CompiledQuery;

#[cfg(test)]
mod tests;
