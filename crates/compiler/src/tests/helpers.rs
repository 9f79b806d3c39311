use crate::{CompileError, CompiledQuery};
use catalog::Catalog;
use model::filter::ast::FilterNode;

/// Compile `filter` against the standard catalog.
pub fn compile(filter: FilterNode) -> Result<CompiledQuery, CompileError> {
    let catalog = Catalog::standard();
    crate::compile(&catalog, &filter)
}

/// Compile a filter that must succeed.
pub fn compile_ok(filter: FilterNode) -> CompiledQuery {
    compile(filter).expect("filter should compile")
}

/// Compile a filter that must be rejected.
pub fn compile_err(filter: FilterNode) -> CompileError {
    compile(filter).expect_err("filter should be rejected")
}
