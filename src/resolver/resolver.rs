use crate::{ast::statements::RestrictedBlockStmt, errors::errors::Error};

use super::{
    collector::collect, function_resolver::resolve_functions, number_resolver::resolve_numbers,
    type_resolver::resolve_types,
};

/// Runs every resolution pass over `block`, in order. The first error stops
/// the run.
#[tracing::instrument(skip_all, fields(module = module))]
pub fn run_passes(module: &str, block: &mut RestrictedBlockStmt) -> Result<(), Error> {
    let symbols = collect(block)?;
    resolve_types(&symbols, block)?;
    resolve_functions(&symbols, block)?;
    resolve_numbers(block)?;

    tracing::debug!("module resolved");
    Ok(())
}
