//! Deterministic code allocation.
//!
//! Walks the configuration in declaration order and assigns every error
//! a [`CodePoint`]-derived code: modules first to last, each module's
//! direct errors before its submodules, each submodule's errors in
//! order. The walk is a pure function of the configuration, so a
//! byte-identical input always allocates identical codes.

use crate::codes::{CodePoint, ErrorCode};
use crate::errors::GenResult;
use crate::schema::{Config, ErrorDef};
use serde::Serialize;
use tracing::debug;

/// One row of the generated table: an allocated code with its symbol,
/// description and the hierarchy position it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableEntry {
    /// Allocated code, unique across the table.
    pub code: ErrorCode,
    /// Symbolic constant name.
    pub symbol: String,
    /// Human-readable description.
    pub description: String,
    /// Owning module name.
    pub module: String,
    /// Owning submodule name, `None` for module-level errors.
    pub submodule: Option<String>,
}

/// Allocates codes for every error in the configuration.
///
/// Returns entries in allocation order. Fails with
/// [`crate::errors::GenError::Overflow`] when the hierarchy is too wide
/// or deep for the fixed-width encoding.
pub fn allocate(config: &Config) -> GenResult<Vec<TableEntry>> {
    let mut table = Vec::with_capacity(config.error_count());

    for (module_idx, module) in config.modules.iter().enumerate() {
        push_errors(
            &mut table,
            &module.errors,
            module_idx,
            0,
            &module.name,
            None,
        )?;

        for (sub_idx, submodule) in module.submodules.iter().enumerate() {
            // Slot 0 is reserved for direct errors, submodules are
            // numbered from 1.
            push_errors(
                &mut table,
                &submodule.errors,
                module_idx,
                sub_idx + 1,
                &module.name,
                Some(&submodule.name),
            )?;
        }
    }

    debug!(entries = table.len(), "allocated error codes");
    Ok(table)
}

fn push_errors(
    table: &mut Vec<TableEntry>,
    errors: &[ErrorDef],
    module_idx: usize,
    submodule_slot: usize,
    module: &str,
    submodule: Option<&str>,
) -> GenResult<()> {
    for (error_idx, error) in errors.iter().enumerate() {
        let code = CodePoint {
            module: module_idx,
            submodule: submodule_slot,
            error: error_idx,
        }
        .encode()?;

        table.push(TableEntry {
            code,
            symbol: error.symbol.clone(),
            description: error.description.clone(),
            module: module.to_string(),
            submodule: submodule.map(str::to_string),
        });
    }
    Ok(())
}
