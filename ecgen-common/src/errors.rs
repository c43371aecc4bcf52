//! Error taxonomy for the generation pipeline.
//!
//! Every failure mode is fatal to the run: the pipeline aborts before the
//! destination artifact is touched, so a previously generated header is
//! never left half-written.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can abort a generation run.
#[derive(Debug, Error)]
pub enum GenError {
    /// Input could not be read or output could not be written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration is not syntactically valid YAML.
    #[error("invalid YAML in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// Configuration is well-formed YAML but violates the schema.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaViolation),

    /// A hierarchy index does not fit its bit field in the code encoding.
    #[error("encoding overflow: {field} index {value} exceeds maximum {max}")]
    Overflow {
        field: &'static str,
        value: usize,
        max: usize,
    },
}

/// Concrete schema violations, with enough context to point at the
/// offending module, submodule or error symbol.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaViolation {
    /// Document root (or a `modules`/`errors`/`submodules` value) is not
    /// a mapping.
    #[error("{location}: expected a mapping, found {found}")]
    NotAMapping { location: String, found: String },

    /// A module, submodule or error key is not a valid identifier.
    #[error("{location}: '{name}' is not a valid identifier")]
    InvalidName { location: String, name: String },

    /// An error entry has a missing or empty description.
    #[error("{location}: error '{symbol}' has an empty description")]
    EmptyDescription { location: String, symbol: String },

    /// An error description is not a plain string.
    #[error("{location}: description of '{symbol}' must be a string, found {found}")]
    NonStringDescription {
        location: String,
        symbol: String,
        found: String,
    },

    /// The same error symbol appears more than once anywhere in the
    /// configuration. Symbols become flat constants, so they must be
    /// globally unique.
    #[error("duplicate error symbol '{symbol}': declared in {first} and again in {second}")]
    DuplicateSymbol {
        symbol: String,
        first: String,
        second: String,
    },

    /// A mapping carries a key the schema does not know about.
    #[error("{location}: unknown key '{key}' (expected {expected})")]
    UnknownKey {
        location: String,
        key: String,
        expected: &'static str,
    },

    /// A submodule declares its own `submodules` block. The code
    /// encoding has exactly one submodule field, so deeper nesting is
    /// not representable.
    #[error("{location}: submodules cannot nest further")]
    NestedSubmodule { location: String },
}

/// Convenience alias used throughout the crate.
pub type GenResult<T> = Result<T, GenError>;
