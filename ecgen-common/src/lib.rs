//! Core library for ecgen, the hierarchical error-code generator.
//!
//! The pipeline is a single-threaded batch: [`schema::Config::load`]
//! builds the in-memory model, [`alloc::allocate`] assigns each error a
//! stable 16-bit code from its position in the module/submodule
//! hierarchy, and [`emit::generate`] renders the declaration block and
//! description table into one atomically written Rust source artifact.
//! [`lookup::lookup`] is the runtime consumer contract over that table.

#![forbid(unsafe_code)]

pub mod alloc;
pub mod codes;
pub mod emit;
pub mod errors;
pub mod lookup;
pub mod schema;

pub use crate::alloc::{TableEntry, allocate};
pub use crate::codes::{CodePoint, ErrorCode};
pub use crate::emit::{generate, render, write_artifact};
pub use crate::errors::{GenError, GenResult, SchemaViolation};
pub use crate::lookup::{UNKNOWN_ERROR, lookup};
pub use crate::schema::{Config, ErrorDef, Module, Submodule};
