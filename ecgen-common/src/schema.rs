//! Declarative configuration model.
//!
//! A configuration is a YAML mapping of modules, each with optional
//! direct `errors` and optional `submodules` (one level deep, see
//! [`crate::codes`]). Declaration order is load-bearing: it determines
//! the allocated codes, so the model keeps every sequence exactly as it
//! appears in the source document and never sorts.
//!
//! ```yaml
//! modules:
//!   DeviceIo:
//!     errors:
//!       E_OPEN_DEV: "Error opening device"
//!     submodules:
//!       Dma:
//!         errors:
//!           E_DMA_MAP: "Error mapping DMA buffer"
//! ```

use crate::errors::{GenError, GenResult, SchemaViolation};
use serde::{Deserialize, Serialize};
use serde_yaml_ng::{Mapping, Value};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

/// A named error and its human-readable description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDef {
    /// Symbolic constant name, globally unique across the configuration.
    pub symbol: String,
    /// Non-empty description text.
    pub description: String,
}

/// Second-level grouping of errors inside a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submodule {
    pub name: String,
    pub errors: Vec<ErrorDef>,
}

/// Top-level grouping of errors and submodules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    /// Errors declared directly on the module, in declaration order.
    pub errors: Vec<ErrorDef>,
    /// Nested submodules, in declaration order.
    pub submodules: Vec<Submodule>,
}

/// The fully validated in-memory configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub modules: Vec<Module>,
}

impl Config {
    /// Reads and validates a configuration file.
    ///
    /// Pure read + parse: no side effects. Fails with [`GenError::Io`]
    /// when the file cannot be read, [`GenError::Parse`] on malformed
    /// YAML and [`GenError::Schema`] on structural violations.
    pub fn load(path: &Path) -> GenResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| GenError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&text).map_err(|err| match err {
            // Re-anchor parse errors on the real file path.
            GenError::Parse { source, .. } => GenError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        debug!(
            path = %path.display(),
            modules = config.modules.len(),
            "loaded configuration"
        );
        Ok(config)
    }

    /// Parses and validates a configuration from an in-memory string.
    pub fn from_yaml(text: &str) -> GenResult<Self> {
        let doc: Value = serde_yaml_ng::from_str(text).map_err(|source| GenError::Parse {
            path: Path::new("<inline>").to_path_buf(),
            source,
        })?;
        build(&doc)
    }

    /// Total number of errors across all modules and submodules.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.modules
            .iter()
            .map(|m| {
                m.errors.len()
                    + m.submodules.iter().map(|s| s.errors.len()).sum::<usize>()
            })
            .sum()
    }
}

/// Tracks every symbol seen so far, mapped to where it was declared.
/// Symbols become flat constants in the artifact, so a collision
/// anywhere in the hierarchy is a schema error.
#[derive(Default)]
struct SymbolRegistry {
    seen: HashMap<String, String>,
}

impl SymbolRegistry {
    fn claim(&mut self, symbol: &str, location: &str) -> Result<(), SchemaViolation> {
        if let Some(first) = self.seen.get(symbol) {
            return Err(SchemaViolation::DuplicateSymbol {
                symbol: symbol.to_string(),
                first: first.clone(),
                second: location.to_string(),
            });
        }
        self.seen
            .insert(symbol.to_string(), location.to_string());
        Ok(())
    }
}

fn build(doc: &Value) -> GenResult<Config> {
    // An empty document is a valid (empty) configuration.
    let root = match doc {
        Value::Null => return Ok(Config::default()),
        Value::Mapping(map) => map,
        other => {
            return Err(SchemaViolation::NotAMapping {
                location: "document root".to_string(),
                found: kind(other).to_string(),
            }
            .into());
        }
    };

    let mut registry = SymbolRegistry::default();
    let mut modules = Vec::new();

    for (key, value) in root {
        let key = key_name(key, "document root")?;
        if key != "modules" {
            return Err(SchemaViolation::UnknownKey {
                location: "document root".to_string(),
                key: key.to_string(),
                expected: "'modules'",
            }
            .into());
        }
        let map = expect_mapping(value, "'modules'")?;
        for (key, value) in map {
            let name = key_name(key, "'modules'")?;
            modules.push(build_module(name, value, &mut registry)?);
        }
    }

    Ok(Config { modules })
}

fn build_module(name: &str, value: &Value, registry: &mut SymbolRegistry) -> GenResult<Module> {
    require_identifier(name, "'modules'")?;
    let location = format!("module '{}'", name);
    let map = expect_mapping(value, &location)?;

    let mut errors = Vec::new();
    let mut submodules = Vec::new();

    for (key, value) in map {
        match key_name(key, &location)? {
            "errors" => errors = build_errors(value, &location, registry)?,
            "submodules" => {
                let sub_map = expect_mapping(value, &location)?;
                for (key, value) in sub_map {
                    let sub_name = key_name(key, &location)?;
                    submodules.push(build_submodule(name, sub_name, value, registry)?);
                }
            }
            other => {
                return Err(SchemaViolation::UnknownKey {
                    location: location.clone(),
                    key: other.to_string(),
                    expected: "'errors' or 'submodules'",
                }
                .into());
            }
        }
    }

    Ok(Module {
        name: name.to_string(),
        errors,
        submodules,
    })
}

fn build_submodule(
    parent: &str,
    name: &str,
    value: &Value,
    registry: &mut SymbolRegistry,
) -> GenResult<Submodule> {
    let parent_location = format!("module '{}'", parent);
    require_identifier(name, &parent_location)?;
    let location = format!("submodule '{}::{}'", parent, name);
    let map = expect_mapping(value, &location)?;

    let mut errors = Vec::new();

    for (key, value) in map {
        match key_name(key, &location)? {
            "errors" => errors = build_errors(value, &location, registry)?,
            // Only one submodule level is representable in the code
            // encoding (see crate::codes).
            "submodules" => {
                return Err(SchemaViolation::NestedSubmodule {
                    location: location.clone(),
                }
                .into());
            }
            other => {
                return Err(SchemaViolation::UnknownKey {
                    location: location.clone(),
                    key: other.to_string(),
                    expected: "'errors'",
                }
                .into());
            }
        }
    }

    Ok(Submodule {
        name: name.to_string(),
        errors,
    })
}

fn build_errors(
    value: &Value,
    location: &str,
    registry: &mut SymbolRegistry,
) -> GenResult<Vec<ErrorDef>> {
    let map = expect_mapping(value, location)?;
    let mut errors = Vec::with_capacity(map.len());

    for (key, value) in map {
        let symbol = key_name(key, location)?;
        require_identifier(symbol, location)?;

        let description = match value {
            Value::String(s) => s.clone(),
            other => {
                return Err(SchemaViolation::NonStringDescription {
                    location: location.to_string(),
                    symbol: symbol.to_string(),
                    found: kind(other).to_string(),
                }
                .into());
            }
        };
        if description.trim().is_empty() {
            return Err(SchemaViolation::EmptyDescription {
                location: location.to_string(),
                symbol: symbol.to_string(),
            }
            .into());
        }

        registry.claim(symbol, location)?;
        errors.push(ErrorDef {
            symbol: symbol.to_string(),
            description,
        });
    }

    Ok(errors)
}

/// Resolves a mapping value, treating YAML `null` as an empty mapping so
/// that `ModuleName:` with no body is accepted.
fn expect_mapping<'a>(value: &'a Value, location: &str) -> GenResult<&'a Mapping> {
    static EMPTY: LazyLock<Mapping> = LazyLock::new(Mapping::new);
    match value {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(&EMPTY),
        other => Err(SchemaViolation::NotAMapping {
            location: location.to_string(),
            found: kind(other).to_string(),
        }
        .into()),
    }
}

fn key_name<'a>(key: &'a Value, location: &str) -> GenResult<&'a str> {
    key.as_str().ok_or_else(|| {
        SchemaViolation::InvalidName {
            location: location.to_string(),
            name: format!("{:?}", key),
        }
        .into()
    })
}

fn require_identifier(name: &str, location: &str) -> GenResult<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(SchemaViolation::InvalidName {
            location: location.to_string(),
            name: name.to_string(),
        }
        .into())
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
