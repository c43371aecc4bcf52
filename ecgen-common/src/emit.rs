//! Artifact rendering and atomic output.
//!
//! The generated artifact is a self-contained Rust source file with two
//! coordinated halves: one `pub const` per error (grouped under module
//! and submodule comment headers, in allocation order) and a parallel
//! `DESCRIPTIONS` table for runtime lookup. Rendering is a pure function
//! of the allocated table, so regenerating from unchanged input is
//! byte-identical.
//!
//! Output is written to a uuid-named temp file in the destination
//! directory and renamed into place, so readers never observe a
//! half-written artifact and a failed run leaves any previous artifact
//! untouched.

use crate::alloc::{TableEntry, allocate};
use crate::errors::{GenError, GenResult};
use crate::schema::Config;
use std::fmt::Write as _;
use std::fs;
use std::io::Write as _;
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

const BANNER: &str = "\
// Generated by ecgen. Do not edit; changes will be overwritten.
//
// Code layout (16 bits): module index in bits 15..11, submodule slot in
// bits 10..6 (0 = module-level error), error index in bits 5..0.
";

/// Renders the allocated table as Rust source text.
#[must_use]
pub fn render(table: &[TableEntry]) -> String {
    let name_width = table.iter().map(|e| e.symbol.len()).max().unwrap_or(0);

    let mut out = String::from(BANNER);
    out.push('\n');
    out.push_str("/// Numeric type shared by every generated error code.\n");
    out.push_str("pub type ErrorCode = u16;\n");

    let mut current_group: Option<(&str, Option<&str>)> = None;
    for entry in table {
        let group = (entry.module.as_str(), entry.submodule.as_deref());
        if current_group != Some(group) {
            out.push('\n');
            match group.1 {
                None => {
                    let _ = writeln!(out, "// {}", group.0);
                }
                Some(sub) => {
                    let _ = writeln!(out, "// {}::{}", group.0, sub);
                }
            }
            current_group = Some(group);
        }
        let _ = writeln!(
            out,
            "pub const {}: ErrorCode = {:#06x};",
            entry.symbol, entry.code
        );
    }

    out.push('\n');
    out.push_str("/// Every generated code, in allocation order.\n");
    out.push_str("pub const ALL_CODES: &[ErrorCode] = &[\n");
    for entry in table {
        let _ = writeln!(out, "    {},", entry.symbol);
    }
    out.push_str("];\n");

    out.push('\n');
    out.push_str("/// Parallel (code, description) table, in allocation order.\n");
    out.push_str("pub static DESCRIPTIONS: &[(ErrorCode, &str)] = &[\n");
    for entry in table {
        let pad = " ".repeat(name_width - entry.symbol.len());
        let _ = writeln!(
            out,
            "    ({},{} \"{}\"),",
            entry.symbol,
            pad,
            escape(&entry.description)
        );
    }
    out.push_str("];\n");

    out
}

/// Writes `content` to `path` atomically (temp file + rename).
///
/// On failure the destination is untouched and the temp file is cleaned
/// up.
pub fn write_artifact(path: &Path, content: &str) -> GenResult<()> {
    let io_err = |source: std::io::Error| GenError::Io {
        path: path.to_path_buf(),
        source,
    };

    let parent = path.parent().ok_or_else(|| {
        io_err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "destination has no parent directory",
        ))
    })?;
    let temp_path = parent.join(format!(".{}.tmp", Uuid::new_v4()));

    let result = (|| {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result.map_err(io_err)?;

    debug!(path = %path.display(), bytes = content.len(), "wrote artifact");
    Ok(())
}

/// Runs the whole pipeline: load, allocate, render, write.
///
/// With no output path the artifact goes to stdout. Any failure aborts
/// before the destination is touched. Returns the allocated table.
pub fn generate(input: &Path, output: Option<&Path>) -> GenResult<Vec<TableEntry>> {
    let config = Config::load(input)?;
    let table = allocate(&config)?;
    let content = render(&table);

    match output {
        Some(path) => {
            write_artifact(path, &content)?;
            info!(
                input = %input.display(),
                output = %path.display(),
                errors = table.len(),
                "generated error codes"
            );
        }
        None => {
            std::io::stdout()
                .write_all(content.as_bytes())
                .map_err(|source| GenError::Io {
                    path: Path::new("<stdout>").to_path_buf(),
                    source,
                })?;
        }
    }

    Ok(table)
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
modules:
  TestMod1:
    errors:
      E_OPEN_DEV: "Error opening device"
      E_CLOSE_DEV: "Error closing device"
    submodules:
      TestMod1SubMod1:
        errors:
          E_READ_DEV: "Error reading from device"
          E_WRITE_DEV: "Error writing to device"
  TestMod2:
    errors:
      E_INIT_MOD: "Error initializing module"
"#;

    fn fixture_table() -> Vec<TableEntry> {
        allocate(&Config::from_yaml(FIXTURE).unwrap()).unwrap()
    }

    #[test]
    fn test_render_contains_constants_and_table() {
        let source = render(&fixture_table());
        assert!(source.contains("pub type ErrorCode = u16;"));
        assert!(source.contains("pub const E_OPEN_DEV: ErrorCode = 0x0000;"));
        assert!(source.contains("pub const E_CLOSE_DEV: ErrorCode = 0x0001;"));
        assert!(source.contains("pub const E_READ_DEV: ErrorCode = 0x0040;"));
        assert!(source.contains("pub const E_WRITE_DEV: ErrorCode = 0x0041;"));
        assert!(source.contains("pub const E_INIT_MOD: ErrorCode = 0x0800;"));
        assert!(source.contains("\"Error writing to device\""));
    }

    #[test]
    fn test_render_groups_by_module_and_submodule() {
        let source = render(&fixture_table());
        let tm1 = source.find("// TestMod1\n").unwrap();
        let sub = source.find("// TestMod1::TestMod1SubMod1\n").unwrap();
        let tm2 = source.find("// TestMod2\n").unwrap();
        assert!(tm1 < sub && sub < tm2);
    }

    #[test]
    fn test_render_is_idempotent() {
        let table = fixture_table();
        assert_eq!(render(&table), render(&table));
    }

    #[test]
    fn test_render_empty_table() {
        let source = render(&[]);
        assert!(source.contains("pub const ALL_CODES: &[ErrorCode] = &[\n];"));
        assert!(source.contains("pub static DESCRIPTIONS: &[(ErrorCode, &str)] = &[\n];"));
    }

    #[test]
    fn test_escape_quotes_and_backslashes() {
        assert_eq!(escape(r#"a "quoted" \path"#), r#"a \"quoted\" \\path"#);
        assert_eq!(escape("line\nbreak"), "line\\nbreak");
    }

    #[test]
    fn test_write_artifact_replaces_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("error_codes.rs");

        write_artifact(&dest, "first\n").unwrap();
        write_artifact(&dest, "second\n").unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "second\n");

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .filter(|n| n != "error_codes.rs")
            .collect();
        assert!(leftovers.is_empty(), "stray files: {:?}", leftovers);
    }

    #[test]
    fn test_write_artifact_missing_dir_is_io_error() {
        let err = write_artifact(Path::new("/nonexistent/ecgen/out.rs"), "x").unwrap_err();
        assert!(matches!(err, GenError::Io { .. }));
    }

    #[test]
    fn test_generate_failure_leaves_previous_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("codes.yaml");
        let output = dir.path().join("error_codes.rs");

        fs::write(&input, FIXTURE).unwrap();
        generate(&input, Some(&output)).unwrap();
        let first = fs::read_to_string(&output).unwrap();

        // Same symbol twice: generation fails, nothing may be rewritten.
        fs::write(
            &input,
            "modules:\n  A:\n    errors:\n      E_DUP: \"x\"\n  B:\n    errors:\n      E_DUP: \"y\"\n",
        )
        .unwrap();
        assert!(generate(&input, Some(&output)).is_err());
        assert_eq!(fs::read_to_string(&output).unwrap(), first);
    }

    #[test]
    fn test_generate_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("codes.yaml");
        let out_a = dir.path().join("a.rs");
        let out_b = dir.path().join("b.rs");

        fs::write(&input, FIXTURE).unwrap();
        generate(&input, Some(&out_a)).unwrap();
        generate(&input, Some(&out_b)).unwrap();
        assert_eq!(
            fs::read(&out_a).unwrap(),
            fs::read(&out_b).unwrap()
        );
    }
}
