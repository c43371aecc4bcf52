//! ecgen - error-code header generator.
//!
//! Reads a YAML hierarchy of modules, submodules and errors, allocates a
//! stable 16-bit code per error and emits the generated Rust artifact.
//! Exit code 0 on success; any parse, schema, overflow or I/O failure
//! aborts with a diagnostic on stderr and a non-zero exit code.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use ecgen_common::{Config, allocate, render, write_artifact};
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "ecgen")]
#[command(author, version, about = "Generate error-code headers from a YAML hierarchy")]
struct Cli {
    /// Path to the YAML configuration
    config: PathBuf,

    /// Output file (stdout when omitted)
    #[arg(short, long, conflicts_with_all = ["check", "json"])]
    output: Option<PathBuf>,

    /// Validate and allocate without writing anything
    #[arg(long)]
    check: bool,

    /// Print the allocated table as JSON instead of Rust source
    #[arg(long, conflicts_with = "check")]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = Config::load(&cli.config)?;
    let table = allocate(&config)?;
    debug!(
        modules = config.modules.len(),
        errors = table.len(),
        "allocation complete"
    );

    if cli.check {
        eprintln!(
            "{}: OK ({} errors across {} modules)",
            cli.config.display(),
            table.len(),
            config.modules.len()
        );
        return Ok(());
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    let content = render(&table);
    match cli.output {
        Some(ref path) => {
            write_artifact(path, &content)?;
            eprintln!("Successfully generated {}", path.display());
        }
        None => {
            std::io::stdout().write_all(content.as_bytes())?;
        }
    }

    Ok(())
}
