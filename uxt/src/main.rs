//! uxt - lint and reformat UXF files.
//!
//! Reads a UXF file (gzip auto-detected), optionally dropping unused
//! ttypes or replacing imports, and writes it back out in canonical
//! layout. With no outfile the tool only lints. An outfile of `-` writes
//! to stdout; a `.gz` suffix gzip-compresses.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use uxf_drv::{
    dump, dumps, load, ConsoleReporter, ParseOptions, QuietReporter, Reporter, WriteOptions,
};

/// uxt - A CLI tool for UXF files
///
/// Converting uxf to uxf alphabetically orders any ttypes, preserves the
/// order of imports (with duplicates removed), and normalizes layout.
#[derive(Parser, Debug)]
#[command(name = "uxt")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Lint and reformat UXF files", long_about = None)]
struct Cli {
    /// Show lint errors and fixes on stderr
    #[arg(short, long)]
    lint: bool,

    /// Drop unused ttype definitions and imports
    #[arg(short = 'd', long = "dropunused")]
    drop_unused: bool,

    /// Replace imports with their used ttypes to make the outfile
    /// standalone
    #[arg(short = 'r', long = "replaceimports")]
    replace_imports: bool,

    /// Indent width, 0-8; the default is silently used if out of range
    #[arg(short, long, default_value_t = 2)]
    indent: i64,

    /// UXF file to read; may be gzip-compressed
    infile: PathBuf,

    /// UXF file to write; use - for stdout, a .gz suffix compresses
    outfile: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("uxt:error:{err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize the logging system.
///
/// Verbosity is taken from `RUST_LOG`; nothing is logged by default.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(outfile) = &cli.outfile {
        if outfile != "-" && is_same_file(&cli.infile, Path::new(outfile)) {
            bail!("won't overwrite {outfile}");
        }
    }
    let options = ParseOptions {
        drop_unused: cli.drop_unused,
        replace_imports: cli.replace_imports,
        ..ParseOptions::default()
    };
    let mut console = ConsoleReporter;
    let mut quiet = QuietReporter;
    let reporter: &mut dyn Reporter = if cli.lint { &mut console } else { &mut quiet };
    let uxo = load(&cli.infile, &options, reporter)
        .with_context(|| format!("failed to load {}", cli.infile.display()))?;
    tracing::debug!(infile = %cli.infile.display(), "loaded UXF document");

    let Some(outfile) = cli.outfile else {
        return Ok(()); // lint only
    };
    let write_options = WriteOptions::with_indent(sanitized_indent(cli.indent));
    if outfile == "-" {
        print!("{}", dumps(&uxo, &write_options));
    } else {
        dump(Path::new(&outfile), &uxo, &write_options)
            .with_context(|| format!("failed to write {outfile}"))?;
        tracing::debug!(outfile, "wrote UXF document");
    }
    Ok(())
}

/// Maps an out-of-range indent to the default rather than complaining.
fn sanitized_indent(indent: i64) -> usize {
    if (0..=8).contains(&indent) {
        indent as usize
    } else {
        2
    }
}

/// Returns true when both paths name the same existing file.
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
