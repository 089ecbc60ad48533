//! safecp - cp-compatible copy
//!
//! A thin command-line front end over the safecp engine.

use clap::Parser;
use safecp::{
    CopyEngine, CopyOptions, CopyStats, Failure, FileType, Status, TreeWalker, plan_operation,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Prefix of every diagnostic.
const PROGRAM: &str = "safecp";

/// Environment variable holding the log filter.
const LOG_ENV: &str = "SAFECP_LOG";

/// safecp - copy files and directories
///
/// Usage:
///   safecp [OPTIONS] SOURCE DEST
///   safecp [OPTIONS] SOURCE... DIRECTORY
///   safecp [OPTIONS] -t DIRECTORY SOURCE...
#[derive(Parser, Debug)]
#[command(name = "safecp", version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)]
struct Args {
    /// Source file(s) or directory(ies), followed by the destination
    ///
    /// When multiple sources are given, the destination must be a directory.
    #[arg(required = true)]
    sources: Vec<PathBuf>,

    /// Copy all SOURCE arguments into DIRECTORY
    #[arg(short = 't', long = "target-directory", value_name = "DIRECTORY")]
    target_directory: Option<PathBuf>,

    /// Copy directories recursively
    #[arg(short = 'r', short_alias = 'R', long)]
    recursive: bool,

    /// Prompt before overwriting
    #[arg(short = 'i', long)]
    interactive: bool,

    /// Overwrite existing files without prompting
    #[arg(short = 'f', long)]
    force: bool,

    /// Preserve mode, ownership and timestamps
    #[arg(short = 'p', long)]
    preserve: bool,

    /// Never follow symbolic links in SOURCE
    #[arg(short = 'P', long)]
    no_dereference: bool,

    /// Print statistics and debug logs
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Print what would be copied without actually copying
    #[arg(long = "plan", alias = "dry-run")]
    plan: bool,
}

type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
enum CliError {
    #[error("missing destination file operand after '{}'", .operand.display())]
    MissingDestinationOperand { operand: PathBuf },

    #[error("target '{}' is not a directory", .path.display())]
    TargetNotDirectory { path: PathBuf },
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(status) => ExitCode::from(status.code()),
        Err(error) => {
            eprintln!("{PROGRAM}: {error}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "error" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args) -> CliResult<Status> {
    let (sources, dest) = resolve_sources_and_dest(args)?;
    let options = build_options(args);

    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();

    if args.plan {
        return Ok(print_plan(&mut out, &mut err, &options, &sources, &dest));
    }

    debug!(?options, sources = sources.len(), dest = %dest.display(), "starting copy");
    let mut engine = CopyEngine::new(options).with_program_name(PROGRAM);
    let status = engine.execute_batch(&mut out, &mut err, &sources, &dest);

    if args.verbose {
        print_stats(&mut out, engine.stats());
    }

    Ok(status)
}

fn resolve_sources_and_dest(args: &Args) -> CliResult<(Vec<PathBuf>, PathBuf)> {
    if let Some(ref target_dir) = args.target_directory {
        if !target_dir.is_dir() {
            return Err(CliError::TargetNotDirectory {
                path: target_dir.clone(),
            });
        }
        return Ok((args.sources.clone(), target_dir.clone()));
    }

    match args.sources.split_last() {
        Some((dest, sources)) if !sources.is_empty() => {
            if sources.len() > 1 && !dest.is_dir() && dest.exists() {
                return Err(CliError::TargetNotDirectory { path: dest.clone() });
            }
            Ok((sources.to_vec(), dest.clone()))
        }
        _ => Err(CliError::MissingDestinationOperand {
            operand: args.sources.first().cloned().unwrap_or_default(),
        }),
    }
}

fn build_options(args: &Args) -> CopyOptions {
    CopyOptions {
        recursive: args.recursive,
        interactive: args.interactive,
        force: args.force,
        preserve: args.preserve,
        no_dereference: args.no_dereference,
    }
}

/// List planned operations; directories are expanded when recursive.
fn print_plan(
    out: &mut dyn Write,
    err: &mut dyn Write,
    options: &CopyOptions,
    sources: &[PathBuf],
    dest: &Path,
) -> Status {
    let walker = TreeWalker::new().with_follow_links(!options.no_dereference);
    let mut status = Status::Success;

    for source in sources {
        let op = match plan_operation(options, source, dest) {
            Ok(op) => op,
            Err(error) => {
                let failure = Failure::new("stat", source, error);
                let _ = writeln!(err, "{}", failure.diagnostic(PROGRAM));
                status = Status::GeneralError;
                continue;
            }
        };

        let _ = writeln!(
            out,
            "{} {} -> {}{}",
            op.source_type.as_str(),
            op.source.display(),
            op.final_dest_path.display(),
            if op.dest_exists { " (exists)" } else { "" }
        );

        if op.source_type != FileType::Directory || !options.recursive {
            continue;
        }

        match walker.walk(&op.source) {
            Ok(entries) => {
                for entry in entries {
                    let _ = writeln!(
                        out,
                        "{}{} {}",
                        "  ".repeat(entry.depth),
                        entry.file_type.as_str(),
                        entry.path.display()
                    );
                }
            }
            Err(error) => {
                let failure = Failure::new("read directory", &op.source, error);
                let _ = writeln!(err, "{}", failure.diagnostic(PROGRAM));
                status = Status::GeneralError;
            }
        }
    }

    status
}

fn print_stats(out: &mut dyn Write, stats: &CopyStats) {
    let mut parts = vec![];
    if stats.files_copied > 0 {
        parts.push(format!("{} files", stats.files_copied));
    }
    if stats.symlinks_copied > 0 {
        parts.push(format!("{} symlinks", stats.symlinks_copied));
    }
    if stats.directories_copied > 0 {
        parts.push(format!("{} dirs", stats.directories_copied));
    }

    if parts.is_empty() {
        let _ = writeln!(out, "Nothing copied");
    } else {
        let _ = writeln!(
            out,
            "Copied {} ({})",
            parts.join(", "),
            format_bytes(stats.bytes_copied)
        );
    }

    if stats.errors_encountered > 0 {
        let _ = writeln!(out, "{} errors", stats.errors_encountered);
    }
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
