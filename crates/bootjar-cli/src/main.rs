//! bootjar - Dump the platform classpath of a JDK into a deterministic jar
//!
//! Every class the runtime considers part of its own library is written,
//! sorted and uncompressed, with a fixed timestamp, so that two runs
//! against the same JDK produce identical bytes.

use anyhow::{Context, Result};
use bootjar_core::{
    resolve_java_home, write_archive, ArchiveSummary, Collector, CollectorConfig, RuntimeLayout,
};
use clap::error::ErrorKind;
use clap::Parser;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: bootjar <output jar>";

/// Dump the platform classpath of a JDK into a deterministic jar
#[derive(Parser, Debug)]
#[command(name = "bootjar")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Archive to write (overwritten if it exists)
    output: PathBuf,

    /// Java installation to read (defaults to the `java` on the PATH)
    #[arg(long, env = "JAVA_HOME")]
    java_home: Option<PathBuf>,

    /// Release whose API view is dumped from module-based runtimes
    #[arg(long, default_value_t = bootjar_core::collector::OLDEST_RELEASE)]
    release: u32,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(_) => {
            eprintln!("{USAGE}");
            return Ok(ExitCode::from(1));
        }
    };

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let summary = run(&cli)?;
    report(&summary)?;
    Ok(ExitCode::SUCCESS)
}

/// Collect the platform classes and write the archive
fn run(cli: &Cli) -> Result<ArchiveSummary> {
    let java_home =
        resolve_java_home(cli.java_home.as_deref()).context("Failed to locate a Java runtime")?;
    let layout = RuntimeLayout::new(java_home);

    let config = CollectorConfig::new().release(cli.release);
    let classes = Collector::with_config(layout.clone(), config)
        .collect()
        .with_context(|| {
            format!(
                "Failed to collect platform classes from {}",
                layout.home().display()
            )
        })?;

    write_archive(&cli.output, classes)
        .with_context(|| format!("Failed to write archive: {}", cli.output.display()))
}

/// Log what was written, with a digest for reproducibility checks
fn report(summary: &ArchiveSummary) -> Result<()> {
    let digest = archive_digest(&summary.path)?;
    info!(
        "Wrote {} entries ({} bytes) to {} (blake3 {})",
        summary.entry_count(),
        summary.payload_bytes(),
        summary.path.display(),
        digest
    );
    Ok(())
}

/// BLAKE3 digest of the written archive, streamed from disk
fn archive_digest(path: &Path) -> Result<String> {
    let file =
        File::open(path).with_context(|| format!("Failed to read back {}", path.display()))?;
    let mut hasher = blake3::Hasher::new();
    hasher
        .update_reader(file)
        .with_context(|| format!("Failed to hash {}", path.display()))?;
    Ok(hasher.finalize().to_hex().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_single_output() {
        let cli = Cli::try_parse_from(["bootjar", "out.jar"]).unwrap();
        assert_eq!(cli.output, PathBuf::from("out.jar"));
        assert_eq!(cli.release, 8);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_parse_rejects_wrong_arity() {
        assert!(Cli::try_parse_from(["bootjar"]).is_err());
        assert!(Cli::try_parse_from(["bootjar", "a.jar", "b.jar"]).is_err());
    }

    #[test]
    fn test_archive_digest_is_stable() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.jar");
        std::fs::write(&path, b"PK\x05\x06").unwrap();

        let first = archive_digest(&path).unwrap();
        assert_eq!(first, archive_digest(&path).unwrap());
        assert_eq!(first.len(), 64);
        assert_eq!(first, blake3::hash(b"PK\x05\x06").to_hex().to_string());
    }

    #[test]
    fn test_archive_digest_spans_buffers() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("large.jar");
        let data: Vec<u8> = (0..300_000u32).map(|i| (i % 251) as u8).collect();
        std::fs::write(&path, &data).unwrap();

        assert_eq!(
            archive_digest(&path).unwrap(),
            blake3::hash(&data).to_hex().to_string()
        );
        assert!(archive_digest(&temp.path().join("missing.jar")).is_err());
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
