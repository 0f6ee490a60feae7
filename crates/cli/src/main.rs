//! Journey CLI
//!
//! Command-line wrapper around the journey archive library.
//!
//! # Commands
//!
//! - `append` - Append a sample entry (smoke test)
//! - `read` - Print the payload of `hello.txt`
//! - `list` - Dump every entry visited by a load
//! - `compact` - Write a compacted copy of an archive
//!
//! Per-operation success is printed as `1`/`0` on stdout; the process
//! exits zero whenever dispatch succeeds, so scripts keep working.

use anyhow::Result;
use clap::{Parser, Subcommand};
use journal::Journal;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

/// Journey archive command-line tools.
#[derive(Parser)]
#[command(name = "journey")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Append a sample entry and an empty-named entry (smoke test)
    Append {
        /// Archive to append to (created if missing)
        dst: PathBuf,
    },

    /// Load an archive and print the payload of `hello.txt`
    Read {
        /// Archive to read
        src: PathBuf,
    },

    /// Load an archive and dump every visited entry
    List {
        /// Archive to list
        src: PathBuf,
    },

    /// Write a compacted copy keeping the newest revision per name
    Compact {
        /// Archive to compact
        src: PathBuf,
        /// Destination for the compacted archive
        dst: PathBuf,
    },
}

/// Wall-clock seconds since epoch, the default upper window bound.
fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Prints an operation outcome the way the archive scripts expect it.
fn outcome(ok: bool) {
    println!("{}", u8::from(ok));
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Append { dst } => {
            let mut j = Journal::new(&dst)?;
            // extend whatever the previous revision held
            let mut payload = match j.load(0, now()) {
                Ok(_) => j.read("hello.txt").unwrap_or_default(),
                Err(_) => Vec::new(),
            };
            payload.push(b'.');
            outcome(j.append("hello.txt", &payload, now()).is_ok());
            // an empty name must be rejected
            outcome(j.append("", b"", now()).is_ok());
        }

        Commands::Read { src } => {
            let mut j = Journal::new(&src)?;
            let loaded = j.load(0, now());
            tracing::debug!(path = %src.display(), ok = loaded.is_ok(), "loaded archive");
            outcome(loaded.is_ok());
            match j.read("hello.txt") {
                Ok(bytes) => {
                    let mut out = io::stdout().lock();
                    out.write_all(&bytes)?;
                    out.write_all(b"\n")?;
                }
                Err(_) => println!(),
            }
        }

        Commands::List { src } => {
            let mut j = Journal::new(&src)?;
            let mut out = io::stdout().lock();
            let loaded = j.load_verbose(0, now(), &mut out);
            drop(out);
            outcome(loaded.is_ok());
        }

        Commands::Compact { src, dst } => {
            let mut j = Journal::new(&src)?;
            outcome(j.load(0, now()).is_ok());
            let compacted = j.compact(&dst);
            tracing::debug!(
                entries = j.toc().len(),
                dst = %dst.display(),
                ok = compacted.is_ok(),
                "compacted archive"
            );
            outcome(compacted.is_ok());
        }
    }

    Ok(())
}
