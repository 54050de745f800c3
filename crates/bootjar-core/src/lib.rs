//! # bootjar-core
//!
//! A library for dumping the platform classes of a Java runtime into a
//! reproducible archive.
//!
//! This crate provides the core functionality for:
//! - Discovering platform classes in pre-module (`jre/lib/*.jar`) and
//!   module-based (`lib/ct.sym`, `lib/modules`) runtimes
//! - Writing them as a zip with sorted, stored, fixed-timestamp entries
//!
//! ## Architecture
//!
//! - [`collector`]: Runtime layouts and discovery strategies
//! - [`archive`]: Deterministic archive writing
//! - [`entry`]: Collected entries
//! - [`java_home`]: Locating the runtime
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```no_run
//! use bootjar_core::{write_archive, Collector, RuntimeLayout};
//!
//! let layout = RuntimeLayout::new("/usr/lib/jvm/java-17-openjdk");
//! let classes = Collector::new(layout).collect()?;
//! let summary = write_archive("platform.jar", classes)?;
//! println!("{} entries", summary.entry_count());
//! # Ok::<(), bootjar_core::Error>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod archive;
pub mod collector;
pub mod entry;
pub mod error;
pub mod java_home;

#[cfg(test)]
mod testutil;

// Re-export primary types for convenience
pub use archive::{write_archive, ArchiveRecord, ArchiveSummary, ArchiveWriter, FIXED_TIMESTAMP};
pub use collector::{Collector, CollectorConfig, DiscoveryStrategy, RuntimeLayout};
pub use entry::{ClassSet, Entry};
pub use error::{Error, Result};
pub use java_home::resolve_java_home;

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
