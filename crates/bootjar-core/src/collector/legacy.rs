//! Bootclasspath jars of pre-module runtimes.
//!
//! Before JDK 9 the platform classes ship in a handful of jars under
//! `jre/lib`. Every entry of every jar is copied as-is.

use super::DiscoveryStrategy;
use crate::entry::{read_all, ClassSet};
use crate::error::{Error, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use zip::ZipArchive;

/// The bootclasspath jars, in the order they are applied
pub const LEGACY_ARCHIVES: [&str; 5] = [
    "rt.jar",
    "resources.jar",
    "jsse.jar",
    "jce.jar",
    "charsets.jar",
];

/// Copies the bootclasspath jars found in a legacy library directory
#[derive(Debug, Clone)]
pub struct LegacyStrategy {
    lib_dir: PathBuf,
    archives: Vec<String>,
}

impl LegacyStrategy {
    /// Creates a strategy reading `archives` from `lib_dir`
    pub fn new(lib_dir: impl Into<PathBuf>, archives: Vec<String>) -> Self {
        Self {
            lib_dir: lib_dir.into(),
            archives,
        }
    }

    /// Copies every entry of one jar into `classes`, in central directory order
    fn copy_archive(path: &Path, classes: &mut ClassSet) -> Result<usize> {
        let file = File::open(path).map_err(|e| Error::file_read(path, e))?;
        let mut archive = ZipArchive::new(file).map_err(|e| Error::archive_open(path, e))?;

        for index in 0..archive.len() {
            let mut entry = archive
                .by_index(index)
                .map_err(|e| Error::archive_read(path, index, e))?;
            let name = entry.name().to_string();
            let size = entry.size();
            let data = read_all(&mut entry, size).map_err(|e| Error::entry_read(path, &name, e))?;
            trace!("{} ({} bytes)", name, data.len());
            classes.insert(name, data);
        }
        Ok(archive.len())
    }
}

impl DiscoveryStrategy for LegacyStrategy {
    fn name(&self) -> &'static str {
        "bootclasspath"
    }

    fn discover(&self) -> Result<ClassSet> {
        let mut classes = ClassSet::new();
        for name in &self.archives {
            let path = self.lib_dir.join(name);
            if !path.exists() {
                debug!("Skipping missing {}", path.display());
                continue;
            }
            let copied = Self::copy_archive(&path, &mut classes)?;
            debug!("Copied {} entries from {}", copied, path.display());
        }
        Ok(classes)
    }
}
