//! Release views from the JDK symbol file.
//!
//! `lib/ct.sym` is what the compiler consults when asked to compile
//! against an older release. It is a zip whose top-level directory names
//! list the releases an entry applies to, one base-36 character per
//! release (`8`, `9`, `A` for 10, `B` for 11, ...). Below that, a section
//! either holds packages directly or one directory per module:
//!
//! ```text
//! 87/java/lang/Object.sig
//! 87/java.base/java/lang/Object.sig
//! 9ABC/java.base/java/lang/Module.sig
//! ```
//!
//! Which of the two a section uses is read from its content, not from the
//! release: current runtimes group even the release 8 sections by module.
//! `.sig` files are class files with method bodies stripped.

use crate::entry::{binary_name_to_path, read_all, ClassSet};
use crate::error::{Error, Result};
use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use zip::ZipArchive;

/// Oldest release the compiler still accepts for `--release`
pub const OLDEST_RELEASE: u32 = 8;

const SIGNATURE_SUFFIXES: [&str; 2] = [".sig", ".class"];

/// Marker file of sections describing a modular release
const SYSTEM_MODULES: &str = "system-modules";

const MODULE_SIGNATURE: &str = "module-info.sig";

/// How a symbol file section lays out its entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionLayout {
    /// `<codes>/<package path>/<Class>.sig`
    Packages,
    /// `<codes>/<module>/<package path>/<Class>.sig`
    Modules,
}

/// The platform class listing as seen when compiling for one release
#[derive(Debug, Clone)]
pub struct ReleaseView {
    symbol_file: PathBuf,
    release: u32,
}

impl ReleaseView {
    /// Creates a view over `symbol_file` for `release`
    pub fn new(symbol_file: impl Into<PathBuf>, release: u32) -> Self {
        Self {
            symbol_file: symbol_file.into(),
            release,
        }
    }

    /// Path of the symbol file backing this view
    pub fn symbol_file(&self) -> &Path {
        &self.symbol_file
    }

    /// Lists every class of the release and reads its bytes
    pub fn classes(&self) -> Result<ClassSet> {
        let code = release_code(self.release)?;
        if !self.symbol_file.is_file() {
            return Err(Error::ReleaseViewUnavailable {
                release: self.release,
                path: self.symbol_file.clone(),
            });
        }

        debug!(
            "Reading release {} view from {}",
            self.release,
            self.symbol_file.display()
        );

        let file = File::open(&self.symbol_file)
            .map_err(|e| Error::file_read(&self.symbol_file, e))?;
        let mut archive =
            ZipArchive::new(file).map_err(|e| Error::archive_open(&self.symbol_file, e))?;

        let modular = modular_sections(archive.file_names());
        debug!("Sections grouped by module: {}", modular.len());

        let mut classes = ClassSet::new();
        for index in 0..archive.len() {
            let mut entry = archive
                .by_index(index)
                .map_err(|e| Error::archive_read(&self.symbol_file, index, e))?;
            if entry.is_dir() {
                continue;
            }

            let name = entry.name().to_string();
            let Some((section, rest)) = split_section(&name) else {
                continue;
            };
            if !section.contains(code) {
                continue;
            }
            let layout = if modular.contains(section) {
                SectionLayout::Modules
            } else {
                SectionLayout::Packages
            };
            let Some(binary_name) = infer_binary_name(rest, layout) else {
                continue;
            };

            trace!("{} -> {}", name, binary_name);
            let size = entry.size();
            let data = read_all(&mut entry, size)
                .map_err(|e| Error::entry_read(&self.symbol_file, &name, e))?;
            classes.insert(binary_name_to_path(&binary_name), data);
        }

        debug!(
            "Release {} view lists {} classes",
            self.release,
            classes.len()
        );
        Ok(classes)
    }
}

/// Encodes a release number as its symbol file directory character
pub fn release_code(release: u32) -> Result<char> {
    char::from_digit(release, 36)
        .map(|c| c.to_ascii_uppercase())
        .ok_or(Error::UnsupportedRelease(release))
}

/// Splits an entry name into its release section and the path below it
fn split_section(entry_name: &str) -> Option<(&str, &str)> {
    let (section, rest) = entry_name.split_once('/')?;
    if section.is_empty() || !section.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some((section, rest))
}

/// Returns true if a directory directly below a section names a module.
///
/// Platform module names are dotted (`java.base`, `jdk.unsupported`), top
/// level package directories (`java`, `javax`, `sun`) never are.
fn is_module_dir(segment: &str) -> bool {
    segment.contains('.')
}

/// Finds the sections whose children are module directories.
///
/// A section is modular if it carries a `system-modules` list, a module
/// descriptor one level down, or a dotted directory name one level down.
fn modular_sections<'a>(names: impl IntoIterator<Item = &'a str>) -> HashSet<String> {
    let mut modular = HashSet::new();
    for name in names {
        let Some((section, rest)) = split_section(name) else {
            continue;
        };
        if modular.contains(section) {
            continue;
        }
        let is_modular = match rest.split_once('/') {
            Some((child, below)) => is_module_dir(child) || below == MODULE_SIGNATURE,
            None => rest == SYSTEM_MODULES,
        };
        if is_modular {
            modular.insert(section.to_string());
        }
    }
    modular
}

/// Derives the binary name of the path below a section.
///
/// Returns `None` for module descriptors and non-class resources.
fn infer_binary_name(rest: &str, layout: SectionLayout) -> Option<String> {
    let rest = match layout {
        SectionLayout::Packages => rest,
        SectionLayout::Modules => rest.split_once('/')?.1,
    };

    let stem = SIGNATURE_SUFFIXES
        .iter()
        .find_map(|suffix| rest.strip_suffix(suffix))?;
    if stem.is_empty() || stem == "module-info" || stem.ends_with("/module-info") {
        return None;
    }

    Some(stem.replace('/', "."))
}
