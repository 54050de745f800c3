//! Locating the runtime to dump.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

const JAVA_HOME_PROPERTY: &str = "java.home = ";

/// Resolves the Java home of the runtime to dump.
///
/// An explicit directory is used as-is. Otherwise the `java` launcher on the
/// `PATH` is asked for its `java.home` property.
pub fn resolve_java_home(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(home) = explicit {
        if !home.is_dir() {
            return Err(Error::JavaHomeNotFound(format!(
                "'{}' is not a directory",
                home.display()
            )));
        }
        return Ok(home.to_path_buf());
    }

    debug!("Asking the java launcher for java.home");
    let output = Command::new("java")
        .arg("-XshowSettings:properties")
        .arg("-version")
        .output()
        .map_err(|e| Error::JavaHomeNotFound(format!("failed to run java: {e}")))?;

    // The settings dump goes to stderr
    let stderr = String::from_utf8_lossy(&output.stderr);
    parse_java_home(&stderr).ok_or_else(|| {
        Error::JavaHomeNotFound("java did not report a java.home property".to_string())
    })
}

/// Extracts `java.home` from `-XshowSettings:properties` output
fn parse_java_home(settings: &str) -> Option<PathBuf> {
    settings
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix(JAVA_HOME_PROPERTY))
        .map(str::trim)
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}
