//! Error types for the bootjar-core library.
//!
//! Every failure here is an environment or I/O failure. None of them is
//! recovered locally: they carry enough context (path, entry name) to be
//! reported once at the top level.

use std::path::PathBuf;
use thiserror::Error;
use zip::result::ZipError;

/// Result type alias for bootjar operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all bootjar operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Failed to read a file from the runtime image
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        /// Path to the file that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to create or write the output file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        /// Path to the file that failed to write
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to open a zip archive (jar or symbol file)
    #[error("failed to open archive '{path}': {source}")]
    ArchiveOpen {
        /// Path to the archive
        path: PathBuf,
        /// Underlying zip error
        #[source]
        source: ZipError,
    },

    /// Failed to locate an entry inside an opened archive
    #[error("failed to read entry #{index} of archive '{path}': {source}")]
    ArchiveRead {
        /// Path to the archive
        path: PathBuf,
        /// Position of the entry in the central directory
        index: usize,
        /// Underlying zip error
        #[source]
        source: ZipError,
    },

    /// Failed to read the content of an archive entry
    #[error("failed to read entry '{entry}' of archive '{path}': {source}")]
    EntryRead {
        /// Path to the archive
        path: PathBuf,
        /// Name of the entry
        entry: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to start a record in the output archive
    #[error("failed to add entry '{entry}' to archive: {source}")]
    ArchiveWrite {
        /// Name of the entry
        entry: String,
        /// Underlying zip error
        #[source]
        source: ZipError,
    },

    /// Failed to write a record payload to the output archive
    #[error("failed to write entry '{entry}' to archive: {source}")]
    EntryWrite {
        /// Name of the entry
        entry: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to finalize the output archive
    #[error("failed to finalize archive: {0}")]
    ArchiveFinish(#[source] ZipError),

    /// Failed to open or read the runtime's module image
    #[error("failed to read module image '{path}': {details}")]
    ImageRead {
        /// Path to the module image
        path: PathBuf,
        /// Description of the failure
        details: String,
    },

    /// The runtime has no module image at any known location
    #[error("no module image found under '{home}'")]
    ImageNotFound {
        /// Java home that was probed
        home: PathBuf,
    },

    /// The requested module is not part of the module image
    #[error("module '{module}' not found in '{image}'")]
    ModuleNotFound {
        /// Name of the missing module
        module: String,
        /// Description of the image that was searched
        image: String,
    },

    /// The symbol file describing older releases is missing
    #[error("release {release} view unavailable: '{path}' does not exist")]
    ReleaseViewUnavailable {
        /// Requested release
        release: u32,
        /// Expected location of the symbol file
        path: PathBuf,
    },

    /// The release number cannot be encoded as a symbol file release code
    #[error("unsupported release {0}")]
    UnsupportedRelease(u32),

    /// Failed to traverse a directory
    #[error("failed to walk '{path}': {source}")]
    Walk {
        /// Root of the traversal
        path: PathBuf,
        /// Underlying walkdir error
        #[source]
        source: walkdir::Error,
    },

    /// No Java installation could be located
    #[error("no Java home found: {0}")]
    JavaHomeNotFound(String),

    /// The fixed archive timestamp is outside the zip date range
    #[error("invalid archive timestamp: {0}")]
    InvalidTimestamp(String),
}

impl Error {
    /// Creates a new file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a new file write error
    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Creates a new archive open error
    pub fn archive_open(path: impl Into<PathBuf>, source: ZipError) -> Self {
        Self::ArchiveOpen {
            path: path.into(),
            source,
        }
    }

    /// Creates a new archive read error
    pub fn archive_read(path: impl Into<PathBuf>, index: usize, source: ZipError) -> Self {
        Self::ArchiveRead {
            path: path.into(),
            index,
            source,
        }
    }

    /// Creates a new entry read error
    pub fn entry_read(
        path: impl Into<PathBuf>,
        entry: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Self::EntryRead {
            path: path.into(),
            entry: entry.into(),
            source,
        }
    }

    /// Creates a new module image read error
    pub fn image_read(path: impl Into<PathBuf>, details: impl ToString) -> Self {
        Self::ImageRead {
            path: path.into(),
            details: details.to_string(),
        }
    }

    /// Creates a new module not found error
    pub fn module_not_found(module: impl Into<String>, image: impl Into<String>) -> Self {
        Self::ModuleNotFound {
            module: module.into(),
            image: image.into(),
        }
    }

    /// Creates a new walk error
    pub fn walk(path: impl Into<PathBuf>, source: walkdir::Error) -> Self {
        Self::Walk {
            path: path.into(),
            source,
        }
    }
}
