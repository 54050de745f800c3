//! Deterministic archive output.
//!
//! Entries are written in ascending path order, uncompressed, all stamped
//! with [`FIXED_TIMESTAMP`]. The same [`ClassSet`] always produces the same
//! bytes, whatever order it was filled in.

use crate::entry::ClassSet;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Output buffer size
pub const BUFFER_CAPACITY: usize = 64 * 1024;

/// Permissions recorded for every entry
const ENTRY_PERMISSIONS: u32 = 0o644;

/// A calendar timestamp as stored in zip headers (no time zone)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    /// Year, 1980 to 2107
    pub year: u16,
    /// Month, 1 to 12
    pub month: u8,
    /// Day of month, 1 to 31
    pub day: u8,
    /// Hour, 0 to 23
    pub hour: u8,
    /// Minute, 0 to 59
    pub minute: u8,
    /// Second, 0 to 58 (zip stores two-second resolution)
    pub second: u8,
}

/// Modification time of every entry: 2010-01-01 00:00:00
pub const FIXED_TIMESTAMP: Timestamp = Timestamp {
    year: 2010,
    month: 1,
    day: 1,
    hour: 0,
    minute: 0,
    second: 0,
};

impl Timestamp {
    /// Converts to the zip crate's date-time
    pub fn to_zip(self) -> Result<DateTime> {
        DateTime::from_date_and_time(
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
        )
        .map_err(|e| Error::InvalidTimestamp(format!("{self:?}: {e}")))
    }

    /// MS-DOS `(time, date)` words, as found in zip headers.
    ///
    /// `None` for years the DOS format cannot hold.
    #[cfg(test)]
    pub(crate) fn to_dos(self) -> Option<(u16, u16)> {
        let years = self.year.checked_sub(1980).filter(|y| *y < 128)?;
        let time = (u16::from(self.hour) << 11)
            | (u16::from(self.minute) << 5)
            | (u16::from(self.second) / 2);
        let date = (years << 9) | (u16::from(self.month) << 5) | u16::from(self.day);
        Some((time, date))
    }
}

/// What was written for one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRecord {
    /// Entry name
    pub name: String,
    /// Payload size, compressed and uncompressed alike
    pub size: u64,
    /// CRC-32 of the payload
    pub crc32: u32,
}

impl ArchiveRecord {
    fn describe(name: &str, data: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            size: data.len() as u64,
            crc32: crc32fast::hash(data),
        }
    }
}

/// Summary of a written archive file
#[derive(Debug, Clone)]
pub struct ArchiveSummary {
    /// Path of the archive
    pub path: PathBuf,
    /// Records in the order they were written
    pub records: Vec<ArchiveRecord>,
}

impl ArchiveSummary {
    /// Number of entries written
    pub fn entry_count(&self) -> usize {
        self.records.len()
    }

    /// Total payload bytes written
    pub fn payload_bytes(&self) -> u64 {
        self.records.iter().map(|r| r.size).sum()
    }
}

/// Zip writer that stores every entry uncompressed with a fixed timestamp.
///
/// Entries are written in the order they are added; [`write_entries`] takes
/// care of sorting.
pub struct ArchiveWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    options: SimpleFileOptions,
    records: Vec<ArchiveRecord>,
}

impl<W: Write + Seek> ArchiveWriter<W> {
    /// Starts a new archive on `inner`
    pub fn new(inner: W) -> Result<Self> {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .last_modified_time(FIXED_TIMESTAMP.to_zip()?)
            .unix_permissions(ENTRY_PERMISSIONS);
        Ok(Self {
            zip: ZipWriter::new(inner),
            options,
            records: Vec::new(),
        })
    }

    /// Appends one stored entry and returns its record.
    ///
    /// Empty entries whose name ends in `/` are recorded as directories.
    pub fn add_entry(&mut self, name: &str, data: &[u8]) -> Result<ArchiveRecord> {
        let record = ArchiveRecord::describe(name, data);
        trace!("{} ({} bytes, crc {:08x})", name, record.size, record.crc32);

        let started = if name.ends_with('/') && data.is_empty() {
            self.zip.add_directory(name, self.options)
        } else {
            self.zip.start_file(name, self.options)
        };
        started.map_err(|e| Error::ArchiveWrite {
            entry: name.to_string(),
            source: e,
        })?;
        self.zip.write_all(data).map_err(|e| Error::EntryWrite {
            entry: name.to_string(),
            source: e,
        })?;

        self.records.push(record.clone());
        Ok(record)
    }

    /// Writes the central directory and returns the sink and the records
    pub fn finish(self) -> Result<(W, Vec<ArchiveRecord>)> {
        let inner = self.zip.finish().map_err(Error::ArchiveFinish)?;
        Ok((inner, self.records))
    }
}

/// Writes `classes` in ascending path order into `sink`
pub fn write_entries<W: Write + Seek>(
    sink: W,
    classes: ClassSet,
) -> Result<(W, Vec<ArchiveRecord>)> {
    let mut writer = ArchiveWriter::new(sink)?;
    for entry in classes.into_sorted() {
        writer.add_entry(&entry.path, &entry.data)?;
    }
    writer.finish()
}

/// Creates (or truncates) `path` and writes `classes` into it.
///
/// On failure the file is left as far as it got.
pub fn write_archive(path: impl AsRef<Path>, classes: ClassSet) -> Result<ArchiveSummary> {
    let path = path.as_ref();
    debug!("Writing {} entries to {}", classes.len(), path.display());

    let file = File::create(path).map_err(|e| Error::file_write(path, e))?;
    let sink = BufWriter::with_capacity(BUFFER_CAPACITY, file);
    let (mut sink, records) = write_entries(sink, classes)?;
    sink.flush().map_err(|e| Error::file_write(path, e))?;

    Ok(ArchiveSummary {
        path: path.to_path_buf(),
        records,
    })
}
