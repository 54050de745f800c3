//! Collected class entries.
//!
//! A [`ClassSet`] maps archive paths (`java/lang/Object.class`) to the raw
//! bytes found in the runtime. It is unordered while it is being built;
//! [`ClassSet::into_sorted`] imposes the archive order.

use bytes::Bytes;
use std::collections::HashMap;
use std::io::Read;
use tracing::trace;

/// File suffix of a class file
pub const CLASS_SUFFIX: &str = ".class";

/// File name of a module descriptor
pub const MODULE_DESCRIPTOR: &str = "module-info.class";

/// A single archive entry: path plus raw content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Forward-slash separated archive path
    pub path: String,
    /// Raw content, stored verbatim
    pub data: Bytes,
}

impl Entry {
    /// Creates a new entry
    pub fn new(path: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            path: path.into(),
            data: data.into(),
        }
    }
}

/// Mapping from archive path to content, last writer wins
#[derive(Debug, Clone, Default)]
pub struct ClassSet {
    entries: HashMap<String, Bytes>,
}

impl ClassSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, replacing any previous content under the same path.
    ///
    /// Returns the replaced content, if any.
    pub fn insert(&mut self, path: impl Into<String>, data: impl Into<Bytes>) -> Option<Bytes> {
        let path = path.into();
        let previous = self.entries.insert(path.clone(), data.into());
        if previous.is_some() {
            trace!("Replaced earlier entry: {}", path);
        }
        previous
    }

    /// Moves every entry of `other` into this set, `other` winning on conflicts
    pub fn merge(&mut self, other: ClassSet) {
        for (path, data) in other.entries {
            self.insert(path, data);
        }
    }

    /// Returns the content stored under `path`
    pub fn get(&self, path: &str) -> Option<&Bytes> {
        self.entries.get(path)
    }

    /// Returns true if an entry exists under `path`
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entries were collected
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all payload sizes
    pub fn total_bytes(&self) -> u64 {
        self.entries.values().map(|data| data.len() as u64).sum()
    }

    /// Iterates over paths in arbitrary order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Consumes the set and returns its entries in ascending path order
    pub fn into_sorted(self) -> Vec<Entry> {
        let mut entries: Vec<Entry> = self
            .entries
            .into_iter()
            .map(|(path, data)| Entry { path, data })
            .collect();
        // Paths are unique keys, so an unstable sort is still a total order.
        entries.sort_unstable_by(|a, b| a.path.cmp(&b.path));
        entries
    }
}

impl<P: Into<String>, D: Into<Bytes>> FromIterator<(P, D)> for ClassSet {
    fn from_iter<I: IntoIterator<Item = (P, D)>>(iter: I) -> Self {
        let mut set = ClassSet::new();
        for (path, data) in iter {
            set.insert(path, data);
        }
        set
    }
}

/// Converts a binary class name (`java.util.Map$Entry`) into its archive path
pub fn binary_name_to_path(binary_name: &str) -> String {
    let mut path = binary_name.replace('.', "/");
    path.push_str(CLASS_SUFFIX);
    path
}

/// Reads a stream to its end into an immutable buffer.
///
/// `size_hint` is only used to preallocate.
pub fn read_all(mut reader: impl Read, size_hint: u64) -> std::io::Result<Bytes> {
    let mut buf = Vec::with_capacity(usize::try_from(size_hint).unwrap_or(0));
    reader.read_to_end(&mut buf)?;
    Ok(Bytes::from(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_binary_name_to_path() {
        assert_eq!(binary_name_to_path("java.lang.Object"), "java/lang/Object.class");
        assert_eq!(
            binary_name_to_path("java.util.Map$Entry"),
            "java/util/Map$Entry.class"
        );
    }

    #[test]
    fn test_last_writer_wins() {
        let mut set = ClassSet::new();
        assert!(set.insert("a/A.class", vec![1u8]).is_none());
        let previous = set.insert("a/A.class", vec![2u8]);

        assert_eq!(previous, Some(Bytes::from_static(&[1])));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("a/A.class"), Some(&Bytes::from_static(&[2])));
    }

    #[test]
    fn test_merge_prefers_incoming() {
        let mut base: ClassSet = [("a/A.class", vec![1u8]), ("a/B.class", vec![2u8])]
            .into_iter()
            .collect();
        let other: ClassSet = [("a/B.class", vec![9u8]), ("a/C.class", vec![3u8])]
            .into_iter()
            .collect();
        base.merge(other);

        assert_eq!(base.len(), 3);
        assert_eq!(base.get("a/B.class"), Some(&Bytes::from_static(&[9])));
        assert_eq!(base.total_bytes(), 3);
    }

    #[test]
    fn test_into_sorted() {
        let set: ClassSet = [
            ("java/util/Map.class", vec![0u8]),
            ("a/B.class", vec![0x01, 0x02]),
            ("a/A.class", vec![0x03]),
            ("java/util/Map$Entry.class", vec![0u8]),
        ]
        .into_iter()
        .collect();

        let paths: Vec<String> = set.into_sorted().into_iter().map(|e| e.path).collect();
        assert_eq!(
            paths,
            vec![
                "a/A.class",
                "a/B.class",
                "java/util/Map$Entry.class",
                "java/util/Map.class",
            ]
        );
    }

    #[test]
    fn test_read_all() {
        let data = read_all(&b"\xCA\xFE\xBA\xBE"[..], 4).unwrap();
        assert_eq!(data.as_ref(), b"\xCA\xFE\xBA\xBE");
    }
}
