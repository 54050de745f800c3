//! Fixtures for building fake runtime layouts.

use std::fs::{self, File};
use std::io::Write;
use crate::java_home::resolve_java_home;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Writes a deflated zip at `path` with the given entries, in order.
///
/// Names ending in `/` become directory entries.
pub(crate) fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut zip = ZipWriter::new(File::create(path).unwrap());
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, data) in entries {
        if name.ends_with('/') {
            zip.add_directory(*name, options).unwrap();
        } else {
            zip.start_file(*name, options).unwrap();
            zip.write_all(data).unwrap();
        }
    }
    zip.finish().unwrap();
}

/// Writes a file, creating parent directories
pub(crate) fn write_file(path: &Path, data: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, data).unwrap();
}

/// Lays out a modular runtime: a `ct.sym` grouped by module in every
/// section, the way current runtimes ship it, and an exploded
/// `jdk.unsupported` module.
pub(crate) fn modular_home(home: &Path) {
    write_zip(
        &home.join("lib/ct.sym"),
        &[
            ("87/java.base/java/lang/Object.sig", b"object-8"),
            ("8/java.base/java/util/Map$Entry.sig", b"entry-8"),
            ("9/system-modules", b"java.base\njdk.unsupported\n"),
            ("9ABC/java.base/java/lang/Module.sig", b"module-9"),
            ("9ABC/java.base/module-info.sig", b"descriptor-9"),
        ],
    );
    write_file(
        &home.join("modules/jdk.unsupported/sun/misc/Unsafe.class"),
        b"unsafe",
    );
    write_file(
        &home.join("modules/jdk.unsupported/module-info.class"),
        b"descriptor",
    );
}

/// Home of an installed module-based JDK, if the host has one.
///
/// `JAVA_HOME` is tried first, then the `java` launcher on the `PATH`.
pub(crate) fn installed_modular_home() -> Option<PathBuf> {
    std::env::var_os("JAVA_HOME")
        .map(PathBuf::from)
        .filter(|home| home.join("lib/modules").is_file())
        .or_else(|| resolve_java_home(None).ok())
        .filter(|home| home.join("lib/modules").is_file())
}
