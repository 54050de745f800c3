//! Access to the class files of a single platform module.
//!
//! A modular runtime keeps its modules either in the `lib/modules` jimage
//! or, for exploded builds, as plain directories under `modules/<name>`.
//! Both are exposed through [`ModuleImage`].

use crate::entry::{read_all, ClassSet, CLASS_SUFFIX, MODULE_DESCRIPTOR};
use crate::error::{Error, Result};
use bytes::Bytes;
use ristretto_jimage::Image;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// A source of per-module class files
pub trait ModuleImage {
    /// Human readable location, used in logs and errors
    fn describe(&self) -> String;

    /// Reads every class file of `module`, keyed by its path relative to the
    /// module root. The module descriptor is excluded.
    ///
    /// Fails with [`Error::ModuleNotFound`] if the image has no such module.
    fn module_classes(&self, module: &str) -> Result<ClassSet>;
}

/// Returns true if a module-relative path names a class other than a descriptor
fn is_module_class(relative: &str) -> bool {
    let file_name = relative.rsplit('/').next().unwrap_or(relative);
    file_name.ends_with(CLASS_SUFFIX) && file_name != MODULE_DESCRIPTOR
}

/// The `lib/modules` runtime image
#[derive(Debug, Clone)]
pub struct JimageModules {
    path: PathBuf,
}

impl JimageModules {
    /// Creates a reader for the jimage at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Maps a jimage resource to its module-relative class path.
///
/// Resource names never include the module: `sun/misc/Unsafe.class` is
/// owned by `jdk.unsupported`. Returns `None` for resources of other
/// modules and for anything that is not a class.
fn module_class_path<'a>(owner: &str, name: &'a str, module: &str) -> Option<&'a str> {
    if owner != module || !is_module_class(name) {
        return None;
    }
    Some(name)
}

impl ModuleImage for JimageModules {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn module_classes(&self, module: &str) -> Result<ClassSet> {
        debug!("Reading module {} from {}", module, self.path.display());
        let image = Image::from_file(&self.path).map_err(|e| Error::image_read(&self.path, e))?;

        let mut classes = ClassSet::new();
        let mut seen_module = false;
        for resource in image.iter() {
            let resource = resource.map_err(|e| Error::image_read(&self.path, e))?;
            if resource.module() != module {
                continue;
            }
            seen_module = true;

            let name = resource.name();
            let Some(relative) = module_class_path(resource.module(), &name, module) else {
                continue;
            };

            trace!("/{}/{}", module, relative);
            classes.insert(relative, Bytes::copy_from_slice(resource.data()));
        }

        if !seen_module {
            return Err(Error::module_not_found(module, self.describe()));
        }
        debug!("Module {} holds {} classes", module, classes.len());
        Ok(classes)
    }
}

/// An exploded image: one directory per module under a common root
#[derive(Debug, Clone)]
pub struct ExplodedModules {
    root: PathBuf,
}

impl ExplodedModules {
    /// Creates a reader for module directories below `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

/// Joins the components of a relative path with `/`, whatever the host separator
fn archive_path(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

impl ModuleImage for ExplodedModules {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    fn module_classes(&self, module: &str) -> Result<ClassSet> {
        let module_root = self.root.join(module);
        if !module_root.is_dir() {
            return Err(Error::module_not_found(module, self.describe()));
        }
        debug!("Walking module {}", module_root.display());

        let mut classes = ClassSet::new();
        for entry in WalkDir::new(&module_root)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| Error::walk(&module_root, e))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let Ok(relative) = path.strip_prefix(&module_root) else {
                continue;
            };
            let relative = archive_path(relative);
            if !is_module_class(&relative) {
                continue;
            }

            trace!("{}", relative);
            let file = File::open(path).map_err(|e| Error::file_read(path, e))?;
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            let data = read_all(file, size).map_err(|e| Error::file_read(path, e))?;
            classes.insert(relative, data);
        }
        Ok(classes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{installed_modular_home, write_file};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_module_class_path() {
        // (module, name) as reported by a jimage resource
        assert_eq!(
            module_class_path("jdk.unsupported", "sun/misc/Unsafe.class", "jdk.unsupported"),
            Some("sun/misc/Unsafe.class")
        );
        assert_eq!(
            module_class_path("java.base", "java/lang/Object.class", "jdk.unsupported"),
            None
        );
        assert_eq!(
            module_class_path("jdk.unsupported", "module-info.class", "jdk.unsupported"),
            None
        );
        assert_eq!(
            module_class_path("", "packages/sun.misc/jdk.unsupported", "jdk.unsupported"),
            None
        );
    }

    #[test]
    fn test_is_module_class() {
        assert!(is_module_class("sun/misc/Unsafe.class"));
        assert!(!is_module_class("module-info.class"));
        assert!(!is_module_class("sun/misc/resources.properties"));
        assert!(!is_module_class("META-INF/versions/9/module-info.class"));
    }

    #[test]
    fn test_exploded_module_classes() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("modules");
        write_file(&root.join("jdk.unsupported/sun/misc/Unsafe.class"), b"unsafe");
        write_file(&root.join("jdk.unsupported/sun/misc/Signal.class"), b"signal");
        write_file(&root.join("jdk.unsupported/module-info.class"), b"descriptor");
        write_file(&root.join("jdk.unsupported/sun/misc/notes.txt"), b"text");
        write_file(&root.join("java.base/java/lang/Object.class"), b"object");

        let classes = ExplodedModules::new(&root)
            .module_classes("jdk.unsupported")
            .unwrap();

        let mut paths: Vec<&str> = classes.paths().collect();
        paths.sort();
        assert_eq!(paths, vec!["sun/misc/Signal.class", "sun/misc/Unsafe.class"]);
        assert_eq!(
            classes.get("sun/misc/Unsafe.class").map(|b| &b[..]),
            Some(&b"unsafe"[..])
        );
    }

    #[test]
    fn test_jimage_module_classes() {
        let Some(home) = installed_modular_home() else {
            return;
        };
        let image = JimageModules::new(home.join("lib/modules"));

        let classes = image.module_classes("jdk.unsupported").unwrap();

        assert!(classes.contains("sun/misc/Unsafe.class"));
        assert!(!classes.contains("module-info.class"));
        assert!(classes
            .paths()
            .all(|p| !p.starts_with('/') && !p.starts_with("jdk.unsupported/")));
        let unsafe_class = classes.get("sun/misc/Unsafe.class").unwrap();
        assert_eq!(&unsafe_class[..4], b"\xCA\xFE\xBA\xBE");
    }

    #[test]
    fn test_jimage_missing_module() {
        let Some(home) = installed_modular_home() else {
            return;
        };
        let result = JimageModules::new(home.join("lib/modules")).module_classes("jdk.missing");

        assert!(matches!(result, Err(Error::ModuleNotFound { .. })));
    }

    #[test]
    fn test_exploded_missing_module() {
        let temp = TempDir::new().unwrap();
        let result = ExplodedModules::new(temp.path()).module_classes("jdk.unsupported");

        assert!(matches!(result, Err(Error::ModuleNotFound { .. })));
    }
}
