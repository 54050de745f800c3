//! Discovery of a runtime's platform classes.
//!
//! Two layouts exist in the wild:
//!
//! - **Bootclasspath** (JDK 8 and earlier): a few jars under `jre/lib`,
//!   read by [`LegacyStrategy`].
//! - **Modules** (JDK 9 and later): the oldest release's view from
//!   `lib/ct.sym` plus the `jdk.unsupported` module, read by
//!   [`ModuleStrategy`].
//!
//! [`Collector::collect`] runs the bootclasspath strategy first and falls
//! back to the module strategy only when it found nothing.
//!
//! ## Extensibility
//!
//! Both strategies implement [`DiscoveryStrategy`]:
//!
//! ```no_run
//! use bootjar_core::collector::DiscoveryStrategy;
//! use bootjar_core::{ClassSet, Result};
//!
//! struct Fixed;
//!
//! impl DiscoveryStrategy for Fixed {
//!     fn name(&self) -> &'static str {
//!         "fixed"
//!     }
//!
//!     fn discover(&self) -> Result<ClassSet> {
//!         Ok([("java/lang/Object.class", vec![0xCAu8, 0xFE, 0xBA, 0xBE])]
//!             .into_iter()
//!             .collect())
//!     }
//! }
//! ```

mod image;
mod legacy;
mod modular;
mod release;

use crate::entry::ClassSet;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub use image::{ExplodedModules, JimageModules, ModuleImage};
pub use legacy::{LegacyStrategy, LEGACY_ARCHIVES};
pub use modular::{ModuleStrategy, INTERNAL_MODULE};
pub use release::{release_code, ReleaseView, OLDEST_RELEASE};

/// A way of finding the platform classes of a runtime
pub trait DiscoveryStrategy {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Reads every platform class this strategy can see
    fn discover(&self) -> Result<ClassSet>;
}

/// Configuration for the collector
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Release whose view the module strategy reads
    pub release: u32,
    /// Module added on top of the release view
    pub internal_module: String,
    /// Bootclasspath jar names, in application order
    pub legacy_archives: Vec<String>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            release: OLDEST_RELEASE,
            internal_module: INTERNAL_MODULE.to_string(),
            legacy_archives: LEGACY_ARCHIVES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CollectorConfig {
    /// Creates a new collector config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the release read by the module strategy
    pub fn release(mut self, release: u32) -> Self {
        self.release = release;
        self
    }

    /// Sets the module added on top of the release view
    pub fn internal_module(mut self, module: impl Into<String>) -> Self {
        self.internal_module = module.into();
        self
    }

    /// Sets the bootclasspath jars to look for
    pub fn legacy_archives<I, S>(mut self, archives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.legacy_archives = archives.into_iter().map(Into::into).collect();
        self
    }
}

/// Well-known locations inside a Java home
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeLayout {
    home: PathBuf,
}

impl RuntimeLayout {
    /// Creates the layout of the runtime rooted at `java_home`.
    ///
    /// A JDK 8 `java.home` points at the bundled `jre` directory; the layout
    /// is anchored at its parent in that case.
    pub fn new(java_home: impl Into<PathBuf>) -> Self {
        let mut home = java_home.into();
        if home.ends_with("jre") {
            home.pop();
        }
        Self { home }
    }

    /// The Java home the layout is anchored at
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Directory holding the bootclasspath jars
    pub fn legacy_lib_dir(&self) -> PathBuf {
        self.home.join("jre").join("lib")
    }

    /// The compiler's symbol file for older releases
    pub fn symbol_file(&self) -> PathBuf {
        self.home.join("lib").join("ct.sym")
    }

    /// The jimage holding all modules
    pub fn jimage(&self) -> PathBuf {
        self.home.join("lib").join("modules")
    }

    /// Root of an exploded module image
    pub fn exploded_modules(&self) -> PathBuf {
        self.home.join("modules")
    }

    /// Opens whichever module image the runtime has, jimage first
    pub fn module_image(&self) -> Result<Box<dyn ModuleImage>> {
        let jimage = self.jimage();
        if jimage.is_file() {
            return Ok(Box::new(JimageModules::new(jimage)));
        }
        let exploded = self.exploded_modules();
        if exploded.is_dir() {
            return Ok(Box::new(ExplodedModules::new(exploded)));
        }
        Err(Error::ImageNotFound {
            home: self.home.clone(),
        })
    }
}

/// Runs the discovery strategies against a runtime layout
#[derive(Debug, Clone)]
pub struct Collector {
    layout: RuntimeLayout,
    config: CollectorConfig,
}

impl Collector {
    /// Creates a collector with default configuration
    pub fn new(layout: RuntimeLayout) -> Self {
        Self::with_config(layout, CollectorConfig::default())
    }

    /// Creates a collector with custom configuration
    pub fn with_config(layout: RuntimeLayout, config: CollectorConfig) -> Self {
        Self { layout, config }
    }

    /// The bootclasspath strategy for this runtime
    pub fn legacy_strategy(&self) -> LegacyStrategy {
        LegacyStrategy::new(
            self.layout.legacy_lib_dir(),
            self.config.legacy_archives.clone(),
        )
    }

    /// The module strategy for this runtime.
    ///
    /// Fails if the runtime has no module image.
    pub fn module_strategy(&self) -> Result<ModuleStrategy> {
        Ok(ModuleStrategy::new(
            ReleaseView::new(self.layout.symbol_file(), self.config.release),
            self.layout.module_image()?,
            self.config.internal_module.clone(),
        ))
    }

    /// Collects every platform class of the runtime
    pub fn collect(&self) -> Result<ClassSet> {
        info!("Collecting platform classes from {}", self.layout.home().display());

        let legacy = self.legacy_strategy();
        let classes = legacy.discover()?;
        if !classes.is_empty() {
            info!("{} strategy found {} entries", legacy.name(), classes.len());
            return Ok(classes);
        }
        debug!("No bootclasspath jars, falling back to modules");

        let modules = self.module_strategy()?;
        let classes = modules.discover()?;
        info!("{} strategy found {} entries", modules.name(), classes.len());
        Ok(classes)
    }
}
