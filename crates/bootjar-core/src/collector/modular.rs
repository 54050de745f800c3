//! Platform classes of module-based runtimes (JDK 9 and later).

use super::image::ModuleImage;
use super::release::ReleaseView;
use super::DiscoveryStrategy;
use crate::entry::ClassSet;
use crate::error::Result;
use tracing::debug;

/// Module whose internal APIs stay reachable for code compiled against release 8
pub const INTERNAL_MODULE: &str = "jdk.unsupported";

/// Release view classes plus the internal-APIs module.
///
/// Compiling with `--release 8` only exposes supported APIs, which hides
/// classes such as `sun.misc.Unsafe`. Those live in [`INTERNAL_MODULE`] and
/// are added from the module image on top of the release view.
pub struct ModuleStrategy {
    view: ReleaseView,
    image: Box<dyn ModuleImage>,
    internal_module: String,
}

impl ModuleStrategy {
    /// Creates the strategy from a release view and a module image
    pub fn new(
        view: ReleaseView,
        image: Box<dyn ModuleImage>,
        internal_module: impl Into<String>,
    ) -> Self {
        Self {
            view,
            image,
            internal_module: internal_module.into(),
        }
    }
}

impl DiscoveryStrategy for ModuleStrategy {
    fn name(&self) -> &'static str {
        "modules"
    }

    fn discover(&self) -> Result<ClassSet> {
        let mut classes = self.view.classes()?;

        let internal = self.image.module_classes(&self.internal_module)?;
        debug!(
            "Adding {} classes from {} in {}",
            internal.len(),
            self.internal_module,
            self.image.describe()
        );
        classes.merge(internal);

        Ok(classes)
    }
}
