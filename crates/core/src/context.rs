//! Shared build context.
//!
//! Some tools are invoked by the downstream build engine through an exact
//! path rather than PATH search (a generator script, a package-fetcher
//! executable). Those paths are published here during each tool's bind step
//! and read afterwards by later tools and by the engine. The acquisition
//! phase is single-threaded, so plain fields suffice.

use std::path::PathBuf;

use crate::options::BuildOptions;

/// Orchestrator state shared across one build invocation.
#[derive(Debug, Clone, Default)]
pub struct BuildContext {
    /// Options for this invocation.
    pub opts: BuildOptions,
    /// Full path to the generator script (`meson.py`), once bound.
    pub meson: Option<PathBuf>,
    /// Full path to the package-fetcher executable (`nuget.exe`), once bound.
    pub nuget: Option<PathBuf>,
    /// Version-qualified interpreter root, once bound. Passed verbatim to
    /// makefiles that need the interpreter by directory rather than PATH.
    pub perl_dir: Option<PathBuf>,
}

impl BuildContext {
    /// Create a context for one build invocation.
    #[must_use]
    pub fn new(opts: BuildOptions) -> Self {
        Self {
            opts,
            meson: None,
            nuget: None,
            perl_dir: None,
        }
    }
}
