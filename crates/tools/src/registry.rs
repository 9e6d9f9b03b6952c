//! The tool registry.
//!
//! An explicit registry object built once at startup and passed into the
//! orchestrator; tool lookup is by name, and an unknown name is a fatal
//! configuration error raised before any acquisition work begins.

use std::collections::BTreeMap;

use toolstage_core::{Error, Result};

use crate::builtin;
use crate::tool::Tool;

/// Constructor for one tool implementation.
pub type ToolFactory = fn() -> Box<dyn Tool>;

/// Mapping from tool name to its constructor.
///
/// Read-only once built; the set of supported tools is closed and known at
/// compile time.
#[derive(Default)]
pub struct ToolRegistry {
    factories: BTreeMap<&'static str, ToolFactory>,
}

impl ToolRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in tool.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("cmake", builtin::Cmake::create);
        registry.register("meson", builtin::Meson::create);
        registry.register("msys2", builtin::Msys2::create);
        registry.register("nasm", builtin::Nasm::create);
        registry.register("ninja", builtin::Ninja::create);
        registry.register("nuget", builtin::Nuget::create);
        registry.register("perl", builtin::Perl::create);
        registry.register("python", builtin::Python::create);
        registry.register("yasm", builtin::Yasm::create);
        registry.register("go", builtin::Go::create);
        registry
    }

    /// Register a tool constructor under a name.
    ///
    /// # Panics
    ///
    /// Registering the same name twice is a programming error, not a
    /// runtime condition, and panics.
    pub fn register(&mut self, name: &'static str, factory: ToolFactory) {
        let previous = self.factories.insert(name, factory);
        assert!(previous.is_none(), "tool '{name}' registered twice");
    }

    /// Instantiate the tool registered under `name`.
    pub fn create(&self, name: &str) -> Result<Box<dyn Tool>> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| Error::unknown_tool(name))
    }

    /// Whether a tool name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// All registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}
