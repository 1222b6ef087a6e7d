use std::path::PathBuf;

/// Per-call configuration of a map load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// When set, every top-level `<tileset>` of the map is loaded from this
    /// `.tsx` file instead of its own declaration.
    pub tileset_override: Option<PathBuf>,
}

impl LoadOptions {
    /// Options with nothing overridden.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every top-level tileset from `path`.
    pub fn with_tileset_override(mut self, path: impl Into<PathBuf>) -> Self {
        self.tileset_override = Some(path.into());
        self
    }
}
