use crate::error::MapError;
use crate::loader::tmx_loader::load_map;
use crate::map::Map;
use crate::options::LoadOptions;
use std::path::Path;

/// Stateful wrapper over [`load_map`] that remembers the last map and the
/// last error.
///
/// ```no_run
/// use tmx_loader::TmxParser;
///
/// let mut parser = TmxParser::new();
/// if !parser.load("maps/level1.tmx", None) {
///     eprintln!("{}", parser.error_msg());
/// }
/// ```
#[derive(Debug, Default)]
pub struct TmxParser {
    map: Map,
    last_error: Option<MapError>,
}

impl TmxParser {
    /// A parser holding an empty map and no error.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `path`; with `tileset_override`, every top-level tileset is read
    /// from that fragment instead. Returns `false` on failure.
    pub fn load(&mut self, path: impl AsRef<Path>, tileset_override: Option<&Path>) -> bool {
        let mut options = LoadOptions::new();
        if let Some(fragment) = tileset_override {
            options = options.with_tileset_override(fragment);
        }
        self.load_with(path, &options)
    }

    /// Like [`TmxParser::load`], with full [`LoadOptions`].
    pub fn load_with(&mut self, path: impl AsRef<Path>, options: &LoadOptions) -> bool {
        let path = path.as_ref();
        match load_map(path, options) {
            Ok(map) => {
                self.map = map;
                self.last_error = None;
                true
            }
            Err(err) => {
                log::debug!("loading {} failed: {err}", path.display());
                self.map = Map::default();
                self.last_error = Some(err);
                false
            }
        }
    }

    /// Copy of the last successfully loaded map; empty after a failed load.
    pub fn map(&self) -> Map {
        self.map.clone()
    }

    /// Borrowing counterpart of [`TmxParser::map`].
    pub fn map_ref(&self) -> &Map {
        &self.map
    }

    /// Whether the last load failed.
    pub fn has_error(&self) -> bool {
        self.last_error.is_some()
    }

    /// Message of the last error, empty when the last load succeeded.
    pub fn error_msg(&self) -> String {
        self.last_error
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    /// Error of the last load, if it failed.
    pub fn last_error(&self) -> Option<&MapError> {
        self.last_error.as_ref()
    }
}
