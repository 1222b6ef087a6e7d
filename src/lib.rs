#![warn(missing_docs)]

//! Tiled TMX/TSX loader.
//!
//! Loads a `.tmx` document, the `.tsx` tileset fragments it references and
//! the tile data of every layer (XML, CSV or base64, optionally zlib, gzip
//! or zstd compressed) into a read-only [`Map`].
//!
//! ```no_run
//! use tmx_loader::{load_map, LoadOptions};
//!
//! let map = load_map("maps/level1.tmx", &LoadOptions::default())?;
//! for layer in map.all_layers() {
//!     println!("{:?}: {} tiles", layer.name(), layer.data.tiles.len());
//! }
//! # Ok::<(), tmx_loader::MapError>(())
//! ```

mod attributes;
mod error;
mod gid;
mod loader {
    pub mod data;
    pub mod path;
    pub mod tags;
    pub mod tmx_loader;
    pub mod tsx_loader;
}
mod map;
mod options;
mod parser;
mod report;

pub use attributes::{Attributes, Property};
pub use error::{ErrorKind, MapError, Result};
pub use gid::{Gid, FLIP_D, FLIP_H, FLIP_V, GID_MASK, ROTATE_HEX_120};
pub use loader::data::{decode, TileEncoding};
pub use loader::path::resolve;
pub use loader::tmx_loader::{load_map, parse_map_str};
pub use loader::tsx_loader::{load_tileset, parse_tileset_str};
pub use map::{
    Animation, Chunk, Compression, Data, Encoding, Frame, Group, Image, ImageLayer, Layer,
    LayerTile, Map, Object, ObjectGroup, ObjectShape, Terrain, TerrainTypes, Tile, Tileset,
    WangColor, WangCornerColor, WangEdgeColor, WangSet, WangTile,
};
pub use options::LoadOptions;
pub use parser::TmxParser;
pub use report::write_tileset_report;
