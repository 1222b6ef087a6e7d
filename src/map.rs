//! Read-only TMX document model.
//!
//! Every record keeps the attributes of its XML node verbatim; only the
//! nesting of the document is given structure here.

use crate::attributes::{Attributes, Property};
use crate::gid::Gid;
use serde::Serialize;

/// An `<image>` reference (`source`, `width`, `height`, `trans`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Image {
    /// Attributes of the `<image>` node.
    pub attributes: Attributes,
}

/// One `<frame>` of a tile animation (`tileid`, `duration`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frame {
    /// Attributes of the `<frame>` node.
    pub attributes: Attributes,
}

/// Frames of an animated tile, in play order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Animation {
    /// The frames.
    pub frames: Vec<Frame>,
}

/// Per-tile metadata of a tileset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Tile {
    /// Attributes of the `<tile>` node (`id`, `type`, `terrain`, ...).
    pub attributes: Attributes,
    /// Animation, if the tile has one.
    pub animation: Option<Animation>,
    /// One entry per `<properties>` child.
    pub properties: Vec<Property>,
    /// Image of the tile in image-collection tilesets.
    pub image: Option<Image>,
    /// Collision shapes attached to the tile.
    pub object_group: Option<ObjectGroup>,
}

/// A `<terrain>` of a tileset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Terrain {
    /// Attributes of the `<terrain>` node (`name`, `tile`).
    pub attributes: Attributes,
    /// One entry per `<properties>` child.
    pub properties: Vec<Property>,
}

/// The `<terraintypes>` block of a tileset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TerrainTypes {
    /// Terrains in document order.
    pub terrains: Vec<Terrain>,
}

/// A `<wangtile>` (`tileid`, `wangid`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WangTile {
    /// Attributes of the node.
    pub attributes: Attributes,
}

/// A `<wangcornercolor>` of pre-1.5 wang sets.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WangCornerColor {
    /// Attributes of the node.
    pub attributes: Attributes,
}

/// A `<wangedgecolor>` of pre-1.5 wang sets.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WangEdgeColor {
    /// Attributes of the node.
    pub attributes: Attributes,
}

/// Unified `<wangcolor>` of Tiled 1.5+ wang sets.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WangColor {
    /// Attributes of the node.
    pub attributes: Attributes,
}

/// A `<wangset>` of a tileset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WangSet {
    /// Attributes of the `<wangset>` node.
    pub attributes: Attributes,
    /// `<wangedgecolor>` children.
    pub edge_colors: Vec<WangEdgeColor>,
    /// `<wangcornercolor>` children.
    pub corner_colors: Vec<WangCornerColor>,
    /// `<wangcolor>` children.
    pub colors: Vec<WangColor>,
    /// `<wangtile>` children.
    pub tiles: Vec<WangTile>,
    /// One entry per `<properties>` child.
    pub properties: Vec<Property>,
}

/// A tileset, either declared inside the map or loaded from a `.tsx` fragment.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Tileset {
    /// Attributes of the `<tileset>` node, without `version` and
    /// `tiledversion` for fragments.
    pub attributes: Attributes,
    /// Atlas image.
    pub image: Option<Image>,
    /// Tiles that carry metadata; not every tile of the atlas.
    pub tiles: Vec<Tile>,
    /// Wang sets of the `<wangsets>` block.
    pub wang_sets: Vec<WangSet>,
    /// One entry per `<properties>` child.
    pub properties: Vec<Property>,
    /// Empty when the tileset has no `<terraintypes>`.
    pub terrain_types: TerrainTypes,
    /// `<tileoffset>` attributes (`x`, `y`).
    pub tile_offset: Option<Attributes>,
    /// `<grid>` attributes (`orientation`, `width`, `height`).
    pub grid: Option<Attributes>,
    /// Attributes of the map's `<tileset>` node (`firstgid`, `source`) when
    /// the tileset was loaded from a fragment; `None` otherwise.
    pub reference: Option<Attributes>,
}

impl Tileset {
    /// Value of the `name` attribute.
    pub fn name(&self) -> Option<&str> {
        self.attributes.get("name")
    }

    /// `firstgid` of the tileset, looked up on the referencing node for
    /// fragments.
    pub fn first_gid(&self) -> Option<u32> {
        self.attributes
            .get_u32("firstgid")
            .or_else(|| self.reference.as_ref()?.get_u32("firstgid"))
    }
}

/// One cell of a tile layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LayerTile {
    /// `gid` for decoded cells; every attribute of the node for inline
    /// `<tile>` cells.
    pub attributes: Attributes,
}

impl LayerTile {
    pub(crate) fn from_gid(gid: u32) -> Self {
        let mut attributes = Attributes::new();
        attributes.insert("gid", gid.to_string());
        Self { attributes }
    }

    /// `None` for inline `<tile/>` nodes without a `gid` (empty cells).
    pub fn gid(&self) -> Option<Gid> {
        self.attributes.get_u32("gid").map(Gid)
    }
}

/// Textual representation of layer data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Encoding {
    /// One `<tile>` element per cell.
    #[default]
    Xml,
    /// Little-endian `u32` GIDs, base64 encoded.
    Base64,
    /// Comma-separated decimal GIDs.
    Csv,
}

impl Encoding {
    /// Parses the value of a `encoding` attribute.
    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "base64" => Some(Encoding::Base64),
            "csv" => Some(Encoding::Csv),
            _ => None,
        }
    }
}

/// Compression applied to layer data before base64 encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Compression {
    /// Plain payload.
    #[default]
    None,
    /// zlib stream (RFC 1950).
    Zlib,
    /// gzip member (RFC 1952).
    Gzip,
    /// Zstandard frame.
    Zstd,
}

impl Compression {
    /// Parses the value of a `compression` attribute.
    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "zlib" => Some(Compression::Zlib),
            "gzip" => Some(Compression::Gzip),
            "zstd" => Some(Compression::Zstd),
            _ => None,
        }
    }
}

/// A rectangular piece of an infinite tile layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Chunk {
    /// `x`, `y`, `width`, `height` in tiles.
    pub attributes: Attributes,
    /// Raw text payload.
    pub encoded: String,
    /// Decoded cells, `width * height` of the chunk.
    pub tiles: Vec<LayerTile>,
}

/// The `<data>` element of a tile layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Data {
    /// Declared `encoding`.
    pub encoding: Encoding,
    /// Declared `compression`.
    pub compression: Compression,
    /// Raw text payload, empty for [`Encoding::Xml`].
    pub encoded: String,
    /// Cells in row-major order.
    pub tiles: Vec<LayerTile>,
    /// Chunks of an infinite map, in document order.
    pub chunks: Vec<Chunk>,
}

impl Data {
    /// GIDs of `tiles`, skipping cells that carry no `gid`.
    pub fn gids(&self) -> impl Iterator<Item = Gid> + '_ {
        self.tiles.iter().filter_map(LayerTile::gid)
    }
}

/// A `<layer>` of tiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layer {
    /// Attributes of the `<layer>` node (`name`, `width`, `height`, ...).
    pub attributes: Attributes,
    /// Tile data.
    pub data: Data,
    /// One entry per `<properties>` child.
    pub properties: Vec<Property>,
}

impl Layer {
    /// Value of the `name` attribute.
    pub fn name(&self) -> Option<&str> {
        self.attributes.get("name")
    }
}

/// An `<imagelayer>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImageLayer {
    /// Attributes of the `<imagelayer>` node.
    pub attributes: Attributes,
    /// `<image>` children.
    pub images: Vec<Image>,
    /// One entry per `<properties>` child.
    pub properties: Vec<Property>,
}

/// Geometry given by a child element of `<object>`.
///
/// Objects without one are rectangles, or tile objects when they carry a `gid`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ObjectShape {
    /// `<ellipse/>`, bounded by the object's size.
    Ellipse,
    /// `<point/>` at the object's position.
    Point,
    /// Closed outline, points relative to the object's position.
    Polygon(Vec<(f32, f32)>),
    /// Open outline, points relative to the object's position.
    Polyline(Vec<(f32, f32)>),
    /// `<text>` label.
    Text {
        /// Font and alignment attributes.
        attributes: Attributes,
        /// The label.
        text: String,
    },
}

/// An `<object>` of an object group.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Object {
    /// Attributes of the `<object>` node (`id`, `x`, `y`, `gid`, ...).
    pub attributes: Attributes,
    /// One entry per `<properties>` child.
    pub properties: Vec<Property>,
    /// `None` for rectangles and tile objects.
    pub shape: Option<ObjectShape>,
}

/// An `<objectgroup>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ObjectGroup {
    /// Attributes of the `<objectgroup>` node.
    pub attributes: Attributes,
    /// Objects in document order.
    pub objects: Vec<Object>,
    /// One entry per `<properties>` child.
    pub properties: Vec<Property>,
}

/// A `<group>` layer. Groups may contain further groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Group {
    /// Attributes of the `<group>` node.
    pub attributes: Attributes,
    /// Tile layers directly inside the group.
    pub layers: Vec<Layer>,
    /// Image layers directly inside the group.
    pub image_layers: Vec<ImageLayer>,
    /// Object groups directly inside the group.
    pub object_groups: Vec<ObjectGroup>,
    /// Nested groups.
    pub groups: Vec<Group>,
    /// One entry per `<properties>` child.
    pub properties: Vec<Property>,
}

/// Root of a loaded `.tmx` document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Map {
    /// Attributes of the `<map>` node (`orientation`, `width`, `tilewidth`, ...).
    pub attributes: Attributes,
    /// Tilesets in declaration order.
    pub tilesets: Vec<Tileset>,
    /// Top-level tile layers.
    pub layers: Vec<Layer>,
    /// Top-level image layers.
    pub image_layers: Vec<ImageLayer>,
    /// Top-level object groups.
    pub object_groups: Vec<ObjectGroup>,
    /// Top-level groups.
    pub groups: Vec<Group>,
    /// One entry per `<properties>` child.
    pub properties: Vec<Property>,
}

impl Map {
    /// Map width in tiles.
    pub fn width(&self) -> Option<u32> {
        self.attributes.get_u32("width")
    }

    /// Map height in tiles.
    pub fn height(&self) -> Option<u32> {
        self.attributes.get_u32("height")
    }

    /// Every tile layer of the map, top level first, then groups depth-first.
    pub fn all_layers(&self) -> Vec<&Layer> {
        let mut out: Vec<&Layer> = self.layers.iter().collect();
        let mut pending: Vec<&Group> = self.groups.iter().rev().collect();
        while let Some(group) = pending.pop() {
            out.extend(group.layers.iter());
            pending.extend(group.groups.iter().rev());
        }
        out
    }

    /// First layer named `name`, searching groups too.
    pub fn layer_by_name(&self, name: &str) -> Option<&Layer> {
        self.all_layers()
            .into_iter()
            .find(|layer| layer.name() == Some(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named_layer(name: &str) -> Layer {
        let mut layer = Layer::default();
        layer.attributes.insert("name", name);
        layer
    }

    #[test]
    fn all_layers_walks_nested_groups() {
        let inner = Group {
            layers: vec![named_layer("deep")],
            ..Group::default()
        };
        let outer = Group {
            layers: vec![named_layer("grouped")],
            groups: vec![inner],
            ..Group::default()
        };
        let map = Map {
            layers: vec![named_layer("ground")],
            groups: vec![outer],
            ..Map::default()
        };

        let names: Vec<_> = map.all_layers().iter().filter_map(|l| l.name()).collect();
        assert_eq!(names, vec!["ground", "grouped", "deep"]);
        assert!(map.layer_by_name("deep").is_some());
        assert!(map.layer_by_name("sky").is_none());
    }

    #[test]
    fn data_gids_skip_empty_cells() {
        let data = Data {
            tiles: vec![LayerTile::from_gid(7), LayerTile::default(), LayerTile::from_gid(0)],
            ..Data::default()
        };
        assert_eq!(data.gids().collect::<Vec<_>>(), vec![Gid(7), Gid(0)]);
    }
}
