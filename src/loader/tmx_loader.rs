use crate::attributes::{inline_text, Attributes, Property};
use crate::error::{MapError, Result};
use crate::loader::data::{decode, decode_text, TileEncoding};
use crate::loader::path::resolve;
use crate::loader::tags::{
    elements, DataChild, GroupChild, ImageLayerChild, LayerChild, MapChild, ObjectChild,
    ObjectGroupChild,
};
use crate::loader::tsx_loader::{
    load_tileset, parse_document, parse_image, parse_tileset_children, read_source,
};
use crate::map::*;
use crate::options::LoadOptions;
use roxmltree::Node;
use std::path::Path;

/// Loads a `.tmx` map and every tileset fragment it references.
pub fn load_map(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Map> {
    let path = path.as_ref();
    log::debug!("loading map {}", path.display());
    let text = read_source(path)?;
    parse_map_str(&text, path, options)
}

/// Parses `.tmx` text. `path` locates the document for resolving relative
/// tileset references.
pub fn parse_map_str(text: &str, path: &Path, options: &LoadOptions) -> Result<Map> {
    let doc = parse_document(path, text)?;
    let root = doc.root_element();
    if root.tag_name().name() != "map" {
        return Err(MapError::MissingNode {
            path: path.to_path_buf(),
            expected: "map",
        });
    }

    let mut map = Map {
        attributes: Attributes::from_node(root),
        ..Map::default()
    };
    for child in elements(root) {
        match MapChild::of(child) {
            MapChild::Properties => map.properties.push(Property::from_node(child)),
            MapChild::Tileset => map.tilesets.push(parse_tileset(child, path, options)?),
            MapChild::Layer => map.layers.push(parse_layer(child)?),
            MapChild::ImageLayer => map.image_layers.push(parse_image_layer(child)),
            MapChild::ObjectGroup => map.object_groups.push(parse_object_group(child)),
            MapChild::Group => map.groups.push(parse_group(child)?),
            MapChild::Other => log::trace!("skipping <{}>", child.tag_name().name()),
        }
    }

    log::debug!(
        "loaded {}: {} tilesets, {} layers, {} groups",
        path.display(),
        map.tilesets.len(),
        map.layers.len(),
        map.groups.len()
    );
    Ok(map)
}

/// A `source` attribute replaces the node with the referenced fragment;
/// inline children are then ignored.
fn parse_tileset(node: Node, map_path: &Path, options: &LoadOptions) -> Result<Tileset> {
    let attributes = Attributes::from_node(node);

    let fragment = match (&options.tileset_override, attributes.get("source")) {
        (Some(fragment), _) => Some(fragment.clone()),
        (None, Some(source)) => Some(resolve(source, map_path)?),
        (None, None) => None,
    };
    if let Some(fragment) = fragment {
        let mut tileset = load_tileset(&fragment)?;
        tileset.reference = Some(attributes);
        return Ok(tileset);
    }

    let mut tileset = Tileset {
        attributes,
        ..Tileset::default()
    };
    parse_tileset_children(&mut tileset, node);
    Ok(tileset)
}

/// `width * height` of a layer or chunk, `0` when either is missing.
fn expected_tiles(attributes: &Attributes) -> usize {
    match (attributes.get_u32("width"), attributes.get_u32("height")) {
        (Some(width), Some(height)) => (width as usize).saturating_mul(height as usize),
        _ => 0,
    }
}

fn parse_layer(node: Node) -> Result<Layer> {
    let mut layer = Layer {
        attributes: Attributes::from_node(node),
        ..Layer::default()
    };
    for child in elements(node) {
        match LayerChild::of(child) {
            LayerChild::Properties => layer.properties.push(Property::from_node(child)),
            LayerChild::Data => {
                layer.data = parse_data(child, expected_tiles(&layer.attributes))?;
            }
            LayerChild::Other => {}
        }
    }
    Ok(layer)
}

fn parse_data(node: Node, expected: usize) -> Result<Data> {
    let mut data = Data::default();
    if let Some(value) = node.attribute("encoding") {
        match Encoding::from_attr(value) {
            Some(encoding) => data.encoding = encoding,
            None => log::warn!("unknown layer data encoding {value:?}, reading <tile> children"),
        }
    }
    if let Some(value) = node.attribute("compression") {
        match Compression::from_attr(value) {
            Some(compression) => data.compression = compression,
            None => log::warn!("unknown layer data compression {value:?}, treating as none"),
        }
    }

    let text = inline_text(node);
    if text.is_empty() {
        let encoding = TileEncoding::of(data.encoding, data.compression);
        for child in elements(node) {
            match DataChild::of(child) {
                DataChild::Tile => data.tiles.push(LayerTile {
                    attributes: Attributes::from_node(child),
                }),
                DataChild::Chunk => data.chunks.push(parse_chunk(child, encoding)?),
                DataChild::Other => {}
            }
        }
    } else {
        data.encoded = text.to_owned();
        data.tiles = decode(&data, expected)?;
    }
    Ok(data)
}

fn parse_chunk(node: Node, encoding: TileEncoding) -> Result<Chunk> {
    let attributes = Attributes::from_node(node);
    let encoded = inline_text(node).to_owned();
    let tiles = if encoding == TileEncoding::Inline {
        elements(node)
            .filter(|child| DataChild::of(*child) == DataChild::Tile)
            .map(|child| LayerTile {
                attributes: Attributes::from_node(child),
            })
            .collect()
    } else {
        decode_text(&encoded, encoding, expected_tiles(&attributes))?
    };
    Ok(Chunk {
        attributes,
        encoded,
        tiles,
    })
}

fn parse_image_layer(node: Node) -> ImageLayer {
    let mut image_layer = ImageLayer {
        attributes: Attributes::from_node(node),
        ..ImageLayer::default()
    };
    for child in elements(node) {
        match ImageLayerChild::of(child) {
            ImageLayerChild::Image => image_layer.images.push(parse_image(child)),
            ImageLayerChild::Properties => {
                image_layer.properties.push(Property::from_node(child))
            }
            ImageLayerChild::Other => {}
        }
    }
    image_layer
}

pub(crate) fn parse_object_group(node: Node) -> ObjectGroup {
    let mut group = ObjectGroup {
        attributes: Attributes::from_node(node),
        ..ObjectGroup::default()
    };
    for child in elements(node) {
        match ObjectGroupChild::of(child) {
            ObjectGroupChild::Properties => group.properties.push(Property::from_node(child)),
            ObjectGroupChild::Object => group.objects.push(parse_object(child)),
            ObjectGroupChild::Other => {}
        }
    }
    group
}

fn parse_object(node: Node) -> Object {
    let mut object = Object {
        attributes: Attributes::from_node(node),
        ..Object::default()
    };
    for child in elements(node) {
        match ObjectChild::of(child) {
            ObjectChild::Properties => object.properties.push(Property::from_node(child)),
            ObjectChild::Ellipse => object.shape = Some(ObjectShape::Ellipse),
            ObjectChild::Point => object.shape = Some(ObjectShape::Point),
            ObjectChild::Polygon => {
                object.shape = Some(ObjectShape::Polygon(parse_points(child)))
            }
            ObjectChild::Polyline => {
                object.shape = Some(ObjectShape::Polyline(parse_points(child)))
            }
            ObjectChild::Text => {
                object.shape = Some(ObjectShape::Text {
                    attributes: Attributes::from_node(child),
                    text: child.text().unwrap_or_default().to_owned(),
                })
            }
            ObjectChild::Other => {}
        }
    }
    object
}

/// `points="0,0 16,0 16,16"`; malformed pairs are skipped.
fn parse_points(node: Node) -> Vec<(f32, f32)> {
    let Some(points) = node.attribute("points") else {
        return Vec::new();
    };
    points
        .split_whitespace()
        .filter_map(|pair| {
            let parsed = pair
                .split_once(',')
                .and_then(|(x, y)| Some((x.parse::<f32>().ok()?, y.parse::<f32>().ok()?)));
            if parsed.is_none() {
                log::warn!("skipping malformed point {pair:?}");
            }
            parsed
        })
        .collect()
}

fn parse_group(node: Node) -> Result<Group> {
    let mut group = Group {
        attributes: Attributes::from_node(node),
        ..Group::default()
    };
    for child in elements(node) {
        match GroupChild::of(child) {
            GroupChild::Properties => group.properties.push(Property::from_node(child)),
            GroupChild::Layer => group.layers.push(parse_layer(child)?),
            GroupChild::ImageLayer => group.image_layers.push(parse_image_layer(child)),
            GroupChild::ObjectGroup => group.object_groups.push(parse_object_group(child)),
            GroupChild::Group => group.groups.push(parse_group(child)?),
            GroupChild::Other => {}
        }
    }
    Ok(group)
}
