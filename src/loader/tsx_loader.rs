use crate::attributes::{Attributes, Property};
use crate::error::{MapError, Result};
use crate::loader::tags::{
    elements, AnimationChild, TerrainChild, TerrainTypesChild, TileChild, TilesetChild,
    WangSetChild, WangSetsChild,
};
use crate::loader::tmx_loader::parse_object_group;
use crate::map::*;
use roxmltree::{Document, Node, ParsingOptions};
use std::path::Path;

/// Root attributes of a `.tsx` file that describe the file, not the tileset.
const FRAGMENT_ONLY_ATTRIBUTES: [&str; 2] = ["version", "tiledversion"];

pub(crate) fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses XML text; older Tiled versions emit a DOCTYPE, so DTDs are allowed.
pub(crate) fn parse_document<'input>(path: &Path, text: &'input str) -> Result<Document<'input>> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Document::parse_with_options(text, options).map_err(|source| MapError::Xml {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads an external `.tsx` tileset.
pub fn load_tileset(path: impl AsRef<Path>) -> Result<Tileset> {
    let path = path.as_ref();
    log::debug!("loading tileset fragment {}", path.display());
    let text = read_source(path)?;
    parse_tileset_str(&text, path)
}

/// Parses `.tsx` text; `path` is only used in diagnostics.
pub fn parse_tileset_str(text: &str, path: &Path) -> Result<Tileset> {
    let doc = parse_document(path, text)?;
    let root = doc.root_element();
    if root.tag_name().name() != "tileset" {
        return Err(MapError::MissingNode {
            path: path.to_path_buf(),
            expected: "tileset",
        });
    }

    let mut tileset = Tileset {
        attributes: Attributes::from_node(root),
        ..Tileset::default()
    };
    tileset
        .attributes
        .retain(|key| !FRAGMENT_ONLY_ATTRIBUTES.contains(&key));
    parse_tileset_children(&mut tileset, root);
    Ok(tileset)
}

/// Child dispatch shared by inline `<tileset>` nodes and `.tsx` roots.
pub(crate) fn parse_tileset_children(tileset: &mut Tileset, node: Node) {
    for child in elements(node) {
        match TilesetChild::of(child) {
            TilesetChild::Image => tileset.image = Some(parse_image(child)),
            TilesetChild::Tile => tileset.tiles.push(parse_tile(child)),
            TilesetChild::Properties => tileset.properties.push(Property::from_node(child)),
            TilesetChild::TerrainTypes => tileset.terrain_types = parse_terrain_types(child),
            TilesetChild::WangSets => {
                for wang_set in elements(child) {
                    if WangSetsChild::of(wang_set) == WangSetsChild::WangSet {
                        tileset.wang_sets.push(parse_wang_set(wang_set));
                    }
                }
            }
            TilesetChild::TileOffset => tileset.tile_offset = Some(Attributes::from_node(child)),
            TilesetChild::Grid => tileset.grid = Some(Attributes::from_node(child)),
            TilesetChild::Other => {}
        }
    }
}

pub(crate) fn parse_image(node: Node) -> Image {
    Image {
        attributes: Attributes::from_node(node),
    }
}

fn parse_tile(node: Node) -> Tile {
    let mut tile = Tile {
        attributes: Attributes::from_node(node),
        ..Tile::default()
    };
    for child in elements(node) {
        match TileChild::of(child) {
            TileChild::Properties => tile.properties.push(Property::from_node(child)),
            TileChild::Animation => {
                let frames = elements(child)
                    .filter(|frame| AnimationChild::of(*frame) == AnimationChild::Frame)
                    .map(|frame| Frame {
                        attributes: Attributes::from_node(frame),
                    })
                    .collect();
                tile.animation = Some(Animation { frames });
            }
            TileChild::Image => tile.image = Some(parse_image(child)),
            TileChild::ObjectGroup => tile.object_group = Some(parse_object_group(child)),
            TileChild::Other => {}
        }
    }
    tile
}

fn parse_terrain_types(node: Node) -> TerrainTypes {
    let terrains = elements(node)
        .filter(|terrain| TerrainTypesChild::of(*terrain) == TerrainTypesChild::Terrain)
        .map(|terrain| Terrain {
            attributes: Attributes::from_node(terrain),
            properties: elements(terrain)
                .filter(|child| TerrainChild::of(*child) == TerrainChild::Properties)
                .map(Property::from_node)
                .collect(),
        })
        .collect();
    TerrainTypes { terrains }
}

fn parse_wang_set(node: Node) -> WangSet {
    let mut wang_set = WangSet {
        attributes: Attributes::from_node(node),
        ..WangSet::default()
    };
    for child in elements(node) {
        let attributes = Attributes::from_node(child);
        match WangSetChild::of(child) {
            WangSetChild::EdgeColor => wang_set.edge_colors.push(WangEdgeColor { attributes }),
            WangSetChild::CornerColor => {
                wang_set.corner_colors.push(WangCornerColor { attributes })
            }
            WangSetChild::Color => wang_set.colors.push(WangColor { attributes }),
            WangSetChild::Tile => wang_set.tiles.push(WangTile { attributes }),
            WangSetChild::Properties => wang_set.properties.push(Property::from_node(child)),
            WangSetChild::Other => {}
        }
    }
    wang_set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const TSX: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<tileset version="1.10" tiledversion="1.10.2" name="terrain" tilewidth="16" tileheight="16" tilecount="4" columns="2">
 <tileoffset x="0" y="4"/>
 <image source="terrain.png" width="32" height="32"/>
 <properties>
  <property name="biome" value="forest"/>
 </properties>
 <terraintypes>
  <terrain name="grass" tile="0">
   <properties><property name="walkable" type="bool" value="true"/></properties>
  </terrain>
 </terraintypes>
 <tile id="0" type="ground">
  <properties><property name="damage" type="int" value="10"/></properties>
  <animation>
   <frame tileid="0" duration="100"/>
   <frame tileid="1" duration="150"/>
  </animation>
  <objectgroup draworder="index">
   <object id="1" x="0" y="0" width="16" height="8"/>
  </objectgroup>
 </tile>
 <wangsets>
  <wangset name="paths" tile="-1">
   <wangedgecolor name="dirt" color="#ff0000" tile="-1" probability="1"/>
   <wangcornercolor name="sand" color="#00ff00" tile="-1" probability="1"/>
   <wangtile tileid="2" wangid="0x10101010"/>
  </wangset>
 </wangsets>
 <editorsettings><export target="x.json" format="json"/></editorsettings>
</tileset>"##;

    #[test]
    fn parses_fragment_children() {
        let tileset = parse_tileset_str(TSX, Path::new("sets/terrain.tsx")).expect("tsx");

        assert_eq!(tileset.name(), Some("terrain"));
        assert!(!tileset.attributes.contains("version"));
        assert!(!tileset.attributes.contains("tiledversion"));
        assert_eq!(tileset.attributes.get_u32("tilecount"), Some(4));

        let image = tileset.image.as_ref().expect("image");
        assert_eq!(image.attributes.get("source"), Some("terrain.png"));
        assert_eq!(
            tileset.tile_offset.as_ref().and_then(|o| o.get_i32("y")),
            Some(4)
        );
        assert_eq!(tileset.properties.len(), 1);
        assert_eq!(tileset.properties[0].value(), Some("forest"));

        let terrain = &tileset.terrain_types.terrains[0];
        assert_eq!(terrain.attributes.get("name"), Some("grass"));
        assert_eq!(terrain.properties[0].name(), Some("walkable"));

        let tile = &tileset.tiles[0];
        assert_eq!(tile.attributes.get("type"), Some("ground"));
        assert_eq!(tile.properties[0].value(), Some("10"));
        let frames = &tile.animation.as_ref().expect("animation").frames;
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].attributes.get_u32("duration"), Some(150));
        let collision = tile.object_group.as_ref().expect("collision group");
        assert_eq!(collision.objects[0].attributes.get_f32("height"), Some(8.0));

        let wang_set = &tileset.wang_sets[0];
        assert_eq!(wang_set.edge_colors.len(), 1);
        assert_eq!(wang_set.edge_colors[0].attributes.get("color"), Some("#ff0000"));
        assert_eq!(wang_set.corner_colors.len(), 1);
        assert_eq!(wang_set.tiles[0].attributes.get("wangid"), Some("0x10101010"));
    }

    #[test]
    fn rejects_documents_without_tileset_root() {
        let err = parse_tileset_str("<map/>", Path::new("broken.tsx")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequiredNodeMissing);
        assert!(matches!(err, MapError::MissingNode { expected: "tileset", .. }));
    }

    #[test]
    fn reports_malformed_xml() {
        let err = parse_tileset_str("<tileset><image></tileset>", Path::new("bad.tsx")).unwrap_err();
        assert!(matches!(err, MapError::Xml { .. }));
        assert_eq!(err.kind(), ErrorKind::DocumentUnparsable);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_tileset("/definitely/not/here.tsx").unwrap_err();
        assert!(matches!(err, MapError::Io { .. }));
    }
}
