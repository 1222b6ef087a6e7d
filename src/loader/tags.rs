//! Recognised child elements per parent element.
//!
//! Each parent gets a closed enum; anything else maps to `Other` and is
//! skipped by the walkers so newer Tiled output still loads.

use roxmltree::Node;

macro_rules! child_tags {
    ($name:ident { $($variant:ident => $tag:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub(crate) enum $name {
            $($variant,)+
            Other,
        }

        impl $name {
            pub(crate) fn of(node: Node) -> Self {
                match node.tag_name().name() {
                    $($tag => $name::$variant,)+
                    _ => $name::Other,
                }
            }
        }
    };
}

child_tags!(MapChild {
    Properties => "properties",
    Tileset => "tileset",
    Layer => "layer",
    ImageLayer => "imagelayer",
    ObjectGroup => "objectgroup",
    Group => "group",
});

child_tags!(GroupChild {
    Properties => "properties",
    Layer => "layer",
    ImageLayer => "imagelayer",
    ObjectGroup => "objectgroup",
    Group => "group",
});

child_tags!(TilesetChild {
    Image => "image",
    Tile => "tile",
    Properties => "properties",
    TerrainTypes => "terraintypes",
    WangSets => "wangsets",
    TileOffset => "tileoffset",
    Grid => "grid",
});

child_tags!(TileChild {
    Properties => "properties",
    Animation => "animation",
    Image => "image",
    ObjectGroup => "objectgroup",
});

child_tags!(AnimationChild {
    Frame => "frame",
});

child_tags!(TerrainTypesChild {
    Terrain => "terrain",
});

child_tags!(TerrainChild {
    Properties => "properties",
});

child_tags!(WangSetsChild {
    WangSet => "wangset",
});

child_tags!(WangSetChild {
    EdgeColor => "wangedgecolor",
    CornerColor => "wangcornercolor",
    Color => "wangcolor",
    Tile => "wangtile",
    Properties => "properties",
});

child_tags!(LayerChild {
    Properties => "properties",
    Data => "data",
});

child_tags!(DataChild {
    Tile => "tile",
    Chunk => "chunk",
});

child_tags!(ImageLayerChild {
    Image => "image",
    Properties => "properties",
});

child_tags!(ObjectGroupChild {
    Properties => "properties",
    Object => "object",
});

child_tags!(ObjectChild {
    Properties => "properties",
    Ellipse => "ellipse",
    Point => "point",
    Polygon => "polygon",
    Polyline => "polyline",
    Text => "text",
});

/// Element children of `node`, skipping text and comments.
pub(crate) fn elements<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(Node::is_element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    #[test]
    fn unknown_tags_map_to_other() {
        let doc = Document::parse("<map><tileset/><editorsettings/>text<layer/></map>")
            .expect("xml");
        let kinds: Vec<_> = elements(doc.root_element()).map(MapChild::of).collect();
        assert_eq!(
            kinds,
            vec![MapChild::Tileset, MapChild::Other, MapChild::Layer]
        );
    }
}
