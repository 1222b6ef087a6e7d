//! Plain-text dump of the tilesets of a map, for eyeballing a load.

use crate::attributes::{Attributes, Property};
use crate::map::{Map, Tileset, WangSet};
use std::io::{self, Write};

/// Writes every tileset of `map`: properties, image, terrains, tiles with
/// their animations, and wang sets.
pub fn write_tileset_report(map: &Map, out: &mut impl Write) -> io::Result<()> {
    for tileset in &map.tilesets {
        write_tileset(tileset, out)?;
    }
    writeln!(out, "End of Tileset")
}

fn write_tileset(tileset: &Tileset, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Tileset {}:", tileset.name().unwrap_or("<unnamed>"))?;
    writeln!(out, "\tAttributes: {}", attribute_line(&tileset.attributes))?;
    writeln!(out, "\tProperties:")?;
    write_properties(&tileset.properties, "\t\t", out)?;

    if let Some(image) = &tileset.image {
        writeln!(out, "\tImage: {}", attribute_line(&image.attributes))?;
    }

    writeln!(out, "\tTerrain Types:")?;
    for terrain in &tileset.terrain_types.terrains {
        writeln!(out, "\t\tAttributes: {}", attribute_line(&terrain.attributes))?;
        write_properties(&terrain.properties, "\t\t\t", out)?;
    }

    writeln!(out, "\tTiles:")?;
    for tile in &tileset.tiles {
        writeln!(out, "\t\tAttributes: {}", attribute_line(&tile.attributes))?;
        write_properties(&tile.properties, "\t\t\t", out)?;
        if let Some(animation) = &tile.animation {
            let frames: Vec<_> = animation
                .frames
                .iter()
                .map(|frame| attribute_line(&frame.attributes))
                .collect();
            writeln!(out, "\t\t\tAnimation: {}", frames.join(" | "))?;
        }
    }

    writeln!(out, "\tWang Sets:")?;
    for wang_set in &tileset.wang_sets {
        write_wang_set(wang_set, out)?;
    }
    Ok(())
}

fn write_wang_set(wang_set: &WangSet, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "\t\t{}", attribute_line(&wang_set.attributes))?;
    write_properties(&wang_set.properties, "\t\t\t", out)?;
    let colors = wang_set
        .edge_colors
        .iter()
        .map(|c| &c.attributes)
        .chain(wang_set.corner_colors.iter().map(|c| &c.attributes))
        .chain(wang_set.colors.iter().map(|c| &c.attributes));
    for attributes in colors {
        writeln!(out, "\t\t\tColor: {}", attribute_line(attributes))?;
    }
    for tile in &wang_set.tiles {
        writeln!(out, "\t\t\tTile: {}", attribute_line(&tile.attributes))?;
    }
    Ok(())
}

fn write_properties(properties: &[Property], indent: &str, out: &mut impl Write) -> io::Result<()> {
    for property in properties {
        if !property.pc_data.is_empty() {
            writeln!(out, "{indent}PC Data: {}", property.pc_data)?;
        }
        writeln!(out, "{indent}{}", attribute_line(&property.attributes))?;
    }
    Ok(())
}

fn attribute_line(attributes: &Attributes) -> String {
    attributes
        .iter()
        .map(|(k, v)| format!("{k} = {v}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{Animation, Frame, Image, Tile};

    #[test]
    fn lists_tileset_contents() {
        let mut frame = Attributes::new();
        frame.insert("tileid", "0");
        frame.insert("duration", "100");
        let mut property = Property::default();
        property.attributes.insert("name", "biome");
        property.attributes.insert("value", "forest");
        property.pc_data = "note".into();

        let tileset = Tileset {
            attributes: [("name", "terrain"), ("tilecount", "4")].into_iter().collect(),
            image: Some(Image {
                attributes: [("source", "terrain.png")].into_iter().collect(),
            }),
            properties: vec![property],
            tiles: vec![Tile {
                attributes: [("id", "0")].into_iter().collect(),
                animation: Some(Animation {
                    frames: vec![Frame { attributes: frame }],
                }),
                ..Tile::default()
            }],
            ..Tileset::default()
        };
        let map = Map {
            tilesets: vec![tileset],
            ..Map::default()
        };

        let mut out = Vec::new();
        write_tileset_report(&map, &mut out).expect("report");
        let text = String::from_utf8(out).expect("utf8");

        assert!(text.starts_with("Tileset terrain:\n"));
        assert!(text.contains("\tAttributes: name = terrain tilecount = 4\n"));
        assert!(text.contains("\t\tPC Data: note\n"));
        assert!(text.contains("\t\tname = biome value = forest\n"));
        assert!(text.contains("\tImage: source = terrain.png\n"));
        assert!(text.contains("\t\t\tAnimation: tileid = 0 duration = 100\n"));
        assert!(text.ends_with("End of Tileset\n"));
    }
}
