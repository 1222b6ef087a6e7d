//! Loads a map and prints its tilesets, or the whole model as JSON.
//!
//! ```text
//! cargo run --example dump_map -- assets/maps/level.tmx
//! cargo run --example dump_map -- assets/maps/level.tmx --json
//! ```

use anyhow::Context;
use tmx_loader::{load_map, write_tileset_report, LoadOptions};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .unwrap_or_else(|| "assets/maps/level.tmx".to_owned());
    let json = args.any(|arg| arg == "--json");

    let map = load_map(&path, &LoadOptions::default())
        .with_context(|| format!("loading {path}"))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &map)?;
        println!();
    } else {
        write_tileset_report(&map, &mut out)?;
        for layer in map.all_layers() {
            let used = layer.data.gids().filter(|gid| !gid.is_empty()).count();
            println!(
                "layer {}: {} tiles, {used} used",
                layer.name().unwrap_or("<unnamed>"),
                layer.data.tiles.len()
            );
        }
    }
    Ok(())
}
