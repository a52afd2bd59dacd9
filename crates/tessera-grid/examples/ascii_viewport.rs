//! Draws one small map in each topology and prints where every tile landed.
//!
//! Run with:
//!   RUST_LOG=tessera_grid=debug cargo run --example ascii_viewport -p tessera-grid
//!
//! Each frame is rasterised coarsely: every draw request writes the first
//! letter of its tileset at the character cell containing its top-left pixel.

use std::sync::Arc;

use anyhow::Context;
use tessera_grid::prelude::*;

/// Pixels per character cell.
const CELL_W: i32 = 16;
const CELL_H: i32 = 16;

/// A character canvas that records tile placements.
struct AsciiSurface {
    width: usize,
    height: usize,
    chars: Vec<char>,
    clipped: usize,
}

impl AsciiSurface {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            chars: vec!['.'; width * height],
            clipped: 0,
        }
    }

    fn render(&self) -> String {
        self.chars
            .chunks(self.width)
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl TileSurface for AsciiSurface {
    fn blit(&mut self, tileset: &Tileset, _cell: &TileCell, x: i32, y: i32) {
        let col = x.div_euclid(CELL_W);
        let row = y.div_euclid(CELL_H);
        let in_bounds = col >= 0
            && row >= 0
            && (col as usize) < self.width
            && (row as usize) < self.height;
        if !in_bounds {
            self.clipped += 1;
            return;
        }
        let glyph = tileset.name.chars().next().unwrap_or('?');
        self.chars[row as usize * self.width + col as usize] = glyph;
    }
}

fn checkerboard(orientation: &str, config: &GridConfig) -> anyhow::Result<GridLayer> {
    let grass = Arc::new(Tileset::new("grass", 1, config.tile_width, config.tile_height));
    let water = Arc::new(Tileset::new("water", 100, config.tile_width, config.tile_height));
    let gids: Vec<u32> = (0..config.rows)
        .flat_map(|y| (0..config.cols).map(move |x| if (x + y) % 2 == 0 { 1 } else { 100 }))
        .collect();
    let layer = GridLayer::from_gids(
        orientation,
        orientation,
        (config.cols, config.rows),
        (config.tile_width, config.tile_height),
        &[grass, water],
        &gids,
    )?;
    Ok(layer)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let configs = [
        r#"{ "orientation": "orthogonal", "cols": 6, "rows": 4, "tile_width": 32, "tile_height": 32 }"#,
        r#"{ "orientation": "isometric", "cols": 5, "rows": 5, "tile_width": 64, "tile_height": 32 }"#,
        r#"{ "orientation": "hexagonal", "cols": 6, "rows": 5, "tile_width": 32, "tile_height": 32,
             "hex": { "side_length": 16, "stagger_axis": "y", "stagger_index": "odd" } }"#,
    ];

    let mut pool = RendererPool::new();
    for json in configs {
        let config = GridConfig::from_json_str(json).context("parsing grid config")?;
        let layer = checkerboard(config.orientation.as_str(), &config)?;
        let viewport = ViewportRect::new(0.0, 0.0, 320.0, 160.0);

        let mut surface = AsciiSurface::new(20, 10);
        let drawn = pool
            .draw_layer(&mut surface, &layer, config.hex, viewport)
            .with_context(|| format!("drawing {} layer", config.orientation))?;

        println!(
            "{} ({}): {drawn} tiles drawn, {} outside the canvas",
            config.orientation,
            config.dims(),
            surface.clipped
        );
        println!("{}\n", surface.render());
    }

    println!("{} renderers built", pool.len());
    Ok(())
}
