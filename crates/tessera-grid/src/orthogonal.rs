//! Orthogonal (square-cell) renderer.
//!
//! Pixel and tile space differ only by the cell size. Tiles taller than the
//! grid cell are bottom-aligned within their cell, so a 32x64 tree on a 32x32
//! grid overlaps the row above it; drawing rows top to bottom keeps the
//! overlap layered correctly.

use tessera_map::geometry::{GridPoint, Orientation, ViewportRect};
use tessera_map::layer::TileLayer;
use tessera_map::object::MapObject;
use tessera_map::tileset::{TileCell, TileSurface, Tileset};

use crate::renderer::{ensure_drawable, lookup, GridDims, GridRenderer};
use crate::RenderError;

/// Renderer for square grids.
#[derive(Debug, Clone, PartialEq)]
pub struct OrthogonalRenderer {
    dims: GridDims,
}

impl OrthogonalRenderer {
    pub fn new(cols: u32, rows: u32, tile_width: u32, tile_height: u32) -> Self {
        let dims = GridDims::new(cols, rows, tile_width, tile_height);
        tracing::debug!(%dims, "orthogonal renderer created");
        Self { dims }
    }
}

impl GridRenderer for OrthogonalRenderer {
    fn orientation(&self) -> Orientation {
        Orientation::Orthogonal
    }

    fn dims(&self) -> GridDims {
        self.dims
    }

    fn pixel_to_tile(&self, x: f64, y: f64) -> GridPoint {
        GridPoint::new(self.pixel_to_tile_x(x, y), self.pixel_to_tile_y(x, y))
    }

    fn pixel_to_tile_x(&self, x: f64, _y: f64) -> f64 {
        x / self.dims.tile_width_f64()
    }

    fn pixel_to_tile_y(&self, _x: f64, y: f64) -> f64 {
        y / self.dims.tile_height_f64()
    }

    fn tile_to_pixel(&self, tile_x: f64, tile_y: f64) -> GridPoint {
        GridPoint::new(
            tile_x * self.dims.tile_width_f64(),
            tile_y * self.dims.tile_height_f64(),
        )
    }

    /// Tile objects are anchored bottom-left in the editor and top-left in
    /// the engine. Shape objects are left alone.
    fn adjust_position(&self, object: &mut MapObject) {
        if object.is_tile_object() {
            object.y -= object.height;
        }
    }

    fn draw_tile(
        &self,
        surface: &mut dyn TileSurface,
        x: i32,
        y: i32,
        cell: &TileCell,
        tileset: &Tileset,
    ) {
        let tw = self.dims.tile_width as i32;
        let th = self.dims.tile_height as i32;
        tileset.draw_tile(
            surface,
            tileset.tile_offset.x + x * tw,
            tileset.tile_offset.y + (y + 1) * th - tileset.tile_height as i32,
            cell,
        );
    }

    fn draw_tile_layer(
        &self,
        surface: &mut dyn TileSurface,
        layer: &dyn TileLayer,
        viewport: ViewportRect,
    ) -> Result<usize, RenderError> {
        ensure_drawable(self, layer, &viewport)?;

        // The end corner is pushed out by one tile so partially visible
        // tiles on the right and bottom edges are drawn. The start corner is
        // not clamped: indices left of or above the grid find no cell.
        let (start_x, start_y) = self.pixel_to_tile(viewport.x, viewport.y).floor().to_index();
        let (end_x, end_y) = self
            .pixel_to_tile(
                viewport.right() + self.dims.tile_width_f64(),
                viewport.bottom() + self.dims.tile_height_f64(),
            )
            .ceil()
            .to_index();
        let end_x = end_x.min(self.dims.cols_i32());
        let end_y = end_y.min(self.dims.rows_i32());

        let mut drawn = 0;
        for y in start_y..end_y {
            for x in start_x..end_x {
                if let Some(cell) = lookup(layer, &self.dims, x, y) {
                    self.draw_tile(surface, x, y, cell, &cell.tileset);
                    drawn += 1;
                }
            }
        }

        tracing::trace!(
            layer = layer.name(),
            start = ?(start_x, start_y),
            end = ?(end_x, end_y),
            drawn,
            "orthogonal layer drawn"
        );
        Ok(drawn)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
