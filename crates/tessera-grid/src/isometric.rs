//! Isometric (diamond-cell) renderer.
//!
//! Tile `(0, 0)` sits at the top center of the diamond-shaped map; the tile
//! x axis runs down-right and the tile y axis down-left. The pixel x of the
//! map's logical origin is therefore `rows * tile_width / 2`.
//!
//! # Visible-tile scan
//!
//! Screen rows of an isometric map interleave two diagonal tile rows per tile
//! height, each shifted half a tile horizontally from the previous one.
//! [`IsometricRenderer::draw_tile_layer`] walks screen rows half a tile
//! height apart, alternating the shift, and walks each row one tile width at
//! a time while stepping the tile cursor along the diagonal `(+1, -1)`. The
//! scan starts one tileset tile outside the viewport and may back up one more
//! row when the viewport's top-left corner lands in the upper half of the
//! starting tile, so the pointed tops of diamonds poking into the viewport
//! are still drawn.

use tessera_map::geometry::{GridPoint, Orientation, ViewportRect};
use tessera_map::layer::TileLayer;
use tessera_map::object::MapObject;
use tessera_map::tileset::{TileCell, TileSurface, Tileset};

use crate::renderer::{ensure_drawable, floor_px, lookup, GridDims, GridRenderer};
use crate::RenderError;

/// Renderer for isometric grids.
#[derive(Debug, Clone, PartialEq)]
pub struct IsometricRenderer {
    dims: GridDims,
    half_tile_width: f64,
    half_tile_height: f64,
    origin_x: f64,
}

impl IsometricRenderer {
    pub fn new(cols: u32, rows: u32, tile_width: u32, tile_height: u32) -> Self {
        let dims = GridDims::new(cols, rows, tile_width, tile_height);
        let half_tile_width = f64::from(tile_width) / 2.0;
        let half_tile_height = f64::from(tile_height) / 2.0;
        let origin_x = f64::from(rows) * half_tile_width;
        tracing::debug!(%dims, origin_x, "isometric renderer created");
        Self {
            dims,
            half_tile_width,
            half_tile_height,
            origin_x,
        }
    }

    /// Pixel x of tile `(0, 0)`'s top vertex.
    pub fn origin_x(&self) -> f64 {
        self.origin_x
    }
}

impl GridRenderer for IsometricRenderer {
    fn orientation(&self) -> Orientation {
        Orientation::Isometric
    }

    fn dims(&self) -> GridDims {
        self.dims
    }

    fn pixel_to_tile(&self, x: f64, y: f64) -> GridPoint {
        let row = y / self.dims.tile_height_f64();
        let col = (x - self.origin_x) / self.dims.tile_width_f64();
        GridPoint::new(row + col, row - col)
    }

    fn tile_to_pixel(&self, tile_x: f64, tile_y: f64) -> GridPoint {
        GridPoint::new(
            (tile_x - tile_y) * self.half_tile_width + self.origin_x,
            (tile_x + tile_y) * self.half_tile_height,
        )
    }

    /// Editor positions of isometric objects are stored with x in half-tile
    /// units and y in full-tile units; both are reprojected for every object.
    fn adjust_position(&self, object: &mut MapObject) {
        let tile_x = object.x / self.half_tile_width;
        let tile_y = object.y / self.dims.tile_height_f64();
        let projected = self.tile_to_pixel(tile_x, tile_y);
        object.x = projected.x;
        object.y = projected.y;
    }

    /// Integer placement with arithmetic right shifts (floor division).
    ///
    /// The y term subtracts the tileset's tile *width*; that is the placement
    /// existing maps were laid out against, so it is kept as is.
    fn draw_tile(
        &self,
        surface: &mut dyn TileSurface,
        x: i32,
        y: i32,
        cell: &TileCell,
        tileset: &Tileset,
    ) {
        let cols = self.dims.cols_i32();
        let tw = tileset.tile_width as i32;
        let th = tileset.tile_height as i32;
        let draw_x = ((cols - 1) * tw + (x - y) * tw) >> 1;
        let draw_y = (-tw + (x + y) * th) >> 2;
        tileset.draw_tile(surface, draw_x, draw_y, cell);
    }

    fn draw_tile_layer(
        &self,
        surface: &mut dyn TileSurface,
        layer: &dyn TileLayer,
        viewport: ViewportRect,
    ) -> Result<usize, RenderError> {
        ensure_drawable(self, layer, &viewport)?;

        let tile_width = self.dims.tile_width_f64();
        let tile_height = self.dims.tile_height_f64();
        let half_w = self.half_tile_width;
        let half_h = self.half_tile_height;

        // Margin of one tileset tile around the viewport.
        let margin = layer.tileset();
        let margin_w = f64::from(margin.tile_width);
        let margin_h = f64::from(margin.tile_height);

        let mut row_iter = self
            .pixel_to_tile(viewport.x - margin_w, viewport.y - margin_h)
            .floor();
        let tile_end = self
            .pixel_to_tile(viewport.right() + margin_w, viewport.bottom() + margin_h)
            .ceil();
        let rect_end = self.tile_to_pixel(tile_end.x, tile_end.y);

        let mut start = self.tile_to_pixel(row_iter.x, row_iter.y);
        start.x -= half_w;
        start.y += tile_height;

        // If the viewport's top-left corner is in the upper half of the
        // starting tile, the row above is visible too. Which neighbour that
        // is depends on the horizontal half.
        let in_upper_half = start.y - viewport.y > half_h;
        let in_left_half = viewport.x - start.x < half_w;

        if in_upper_half {
            if in_left_half {
                row_iter.x -= 1.0;
                start.x -= half_w;
            } else {
                row_iter.y -= 1.0;
                start.x += half_w;
            }
            start.y -= half_h;
        }

        // Whether the current row is shifted half a tile to the right.
        let mut shifted = in_upper_half ^ in_left_half;

        let (mut row_x, mut row_y) = row_iter.to_index();
        let mut drawn = 0;
        let mut rows_scanned = 0u32;

        let mut y = start.y;
        while y - tile_height < rect_end.y {
            let (mut col_x, mut col_y) = (row_x, row_y);
            let mut x = start.x;
            while x < rect_end.x {
                if let Some(cell) = lookup(layer, &self.dims, col_x, col_y) {
                    // Each cell may come from a different tileset.
                    let tileset = &cell.tileset;
                    tileset.draw_tile(
                        surface,
                        tileset.tile_offset.x + floor_px(x),
                        tileset.tile_offset.y + floor_px(y) - tileset.tile_height as i32,
                        cell,
                    );
                    drawn += 1;
                }
                // Cursors saturate for viewports far outside the map.
                col_x = col_x.saturating_add(1);
                col_y = col_y.saturating_sub(1);
                x += tile_width;
            }

            if shifted {
                row_y = row_y.saturating_add(1);
                start.x -= half_w;
            } else {
                row_x = row_x.saturating_add(1);
                start.x += half_w;
            }
            shifted = !shifted;
            rows_scanned += 1;
            y += half_h;
        }

        tracing::trace!(
            layer = layer.name(),
            start = ?row_iter.to_index(),
            end = ?tile_end.to_index(),
            rows_scanned,
            drawn,
            "isometric layer drawn"
        );
        Ok(drawn)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
