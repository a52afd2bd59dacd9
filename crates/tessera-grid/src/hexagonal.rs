//! Hexagonal renderer.
//!
//! Hexagons are indexed in doubled-offset coordinates: along the stagger axis
//! every other column (flat-top, stagger axis `x`) or row (pointy-top,
//! stagger axis `y`) is shifted by half a cell, and
//! [`StaggerIndex`] picks whether the odd or the even ones are shifted.
//!
//! # Derived metrics
//!
//! | Name | Value |
//! |------|-------|
//! | `side_length_x` / `side_length_y` | hex side on the stagger axis, 0 on the other |
//! | `side_offset_x` | `(tile_width - side_length_x) / 2` |
//! | `side_offset_y` | `(tile_height - side_length_y) / 2` |
//! | `column_width` | `side_offset_x + side_length_x` |
//! | `row_height` | `side_offset_y + side_length_y` |
//!
//! # Pixel to tile
//!
//! There is no closed form. The point is placed in a rectangular reference
//! cell spanning two staggered hexagons, and the nearest of four candidate
//! hexagon centers (the cell's own plus three staggered neighbours) wins.
//! Ties go to the lower candidate index.

use tessera_map::geometry::{GridPoint, Orientation, StaggerAxis, StaggerIndex, ViewportRect};
use tessera_map::layer::TileLayer;
use tessera_map::object::MapObject;
use tessera_map::tileset::{TileCell, TileSurface, Tileset};

use crate::config::HexParams;
use crate::renderer::{ensure_drawable, floor_px, lookup, GridDims, GridRenderer};
use crate::RenderError;

/// Tile deltas for the four candidates when columns are staggered.
const OFFSETS_STAGGER_X: [(i32, i32); 4] = [(0, 0), (1, -1), (1, 0), (2, 0)];

/// Tile deltas for the four candidates when rows are staggered.
const OFFSETS_STAGGER_Y: [(i32, i32); 4] = [(0, 0), (-1, 1), (0, 1), (0, 2)];

/// Renderer for hexagonal grids.
#[derive(Debug, Clone, PartialEq)]
pub struct HexagonalRenderer {
    dims: GridDims,
    params: HexParams,
    side_length_x: f64,
    side_length_y: f64,
    side_offset_x: f64,
    side_offset_y: f64,
    column_width: f64,
    row_height: f64,
}

impl HexagonalRenderer {
    pub fn new(cols: u32, rows: u32, tile_width: u32, tile_height: u32, params: HexParams) -> Self {
        let dims = GridDims::new(cols, rows, tile_width, tile_height);
        let side = f64::from(params.side_length);
        let (side_length_x, side_length_y) = match params.stagger_axis {
            StaggerAxis::X => (side, 0.0),
            StaggerAxis::Y => (0.0, side),
        };
        let side_offset_x = (f64::from(tile_width) - side_length_x) / 2.0;
        let side_offset_y = (f64::from(tile_height) - side_length_y) / 2.0;
        let column_width = side_offset_x + side_length_x;
        let row_height = side_offset_y + side_length_y;

        tracing::debug!(
            %dims,
            side_length = params.side_length,
            stagger_axis = ?params.stagger_axis,
            stagger_index = ?params.stagger_index,
            column_width,
            row_height,
            "hexagonal renderer created"
        );

        Self {
            dims,
            params,
            side_length_x,
            side_length_y,
            side_offset_x,
            side_offset_y,
            column_width,
            row_height,
        }
    }

    /// The hexagonal parameters this renderer was built with.
    pub fn params(&self) -> HexParams {
        self.params
    }

    /// Horizontal advance between adjacent staggered columns.
    pub fn column_width(&self) -> f64 {
        self.column_width
    }

    /// Vertical advance between adjacent staggered rows.
    pub fn row_height(&self) -> f64 {
        self.row_height
    }

    /// `(side_length_x, side_length_y)`.
    pub fn side_lengths(&self) -> (f64, f64) {
        (self.side_length_x, self.side_length_y)
    }

    /// `(side_offset_x, side_offset_y)`.
    pub fn side_offsets(&self) -> (f64, f64) {
        (self.side_offset_x, self.side_offset_y)
    }

    fn is_odd(&self) -> bool {
        self.params.stagger_index == StaggerIndex::Odd
    }

    /// Candidate hexagon centers relative to the reference cell, in
    /// tie-break order.
    fn candidate_centers(&self) -> [GridPoint; 4] {
        match self.params.stagger_axis {
            StaggerAxis::X => {
                let left = self.side_length_x / 2.0;
                let center_x = left + self.column_width;
                let center_y = self.dims.tile_height_f64() / 2.0;
                [
                    GridPoint::new(left, center_y),
                    GridPoint::new(center_x, center_y - self.row_height),
                    GridPoint::new(center_x, center_y + self.row_height),
                    GridPoint::new(center_x + self.column_width, center_y),
                ]
            }
            StaggerAxis::Y => {
                let top = self.side_length_y / 2.0;
                let center_x = self.dims.tile_width_f64() / 2.0;
                let center_y = top + self.row_height;
                [
                    GridPoint::new(center_x, top),
                    GridPoint::new(center_x - self.column_width, center_y),
                    GridPoint::new(center_x + self.column_width, center_y),
                    GridPoint::new(center_x, center_y + self.row_height),
                ]
            }
        }
    }

    /// Shift (0 or 1) applied to a row/column with the given index.
    fn stagger_shift(&self, index: f64) -> f64 {
        let parity = ((index as i64) & 1) as f64;
        if self.is_odd() {
            parity
        } else {
            1.0 - parity
        }
    }
}

impl GridRenderer for HexagonalRenderer {
    fn orientation(&self) -> Orientation {
        Orientation::Hexagonal
    }

    fn dims(&self) -> GridDims {
        self.dims
    }

    fn pixel_to_tile(&self, x: f64, y: f64) -> GridPoint {
        let tile_width = self.dims.tile_width_f64();
        let tile_height = self.dims.tile_height_f64();

        let (x, y) = match self.params.stagger_axis {
            StaggerAxis::X => {
                let shift = if self.is_odd() {
                    self.side_offset_x
                } else {
                    tile_width
                };
                (x - shift, y)
            }
            StaggerAxis::Y => {
                let shift = if self.is_odd() {
                    self.side_offset_y
                } else {
                    tile_height
                };
                (x, y - shift)
            }
        };

        // Grid-aligned reference cell and the point's offset inside it.
        let cell_w = tile_width + self.side_length_x;
        let cell_h = tile_height + self.side_length_y;
        let ref_x = (x / cell_w).floor();
        let ref_y = (y / cell_h).floor();
        let rel = GridPoint::new(x - ref_x * cell_w, y - ref_y * cell_h);

        // Each reference cell spans two staggered columns/rows. Kept in f64
        // so far-off points cannot overflow an integer index.
        let (mut ref_x, mut ref_y) = (ref_x, ref_y);
        let bump = if self.is_odd() { 0.0 } else { 1.0 };
        match self.params.stagger_axis {
            StaggerAxis::X => ref_x = ref_x * 2.0 + bump,
            StaggerAxis::Y => ref_y = ref_y * 2.0 + bump,
        }

        let mut nearest = 0;
        let mut min_dist = f64::MAX;
        for (i, center) in self.candidate_centers().iter().enumerate() {
            let dist = (center.x - rel.x).powi(2) + (center.y - rel.y).powi(2);
            if dist < min_dist {
                min_dist = dist;
                nearest = i;
            }
        }

        let offsets = match self.params.stagger_axis {
            StaggerAxis::X => &OFFSETS_STAGGER_X,
            StaggerAxis::Y => &OFFSETS_STAGGER_Y,
        };
        let (dq, dr) = offsets[nearest];
        GridPoint::new(ref_x + f64::from(dq), ref_y + f64::from(dr))
    }

    /// Top-left corner of the hexagon's bounding box.
    fn tile_to_pixel(&self, q: f64, r: f64) -> GridPoint {
        match self.params.stagger_axis {
            StaggerAxis::X => GridPoint::new(
                q * self.column_width,
                r * (self.dims.tile_height_f64() + self.side_length_y)
                    + self.row_height * self.stagger_shift(q),
            ),
            StaggerAxis::Y => GridPoint::new(
                q * (self.dims.tile_width_f64() + self.side_length_x)
                    + self.column_width * self.stagger_shift(r),
                r * self.row_height,
            ),
        }
    }

    /// Hexagonal object placement is not implemented; objects keep their
    /// editor position.
    fn adjust_position(&self, _object: &mut MapObject) {}

    fn draw_tile(
        &self,
        surface: &mut dyn TileSurface,
        x: i32,
        y: i32,
        cell: &TileCell,
        tileset: &Tileset,
    ) {
        let point = self.tile_to_pixel(f64::from(x), f64::from(y));
        let bottom_align = self.dims.tile_height as i32 - tileset.tile_height as i32;
        tileset.draw_tile(
            surface,
            tileset.tile_offset.x + floor_px(point.x),
            tileset.tile_offset.y + floor_px(point.y) + bottom_align,
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

        // Hex lookups can land on negative indices near the origin, so the
        // start corner is clamped as well as the end corner.
        let (start_x, start_y) = self.pixel_to_tile(viewport.x, viewport.y).floor().to_index();
        let (end_x, end_y) = self
            .pixel_to_tile(
                viewport.right() + self.dims.tile_width_f64(),
                viewport.bottom() + self.dims.tile_height_f64(),
            )
            .ceil()
            .to_index();
        let (start_x, start_y) = (start_x.max(0), start_y.max(0));
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
            "hexagonal layer drawn"
        );
        Ok(drawn)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
