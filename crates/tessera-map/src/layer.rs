//! Tile layers.
//!
//! Renderers see a layer only through [`TileLayer`]: its declared orientation,
//! grid metrics, a default tileset, and a cell lookup by tile index. The
//! lookup is total: any index outside `[0, cols) x [0, rows)` yields `None`.
//!
//! [`GridLayer`] is the in-memory implementation used by hosts that have
//! already decoded their map data.

use std::sync::Arc;

use crate::tileset::{TileCell, Tileset};
use crate::MapError;

// ---------------------------------------------------------------------------
// TileLayer
// ---------------------------------------------------------------------------

/// Read-only view of one tile layer.
pub trait TileLayer {
    /// Layer name, for diagnostics.
    fn name(&self) -> &str;

    /// Declared orientation string (`"orthogonal"`, `"isometric"`, ...).
    ///
    /// Kept as the raw string so that renderers can reject any value they do
    /// not handle, including unknown ones.
    fn orientation(&self) -> &str;

    /// Number of tile columns.
    fn cols(&self) -> u32;

    /// Number of tile rows.
    fn rows(&self) -> u32;

    /// Grid cell width in pixels.
    fn tile_width(&self) -> u32;

    /// Grid cell height in pixels.
    fn tile_height(&self) -> u32;

    /// Layer-level default tileset.
    fn tileset(&self) -> &Tileset;

    /// The cell at tile index `(x, y)`, or `None` when empty or out of range.
    fn cell(&self, x: i32, y: i32) -> Option<&TileCell>;
}

// ---------------------------------------------------------------------------
// GridLayer
// ---------------------------------------------------------------------------

/// Dense, column-major tile layer.
///
/// Cells are stored at `x * rows + y`, matching the `data[x][y]` lookup order
/// renderers use.
#[derive(Debug, Clone)]
pub struct GridLayer {
    name: String,
    orientation: String,
    cols: u32,
    rows: u32,
    tile_width: u32,
    tile_height: u32,
    tileset: Arc<Tileset>,
    cells: Vec<Option<TileCell>>,
}

impl GridLayer {
    /// Create an empty layer.
    pub fn new(
        name: impl Into<String>,
        orientation: impl Into<String>,
        cols: u32,
        rows: u32,
        tile_width: u32,
        tile_height: u32,
        tileset: Arc<Tileset>,
    ) -> Self {
        Self {
            name: name.into(),
            orientation: orientation.into(),
            cols,
            rows,
            tile_width,
            tile_height,
            tileset,
            cells: vec![None; cols as usize * rows as usize],
        }
    }

    /// Fill the layer from row-major global tile ids, `0` meaning empty.
    ///
    /// Each gid is resolved to the tileset with the greatest `first_gid` not
    /// above it. `tilesets[0]` becomes the layer's default tileset.
    pub fn from_gids(
        name: impl Into<String>,
        orientation: impl Into<String>,
        (cols, rows): (u32, u32),
        (tile_width, tile_height): (u32, u32),
        tilesets: &[Arc<Tileset>],
        gids: &[u32],
    ) -> Result<Self, MapError> {
        let name = name.into();
        let expected = cols as usize * rows as usize;
        if gids.len() != expected {
            return Err(MapError::CellCountMismatch {
                layer: name,
                cols,
                rows,
                expected,
                actual: gids.len(),
            });
        }
        let Some(default) = tilesets.first() else {
            return Err(MapError::NoTilesets { layer: name });
        };

        let mut layer = Self::new(
            name,
            orientation,
            cols,
            rows,
            tile_width,
            tile_height,
            Arc::clone(default),
        );

        let mut unowned = 0usize;
        for (i, &gid) in gids.iter().enumerate() {
            if gid == 0 {
                continue;
            }
            let x = (i % cols as usize) as i32;
            let y = (i / cols as usize) as i32;
            let tileset = match tilesets
                .iter()
                .filter(|ts| ts.contains(gid))
                .max_by_key(|ts| ts.first_gid)
            {
                Some(ts) => ts,
                None => {
                    unowned += 1;
                    default
                }
            };
            layer.set_cell(x, y, Some(TileCell::new(gid, Arc::clone(tileset))))?;
        }

        if unowned > 0 {
            tracing::warn!(
                layer = %layer.name,
                unowned,
                "gids below every tileset's first_gid fell back to the default tileset"
            );
        }
        tracing::debug!(
            layer = %layer.name,
            cols,
            rows,
            present = layer.present_count(),
            tilesets = tilesets.len(),
            "layer built from gids"
        );
        Ok(layer)
    }

    /// Replace the cell at `(x, y)`.
    pub fn set_cell(&mut self, x: i32, y: i32, cell: Option<TileCell>) -> Result<(), MapError> {
        let Some(idx) = self.index(x, y) else {
            return Err(MapError::CellOutOfBounds {
                layer: self.name.clone(),
                x,
                y,
                cols: self.cols,
                rows: self.rows,
            });
        };
        self.cells[idx] = cell;
        Ok(())
    }

    /// Number of occupied cells.
    pub fn present_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Iterate occupied cells as `((x, y), cell)` in column-major order.
    pub fn iter_present(&self) -> impl Iterator<Item = ((i32, i32), &TileCell)> + '_ {
        let rows = self.rows as usize;
        self.cells.iter().enumerate().filter_map(move |(i, c)| {
            c.as_ref()
                .map(|cell| (((i / rows) as i32, (i % rows) as i32), cell))
        })
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = u32::try_from(x).ok().filter(|&x| x < self.cols)?;
        let y = u32::try_from(y).ok().filter(|&y| y < self.rows)?;
        Some(x as usize * self.rows as usize + y as usize)
    }
}

impl TileLayer for GridLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn orientation(&self) -> &str {
        &self.orientation
    }

    fn cols(&self) -> u32 {
        self.cols
    }

    fn rows(&self) -> u32 {
        self.rows
    }

    fn tile_width(&self) -> u32 {
        self.tile_width
    }

    fn tile_height(&self) -> u32 {
        self.tile_height
    }

    fn tileset(&self) -> &Tileset {
        &self.tileset
    }

    fn cell(&self, x: i32, y: i32) -> Option<&TileCell> {
        self.index(x, y).and_then(|idx| self.cells[idx].as_ref())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn tileset(name: &str, first_gid: u32) -> Arc<Tileset> {
        Arc::new(Tileset::new(name, first_gid, 32, 32))
    }

    #[test]
    fn lookup_outside_grid_is_none() {
        let a = tileset("a", 1);
        let mut layer = GridLayer::new("l", "orthogonal", 3, 2, 32, 32, Arc::clone(&a));
        for x in 0..3 {
            for y in 0..2 {
                layer
                    .set_cell(x, y, Some(TileCell::new(1, Arc::clone(&a))))
                    .unwrap();
            }
        }
        assert!(layer.cell(2, 1).is_some());
        assert!(layer.cell(3, 0).is_none());
        assert!(layer.cell(0, 2).is_none());
        assert!(layer.cell(-1, 0).is_none());
        assert!(layer.cell(0, -1).is_none());
        assert!(layer.cell(i32::MIN, i32::MAX).is_none());
    }

    #[test]
    fn set_cell_out_of_bounds_is_an_error() {
        let mut layer = GridLayer::new("l", "orthogonal", 3, 2, 32, 32, tileset("a", 1));
        let err = layer.set_cell(3, 0, None).unwrap_err();
        assert!(matches!(err, MapError::CellOutOfBounds { x: 3, y: 0, .. }));
    }

    #[test]
    fn from_gids_is_row_major_and_resolves_tilesets() {
        let a = tileset("a", 1);
        let b = tileset("b", 10);
        let gids = [
            0, 1, 2, //
            10, 0, 11,
        ];
        let layer = GridLayer::from_gids(
            "l",
            "isometric",
            (3, 2),
            (32, 32),
            &[Arc::clone(&a), Arc::clone(&b)],
            &gids,
        )
        .unwrap();

        assert_eq!(layer.present_count(), 4);
        assert!(layer.cell(0, 0).is_none());
        assert_eq!(layer.cell(1, 0).unwrap().gid, 1);
        assert_eq!(layer.cell(2, 0).unwrap().tileset.name, "a");
        assert_eq!(layer.cell(0, 1).unwrap().tileset.name, "b");
        assert_eq!(layer.cell(2, 1).unwrap().local_id(), 1);
        assert_eq!(layer.tileset().name, "a");
    }

    #[test]
    fn from_gids_rejects_wrong_length_and_missing_tilesets() {
        let err = GridLayer::from_gids("l", "orthogonal", (2, 2), (8, 8), &[tileset("a", 1)], &[1, 2, 3])
            .unwrap_err();
        assert!(matches!(
            err,
            MapError::CellCountMismatch {
                expected: 4,
                actual: 3,
                ..
            }
        ));

        let err = GridLayer::from_gids("l", "orthogonal", (1, 1), (8, 8), &[], &[1]).unwrap_err();
        assert!(matches!(err, MapError::NoTilesets { .. }));
    }

    #[test]
    fn iter_present_reports_tile_indices() {
        let a = tileset("a", 1);
        let mut layer = GridLayer::new("l", "orthogonal", 4, 3, 32, 32, Arc::clone(&a));
        layer.set_cell(3, 2, Some(TileCell::new(5, Arc::clone(&a)))).unwrap();
        layer.set_cell(1, 0, Some(TileCell::new(6, a))).unwrap();

        let found: Vec<_> = layer.iter_present().map(|(idx, c)| (idx, c.gid)).collect();
        assert_eq!(found, vec![((1, 0), 6), ((3, 2), 5)]);
    }
}
