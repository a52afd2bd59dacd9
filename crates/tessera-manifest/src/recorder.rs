//! Draw recorder.
//!
//! [`DrawRecorder`] stands in for a real draw surface. Each
//! [`blit`](TileSurface::blit) becomes a [`DrawCall`] appended in issue
//! order, which is also the visual layering order.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tessera_manifest::recorder::DrawRecorder;
//! use tessera_map::tileset::{TileCell, Tileset};
//!
//! let ts = Arc::new(Tileset::new("grass", 1, 32, 32));
//! let cell = TileCell::new(3, Arc::clone(&ts));
//!
//! let mut recorder = DrawRecorder::new();
//! ts.draw_tile(&mut recorder, 64, 32, &cell);
//!
//! assert_eq!(recorder.len(), 1);
//! assert_eq!(recorder.calls()[0].local_id, 2);
//! ```

use serde::{Deserialize, Serialize};
use tessera_map::tileset::{TileCell, TileSurface, Tileset};

// ---------------------------------------------------------------------------
// DrawCall
// ---------------------------------------------------------------------------

/// One recorded draw request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DrawCall {
    /// Global tile id of the drawn cell.
    pub gid: u32,
    /// Tile id inside its tileset.
    pub local_id: u32,
    /// Name of the tileset drawn from.
    pub tileset: String,
    /// Pixel x of the tile's top-left corner.
    pub x: i32,
    /// Pixel y of the tile's top-left corner.
    pub y: i32,
}

// ---------------------------------------------------------------------------
// DrawRecorder
// ---------------------------------------------------------------------------

/// A [`TileSurface`] that records instead of drawing.
#[derive(Debug, Clone, Default)]
pub struct DrawRecorder {
    calls: Vec<DrawCall>,
}

impl DrawRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded calls in issue order.
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Take the recorded calls, leaving the recorder empty.
    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Calls drawing from the named tileset.
    pub fn calls_for_tileset<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a DrawCall> {
        self.calls.iter().filter(move |c| c.tileset == name)
    }

    /// Calls drawing the given global tile id.
    pub fn calls_for_gid(&self, gid: u32) -> impl Iterator<Item = &DrawCall> {
        self.calls.iter().filter(move |c| c.gid == gid)
    }

    /// Pixel bounding box `(min_x, min_y, max_x, max_y)` of all recorded
    /// top-left corners, or `None` when nothing was drawn.
    pub fn extent(&self) -> Option<(i32, i32, i32, i32)> {
        let first = self.calls.first()?;
        let init = (first.x, first.y, first.x, first.y);
        Some(self.calls.iter().fold(init, |(x0, y0, x1, y1), c| {
            (x0.min(c.x), y0.min(c.y), x1.max(c.x), y1.max(c.y))
        }))
    }
}

impl TileSurface for DrawRecorder {
    fn blit(&mut self, tileset: &Tileset, cell: &TileCell, x: i32, y: i32) {
        self.calls.push(DrawCall {
            gid: cell.gid,
            local_id: cell.local_id(),
            tileset: tileset.name.clone(),
            x,
            y,
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
