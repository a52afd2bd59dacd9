//! Tilesets, tile cells and the draw surface.
//!
//! A [`Tileset`] carries the pixel metrics renderers need to place a tile
//! (tile size and a per-tileset draw offset). The actual blit is delegated to
//! a [`TileSurface`], an opaque handle owned by the host that the renderers
//! forward untouched.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TileSurface
// ---------------------------------------------------------------------------

/// The host's draw context.
///
/// Renderers compute where a tile goes and hand the request to the surface;
/// they never composite pixels themselves.
pub trait TileSurface {
    /// Draw `cell` from `tileset` with its top-left corner at `(x, y)`.
    fn blit(&mut self, tileset: &Tileset, cell: &TileCell, x: i32, y: i32);
}

// ---------------------------------------------------------------------------
// TileOffset
// ---------------------------------------------------------------------------

/// Per-tileset pixel offset applied to every tile drawn from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TileOffset {
    pub x: i32,
    pub y: i32,
}

// ---------------------------------------------------------------------------
// Tileset
// ---------------------------------------------------------------------------

/// Metrics of one tileset image.
///
/// `tile_width`/`tile_height` are the tileset's own tile size, which may
/// differ from the map's grid cell size (tall trees on a 32x32 grid, say).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tileset {
    /// Name used in logs and draw manifests.
    pub name: String,
    /// First global tile id owned by this tileset.
    pub first_gid: u32,
    /// Width of one tile image in pixels.
    pub tile_width: u32,
    /// Height of one tile image in pixels.
    pub tile_height: u32,
    /// Draw offset applied to every tile of this tileset.
    #[serde(default)]
    pub tile_offset: TileOffset,
}

impl Tileset {
    /// Create a tileset with no draw offset.
    pub fn new(name: impl Into<String>, first_gid: u32, tile_width: u32, tile_height: u32) -> Self {
        Self {
            name: name.into(),
            first_gid,
            tile_width,
            tile_height,
            tile_offset: TileOffset::default(),
        }
    }

    /// Builder-style setter for the draw offset.
    pub fn with_offset(mut self, x: i32, y: i32) -> Self {
        self.tile_offset = TileOffset { x, y };
        self
    }

    /// Whether `gid` falls in this tileset's range (`gid >= first_gid`).
    pub fn contains(&self, gid: u32) -> bool {
        gid >= self.first_gid
    }

    /// Forward one draw request to `surface`.
    #[inline]
    pub fn draw_tile(&self, surface: &mut dyn TileSurface, x: i32, y: i32, cell: &TileCell) {
        surface.blit(self, cell, x, y);
    }
}

// ---------------------------------------------------------------------------
// TileCell
// ---------------------------------------------------------------------------

/// One occupied slot of a tile layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileCell {
    /// Global tile id.
    pub gid: u32,
    /// The tileset this cell draws from.
    pub tileset: Arc<Tileset>,
}

impl TileCell {
    pub fn new(gid: u32, tileset: Arc<Tileset>) -> Self {
        Self { gid, tileset }
    }

    /// Id of the tile inside its tileset.
    pub fn local_id(&self) -> u32 {
        self.gid.saturating_sub(self.tileset.first_gid)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
