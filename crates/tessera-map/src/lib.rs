//! Tessera Map -- the tile-map collaborators consumed by the grid renderers.
//!
//! The renderers in `tessera-grid` never parse map files or blit pixels. They
//! read grid data through the narrow types defined here:
//!
//! - [`layer`]: the [`TileLayer`](layer::TileLayer) trait and an in-memory
//!   [`GridLayer`](layer::GridLayer) storing cells by tile index.
//! - [`tileset`]: [`Tileset`](tileset::Tileset), [`TileCell`](tileset::TileCell)
//!   and the [`TileSurface`](tileset::TileSurface) draw handle.
//! - [`object`]: [`MapObject`](object::MapObject), the placed object whose
//!   position renderers adjust.
//! - [`geometry`]: value types shared by every topology
//!   ([`GridPoint`](geometry::GridPoint), [`ViewportRect`](geometry::ViewportRect))
//!   and the orientation/stagger enums.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use tessera_map::prelude::*;
//!
//! let tileset = Arc::new(Tileset::new("terrain", 1, 32, 32));
//! let mut layer = GridLayer::new("ground", "orthogonal", 4, 4, 32, 32, Arc::clone(&tileset));
//! layer.set_cell(1, 2, Some(TileCell::new(7, Arc::clone(&tileset)))).unwrap();
//!
//! assert_eq!(layer.cell(1, 2).map(|c| c.gid), Some(7));
//! assert!(layer.cell(0, 0).is_none());
//! assert!(layer.cell(-1, 0).is_none());
//! ```

#![deny(unsafe_code)]

pub mod geometry;
pub mod layer;
pub mod object;
pub mod tileset;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced when building or editing map data.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// An orientation string that no renderer handles.
    #[error("unknown orientation '{0}' (expected one of: orthogonal, isometric, hexagonal)")]
    UnknownOrientation(String),

    /// A stagger axis string other than `x` or `y`.
    #[error("unknown stagger axis '{0}' (expected 'x' or 'y')")]
    UnknownStaggerAxis(String),

    /// A stagger index string other than `odd` or `even`.
    #[error("unknown stagger index '{0}' (expected 'odd' or 'even')")]
    UnknownStaggerIndex(String),

    /// Cell data whose length does not match the layer's grid extents.
    #[error("layer '{layer}' expects {expected} cells ({cols}x{rows}), got {actual}")]
    CellCountMismatch {
        layer: String,
        cols: u32,
        rows: u32,
        expected: usize,
        actual: usize,
    },

    /// A layer built from gids without any tileset to resolve them.
    #[error("layer '{layer}' has no tilesets")]
    NoTilesets { layer: String },

    /// A cell write outside the layer's grid.
    #[error("tile index ({x}, {y}) is outside layer '{layer}' ({cols}x{rows})")]
    CellOutOfBounds {
        layer: String,
        x: i32,
        y: i32,
        cols: u32,
        rows: u32,
    },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::geometry::{GridPoint, Orientation, StaggerAxis, StaggerIndex, ViewportRect};
    pub use crate::layer::{GridLayer, TileLayer};
    pub use crate::object::MapObject;
    pub use crate::tileset::{TileCell, TileOffset, TileSurface, Tileset};
    pub use crate::MapError;
}

// ---------------------------------------------------------------------------
// Integration Tests
// ---------------------------------------------------------------------------
