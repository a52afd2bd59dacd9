//! Tessera Grid -- pixel/tile coordinate transforms and visible-tile drawing
//! for orthogonal, isometric and hexagonal tile maps.
//!
//! Each topology gets its own renderer type implementing the shared
//! [`GridRenderer`](renderer::GridRenderer) trait:
//!
//! - [`OrthogonalRenderer`](orthogonal::OrthogonalRenderer): square cells.
//! - [`IsometricRenderer`](isometric::IsometricRenderer): diamond cells drawn
//!   with a staggered scan over half-tile screen rows.
//! - [`HexagonalRenderer`](hexagonal::HexagonalRenderer): flat- or pointy-top
//!   hexagons in doubled-offset layout, with nearest-center pixel lookup.
//!
//! Renderers are immutable after construction and hold no per-frame state, so
//! one instance can draw every layer whose geometry it accepts
//! ([`GridRenderer::can_render`](renderer::GridRenderer::can_render)). The
//! [`RendererPool`](pool::RendererPool) does exactly that bookkeeping.
//!
//! # Quick Start
//!
//! ```
//! use tessera_grid::prelude::*;
//!
//! let config = GridConfig { orientation: Orientation::Isometric, cols: 10, rows: 10,
//!     tile_width: 64, tile_height: 32, hex: None };
//! let renderer = build_renderer(&config).unwrap();
//!
//! assert_eq!(renderer.tile_to_pixel(0.0, 0.0), GridPoint::new(320.0, 0.0));
//! assert_eq!(renderer.pixel_to_tile(320.0, 0.0), GridPoint::new(0.0, 0.0));
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod hexagonal;
pub mod isometric;
pub mod orthogonal;
pub mod pool;
pub mod renderer;

use tessera_map::geometry::{Orientation, ViewportRect};
use tessera_map::MapError;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced while configuring renderers or drawing layers.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A layer the renderer does not accept was handed to `draw_tile_layer`.
    #[error("{renderer} renderer ({expected}) cannot draw layer '{layer}' ({found})")]
    LayerMismatch {
        renderer: Orientation,
        layer: String,
        expected: String,
        found: String,
    },

    /// A hexagonal grid configured without side length and stagger settings.
    #[error("hexagonal grid requires hex parameters (side_length, stagger_axis, stagger_index)")]
    MissingHexParams,

    /// A hex side longer than the tile along its stagger axis.
    #[error("hex side length {side_length} exceeds the {extent}px tile extent along the stagger axis")]
    InvalidHexSide { side_length: u32, extent: u32 },

    /// A grid with a zero extent or zero-sized tiles.
    #[error("grid dimensions must be non-zero: {cols}x{rows} tiles of {tile_width}x{tile_height}px")]
    InvalidDimensions {
        cols: u32,
        rows: u32,
        tile_width: u32,
        tile_height: u32,
    },

    /// A viewport with a NaN or infinite edge.
    #[error("viewport must be finite, got {0:?}")]
    InvalidViewport(ViewportRect),

    /// Grid configuration JSON could not be parsed.
    #[error("invalid grid config: {0}")]
    Config(#[from] serde_json::Error),

    /// Map-level failure (unknown orientation string, ...).
    #[error(transparent)]
    Map(#[from] MapError),
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use tessera_map::prelude::*;

    pub use crate::config::{GridConfig, HexParams};
    pub use crate::hexagonal::HexagonalRenderer;
    pub use crate::isometric::IsometricRenderer;
    pub use crate::orthogonal::OrthogonalRenderer;
    pub use crate::pool::RendererPool;
    pub use crate::renderer::{build_renderer, GridDims, GridRenderer};
    pub use crate::RenderError;
}
