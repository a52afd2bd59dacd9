//! Renderer configuration.
//!
//! A [`GridConfig`] names the topology and grid metrics a renderer is built
//! for. It can be written inline, derived from a layer with
//! [`GridConfig::from_layer`], or loaded from JSON:
//!
//! ```
//! use tessera_grid::config::GridConfig;
//!
//! let config = GridConfig::from_json_str(r#"{
//!     "orientation": "hexagonal",
//!     "cols": 20, "rows": 15, "tile_width": 32, "tile_height": 32,
//!     "hex": { "side_length": 16, "stagger_axis": "y", "stagger_index": "odd" }
//! }"#).unwrap();
//! assert_eq!(config.hex.unwrap().side_length, 16);
//! ```

use serde::{Deserialize, Serialize};
use tessera_map::geometry::{Orientation, StaggerAxis, StaggerIndex};
use tessera_map::layer::TileLayer;

use crate::renderer::GridDims;
use crate::RenderError;

// ---------------------------------------------------------------------------
// HexParams
// ---------------------------------------------------------------------------

/// Hexagonal-only grid parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HexParams {
    /// Length of the flat hexagon edge along the stagger axis, in pixels.
    pub side_length: u32,
    /// Which axis is staggered.
    pub stagger_axis: StaggerAxis,
    /// Whether odd or even rows/columns are shifted.
    pub stagger_index: StaggerIndex,
}

// ---------------------------------------------------------------------------
// GridConfig
// ---------------------------------------------------------------------------

/// Static configuration for one renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Grid topology.
    pub orientation: Orientation,
    /// Number of tile columns.
    pub cols: u32,
    /// Number of tile rows.
    pub rows: u32,
    /// Grid cell width in pixels.
    pub tile_width: u32,
    /// Grid cell height in pixels.
    pub tile_height: u32,
    /// Hexagonal parameters; required when `orientation` is hexagonal and
    /// ignored otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex: Option<HexParams>,
}

impl Default for GridConfig {
    /// A 10x10 orthogonal grid of 32px tiles.
    fn default() -> Self {
        Self {
            orientation: Orientation::Orthogonal,
            cols: 10,
            rows: 10,
            tile_width: 32,
            tile_height: 32,
            hex: None,
        }
    }
}

impl GridConfig {
    /// Parse a config from JSON. The result is not validated.
    pub fn from_json_str(json: &str) -> Result<Self, RenderError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Derive the config for a renderer able to draw `layer`.
    ///
    /// Fails when the layer's orientation string is not a known topology.
    pub fn from_layer(layer: &dyn TileLayer, hex: Option<HexParams>) -> Result<Self, RenderError> {
        let orientation: Orientation = layer.orientation().parse()?;
        Ok(Self {
            orientation,
            cols: layer.cols(),
            rows: layer.rows(),
            tile_width: layer.tile_width(),
            tile_height: layer.tile_height(),
            hex: if orientation == Orientation::Hexagonal {
                hex
            } else {
                None
            },
        })
    }

    /// The shared grid metrics.
    pub fn dims(&self) -> GridDims {
        GridDims::new(self.cols, self.rows, self.tile_width, self.tile_height)
    }

    /// Check that the config describes a drawable grid.
    pub fn validate(&self) -> Result<(), RenderError> {
        let dims = self.dims();
        if dims.is_degenerate() {
            return Err(RenderError::InvalidDimensions {
                cols: self.cols,
                rows: self.rows,
                tile_width: self.tile_width,
                tile_height: self.tile_height,
            });
        }

        if self.orientation == Orientation::Hexagonal {
            let hex = self.hex.ok_or(RenderError::MissingHexParams)?;
            let extent = match hex.stagger_axis {
                StaggerAxis::X => self.tile_width,
                StaggerAxis::Y => self.tile_height,
            };
            if hex.side_length > extent {
                return Err(RenderError::InvalidHexSide {
                    side_length: hex.side_length,
                    extent,
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
