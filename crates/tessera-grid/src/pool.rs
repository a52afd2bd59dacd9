//! Renderer reuse across layers.
//!
//! Renderers carry no per-layer state, so a map with many layers of the same
//! geometry needs only one renderer per distinct geometry. [`RendererPool`]
//! hands out an existing renderer whenever one accepts the layer and builds a
//! new one otherwise.

use tessera_map::geometry::{Orientation, ViewportRect};
use tessera_map::layer::TileLayer;
use tessera_map::tileset::TileSurface;

use crate::config::{GridConfig, HexParams};
use crate::renderer::{build_renderer, GridRenderer};
use crate::RenderError;

/// A growing set of renderers, one per distinct layer geometry.
#[derive(Debug, Default)]
pub struct RendererPool {
    entries: Vec<PoolEntry>,
}

#[derive(Debug)]
struct PoolEntry {
    hex: Option<HexParams>,
    renderer: Box<dyn GridRenderer>,
}

impl PoolEntry {
    /// `can_render` ignores hex parameters, so the pool compares them itself
    /// to keep differently staggered hexagonal layers apart.
    fn accepts(&self, layer: &dyn TileLayer, hex: Option<HexParams>) -> bool {
        self.renderer.can_render(layer)
            && (self.renderer.orientation() != Orientation::Hexagonal || self.hex == hex)
    }
}

impl RendererPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct renderers built so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A renderer able to draw `layer`, built on first use.
    ///
    /// `hex` is only consulted for hexagonal layers.
    pub fn renderer_for(
        &mut self,
        layer: &dyn TileLayer,
        hex: Option<HexParams>,
    ) -> Result<&dyn GridRenderer, RenderError> {
        let index = match self.entries.iter().position(|e| e.accepts(layer, hex)) {
            Some(index) => index,
            None => {
                let config = GridConfig::from_layer(layer, hex)?;
                let renderer = build_renderer(&config)?;
                tracing::debug!(
                    layer = layer.name(),
                    orientation = %config.orientation,
                    dims = %config.dims(),
                    pool_size = self.entries.len() + 1,
                    "renderer pool: built new renderer"
                );
                self.entries.push(PoolEntry {
                    hex: config.hex,
                    renderer,
                });
                self.entries.len() - 1
            }
        };
        Ok(self.entries[index].renderer.as_ref())
    }

    /// Draw `layer` with the pooled renderer for its geometry.
    pub fn draw_layer(
        &mut self,
        surface: &mut dyn TileSurface,
        layer: &dyn TileLayer,
        hex: Option<HexParams>,
        viewport: ViewportRect,
    ) -> Result<usize, RenderError> {
        self.renderer_for(layer, hex)?
            .draw_tile_layer(surface, layer, viewport)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
