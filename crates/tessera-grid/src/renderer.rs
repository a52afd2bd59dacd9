//! The shared renderer interface and the orientation-keyed factory.
//!
//! # Contract
//!
//! Every renderer exposes the same operations:
//!
//! | Operation | Meaning |
//! |-----------|---------|
//! | [`can_render`](GridRenderer::can_render) | Layer orientation string and grid metrics match this renderer |
//! | [`pixel_to_tile`](GridRenderer::pixel_to_tile) | Pixel point to fractional (or, for hexagons, exact) tile coordinates |
//! | [`tile_to_pixel`](GridRenderer::tile_to_pixel) | Tile coordinates to the pixel anchor of that tile |
//! | [`adjust_position`](GridRenderer::adjust_position) | Rewrite an object's editor position into engine coordinates |
//! | [`draw_tile`](GridRenderer::draw_tile) | Issue one draw request for a tile index |
//! | [`draw_tile_layer`](GridRenderer::draw_tile_layer) | Draw every tile of a layer that intersects a viewport |
//!
//! Pixel-to-tile results are not rounded; callers pick `floor` or `ceil`.
//! Cell lookups during enumeration never leave `[0, cols) x [0, rows)`.

use std::fmt;

use tessera_map::geometry::{GridPoint, Orientation, ViewportRect};
use tessera_map::layer::TileLayer;
use tessera_map::object::MapObject;
use tessera_map::tileset::{TileCell, TileSurface, Tileset};

use crate::config::GridConfig;
use crate::hexagonal::HexagonalRenderer;
use crate::isometric::IsometricRenderer;
use crate::orthogonal::OrthogonalRenderer;
use crate::RenderError;

// ---------------------------------------------------------------------------
// GridDims
// ---------------------------------------------------------------------------

/// Grid metrics shared by every topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridDims {
    /// Number of tile columns.
    pub cols: u32,
    /// Number of tile rows.
    pub rows: u32,
    /// Grid cell width in pixels.
    pub tile_width: u32,
    /// Grid cell height in pixels.
    pub tile_height: u32,
}

impl GridDims {
    pub const fn new(cols: u32, rows: u32, tile_width: u32, tile_height: u32) -> Self {
        Self {
            cols,
            rows,
            tile_width,
            tile_height,
        }
    }

    /// Metrics declared by `layer`.
    pub fn of_layer(layer: &dyn TileLayer) -> Self {
        Self::new(
            layer.cols(),
            layer.rows(),
            layer.tile_width(),
            layer.tile_height(),
        )
    }

    /// Whether `layer` declares exactly these metrics.
    pub fn matches(&self, layer: &dyn TileLayer) -> bool {
        *self == Self::of_layer(layer)
    }

    /// Whether any extent is zero.
    pub fn is_degenerate(&self) -> bool {
        self.cols == 0 || self.rows == 0 || self.tile_width == 0 || self.tile_height == 0
    }

    /// Whether `(x, y)` is a valid tile index.
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.cols && (y as u32) < self.rows
    }

    /// Column count as a signed tile index bound.
    #[inline]
    pub fn cols_i32(&self) -> i32 {
        i32::try_from(self.cols).unwrap_or(i32::MAX)
    }

    /// Row count as a signed tile index bound.
    #[inline]
    pub fn rows_i32(&self) -> i32 {
        i32::try_from(self.rows).unwrap_or(i32::MAX)
    }

    #[inline]
    pub(crate) fn tile_width_f64(&self) -> f64 {
        f64::from(self.tile_width)
    }

    #[inline]
    pub(crate) fn tile_height_f64(&self) -> f64 {
        f64::from(self.tile_height)
    }
}

impl fmt::Display for GridDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} tiles of {}x{}px",
            self.cols, self.rows, self.tile_width, self.tile_height
        )
    }
}

// ---------------------------------------------------------------------------
// GridRenderer
// ---------------------------------------------------------------------------

/// A tile-grid renderer for one topology.
pub trait GridRenderer: Send + Sync + fmt::Debug {
    /// The topology this renderer handles.
    fn orientation(&self) -> Orientation;

    /// The grid metrics this renderer was built for.
    fn dims(&self) -> GridDims;

    /// Whether this renderer can draw `layer`.
    ///
    /// True iff the layer's orientation string is exactly this renderer's
    /// orientation name and its four grid metrics match. Topology-specific
    /// parameters (hex side length, stagger) are not compared.
    fn can_render(&self, layer: &dyn TileLayer) -> bool {
        layer.orientation() == self.orientation().as_str() && self.dims().matches(layer)
    }

    /// Convert a pixel point to tile coordinates.
    fn pixel_to_tile(&self, x: f64, y: f64) -> GridPoint;

    /// Horizontal tile coordinate of a pixel point.
    ///
    /// Takes both pixel coordinates because the isometric and hexagonal
    /// conversions depend on both.
    fn pixel_to_tile_x(&self, x: f64, y: f64) -> f64 {
        self.pixel_to_tile(x, y).x
    }

    /// Vertical tile coordinate of a pixel point.
    fn pixel_to_tile_y(&self, x: f64, y: f64) -> f64 {
        self.pixel_to_tile(x, y).y
    }

    /// Convert tile coordinates to the tile's pixel anchor.
    fn tile_to_pixel(&self, tile_x: f64, tile_y: f64) -> GridPoint;

    /// Rewrite `object`'s editor position into engine coordinates, in place.
    fn adjust_position(&self, object: &mut MapObject);

    /// Request one tile draw for tile index `(x, y)`.
    fn draw_tile(
        &self,
        surface: &mut dyn TileSurface,
        x: i32,
        y: i32,
        cell: &TileCell,
        tileset: &Tileset,
    );

    /// Draw every present cell of `layer` that intersects `viewport`.
    ///
    /// Returns the number of draw requests issued. Fails with
    /// [`RenderError::LayerMismatch`] when [`can_render`](Self::can_render)
    /// rejects the layer.
    fn draw_tile_layer(
        &self,
        surface: &mut dyn TileSurface,
        layer: &dyn TileLayer,
        viewport: ViewportRect,
    ) -> Result<usize, RenderError>;
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Build the renderer matching `config.orientation`.
///
/// The config is validated first; a hexagonal config must carry
/// [`HexParams`](crate::config::HexParams).
pub fn build_renderer(config: &GridConfig) -> Result<Box<dyn GridRenderer>, RenderError> {
    config.validate()?;
    let GridDims {
        cols,
        rows,
        tile_width,
        tile_height,
    } = config.dims();

    let renderer: Box<dyn GridRenderer> = match config.orientation {
        Orientation::Orthogonal => Box::new(OrthogonalRenderer::new(
            cols,
            rows,
            tile_width,
            tile_height,
        )),
        Orientation::Isometric => Box::new(IsometricRenderer::new(
            cols,
            rows,
            tile_width,
            tile_height,
        )),
        Orientation::Hexagonal => {
            let hex = config.hex.ok_or(RenderError::MissingHexParams)?;
            Box::new(HexagonalRenderer::new(
                cols,
                rows,
                tile_width,
                tile_height,
                hex,
            ))
        }
    };
    Ok(renderer)
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Reject layers and viewports a renderer must not enumerate.
pub(crate) fn ensure_drawable(
    renderer: &dyn GridRenderer,
    layer: &dyn TileLayer,
    viewport: &ViewportRect,
) -> Result<(), RenderError> {
    if !renderer.can_render(layer) {
        let found = format!("{} {}", layer.orientation(), GridDims::of_layer(layer));
        tracing::warn!(
            renderer = %renderer.orientation(),
            layer = layer.name(),
            found = %found,
            "draw_tile_layer: layer geometry does not match renderer"
        );
        return Err(RenderError::LayerMismatch {
            renderer: renderer.orientation(),
            layer: layer.name().to_owned(),
            expected: renderer.dims().to_string(),
            found,
        });
    }

    let dims = renderer.dims();
    if dims.is_degenerate() {
        return Err(RenderError::InvalidDimensions {
            cols: dims.cols,
            rows: dims.rows,
            tile_width: dims.tile_width,
            tile_height: dims.tile_height,
        });
    }

    let finite = [viewport.x, viewport.y, viewport.width, viewport.height]
        .iter()
        .all(|v| v.is_finite());
    if !finite {
        return Err(RenderError::InvalidViewport(*viewport));
    }
    Ok(())
}

/// The cell at `(x, y)`, consulting the layer only for in-grid indices.
#[inline]
pub(crate) fn lookup<'a>(
    layer: &'a dyn TileLayer,
    dims: &GridDims,
    x: i32,
    y: i32,
) -> Option<&'a TileCell> {
    if dims.contains(x, y) {
        layer.cell(x, y)
    } else {
        None
    }
}

/// Snap a fractional pixel coordinate to the pixel grid.
#[inline]
pub(crate) fn floor_px(v: f64) -> i32 {
    v.floor() as i32
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tessera_map::geometry::{StaggerAxis, StaggerIndex};
    use tessera_map::layer::GridLayer;

    use super::*;
    use crate::config::HexParams;

    fn layer(orientation: &str, dims: GridDims) -> GridLayer {
        let ts = Arc::new(Tileset::new("t", 1, dims.tile_width, dims.tile_height));
        GridLayer::new(
            "layer",
            orientation,
            dims.cols,
            dims.rows,
            dims.tile_width,
            dims.tile_height,
            ts,
        )
    }

    #[test]
    fn dims_contains_is_half_open() {
        let d = GridDims::new(3, 2, 16, 16);
        assert!(d.contains(0, 0));
        assert!(d.contains(2, 1));
        assert!(!d.contains(3, 1));
        assert!(!d.contains(2, 2));
        assert!(!d.contains(-1, 0));
    }

    #[test]
    fn factory_dispatches_on_orientation() {
        for orientation in [Orientation::Orthogonal, Orientation::Isometric] {
            let config = GridConfig {
                orientation,
                ..GridConfig::default()
            };
            assert_eq!(build_renderer(&config).unwrap().orientation(), orientation);
        }

        let config = GridConfig {
            orientation: Orientation::Hexagonal,
            hex: Some(HexParams {
                side_length: 16,
                stagger_axis: StaggerAxis::Y,
                stagger_index: StaggerIndex::Odd,
            }),
            ..GridConfig::default()
        };
        let hex = build_renderer(&config).unwrap();
        assert_eq!(hex.orientation(), Orientation::Hexagonal);
        assert_eq!(hex.dims(), config.dims());
    }

    #[test]
    fn factory_rejects_hexagonal_without_params() {
        let config = GridConfig {
            orientation: Orientation::Hexagonal,
            ..GridConfig::default()
        };
        assert!(matches!(
            build_renderer(&config),
            Err(RenderError::MissingHexParams)
        ));
    }

    #[test]
    fn draw_tile_layer_fails_fast_on_mismatched_layer() {
        #[derive(Default)]
        struct Count(usize);
        impl TileSurface for Count {
            fn blit(&mut self, _: &Tileset, _: &TileCell, _: i32, _: i32) {
                self.0 += 1;
            }
        }

        let renderer = build_renderer(&GridConfig::default()).unwrap();
        let wrong = layer("orthogonal", GridDims::new(11, 10, 32, 32));
        let mut surface = Count::default();
        let err = renderer
            .draw_tile_layer(&mut surface, &wrong, ViewportRect::new(0.0, 0.0, 100.0, 100.0))
            .unwrap_err();

        assert!(matches!(err, RenderError::LayerMismatch { .. }));
        assert!(err.to_string().contains("11x10"));
        assert_eq!(surface.0, 0);
    }

    #[test]
    fn draw_tile_layer_rejects_non_finite_viewport() {
        let renderer = build_renderer(&GridConfig::default()).unwrap();
        let ok = layer("orthogonal", renderer.dims());
        let mut surface = NoopSurface;
        let err = renderer
            .draw_tile_layer(&mut surface, &ok, ViewportRect::new(0.0, 0.0, f64::INFINITY, 1.0))
            .unwrap_err();
        assert!(matches!(err, RenderError::InvalidViewport(_)));
    }

    struct NoopSurface;

    impl TileSurface for NoopSurface {
        fn blit(&mut self, _: &Tileset, _: &TileCell, _: i32, _: i32) {}
    }

    #[test]
    fn floor_px_rounds_toward_negative_infinity() {
        assert_eq!(floor_px(1.5), 1);
        assert_eq!(floor_px(-0.5), -1);
        assert_eq!(floor_px(-2.0), -2);
    }
}
