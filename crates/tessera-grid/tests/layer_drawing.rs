//! Visible-tile enumeration tests.
//!
//! Layers are filled with gids that encode the cell index
//! (`gid = 1 + x + y * cols`), drawn into a [`DrawRecorder`], and the recorded
//! calls decoded back into tile indices.

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;
use tessera_grid::prelude::*;
use tessera_manifest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A layer whose cells at `present` carry index-encoding gids.
fn encoded_layer(
    orientation: &str,
    dims: GridDims,
    present: impl IntoIterator<Item = (i32, i32)>,
) -> GridLayer {
    let ts = Arc::new(Tileset::new("t", 1, dims.tile_width, dims.tile_height));
    let mut layer = GridLayer::new(
        "layer",
        orientation,
        dims.cols,
        dims.rows,
        dims.tile_width,
        dims.tile_height,
        Arc::clone(&ts),
    );
    for (x, y) in present {
        let gid = 1 + x as u32 + y as u32 * dims.cols;
        layer
            .set_cell(x, y, Some(TileCell::new(gid, Arc::clone(&ts))))
            .unwrap();
    }
    layer
}

const NO_CELLS: [(i32, i32); 0] = [];

fn all_cells(dims: GridDims) -> Vec<(i32, i32)> {
    (0..dims.rows_i32())
        .flat_map(|y| (0..dims.cols_i32()).map(move |x| (x, y)))
        .collect()
}

fn decode(dims: GridDims, calls: &[DrawCall]) -> Vec<(i32, i32)> {
    calls
        .iter()
        .map(|c| {
            let i = c.gid - 1;
            ((i % dims.cols) as i32, (i / dims.cols) as i32)
        })
        .collect()
}

fn draw(renderer: &dyn GridRenderer, layer: &GridLayer, viewport: ViewportRect) -> DrawRecorder {
    let mut recorder = DrawRecorder::new();
    let drawn = renderer
        .draw_tile_layer(&mut recorder, layer, viewport)
        .unwrap();
    assert_eq!(drawn, recorder.len());
    recorder
}

fn assert_each_once(dims: GridDims, present: &[(i32, i32)], recorder: &DrawRecorder) {
    let visited = decode(dims, recorder.calls());
    let unique: HashSet<_> = visited.iter().copied().collect();
    assert_eq!(unique.len(), visited.len(), "a cell was drawn twice");
    assert_eq!(unique, present.iter().copied().collect::<HashSet<_>>());
}

/// The pixel rectangle from the origin to the far edge of every tile.
fn map_bounds(renderer: &dyn GridRenderer, dims: GridDims) -> ViewportRect {
    let (w, h) = all_cells(dims)
        .into_iter()
        .map(|(x, y)| renderer.tile_to_pixel(f64::from(x), f64::from(y)))
        .fold((0.0f64, 0.0f64), |(w, h), p| {
            (
                w.max(p.x + f64::from(dims.tile_width)),
                h.max(p.y + f64::from(dims.tile_height)),
            )
        });
    ViewportRect::new(0.0, 0.0, w, h)
}

const STAGGERS: [(StaggerAxis, StaggerIndex); 4] = [
    (StaggerAxis::X, StaggerIndex::Odd),
    (StaggerAxis::X, StaggerIndex::Even),
    (StaggerAxis::Y, StaggerIndex::Odd),
    (StaggerAxis::Y, StaggerIndex::Even),
];

fn hex_params(axis: StaggerAxis, index: StaggerIndex, side_length: u32) -> HexParams {
    HexParams {
        side_length,
        stagger_axis: axis,
        stagger_index: index,
    }
}

// ---------------------------------------------------------------------------
// Coverage
// ---------------------------------------------------------------------------

fn grid_dims(even: bool) -> impl Strategy<Value = GridDims> {
    let step = if even { 2 } else { 1 };
    (1u32..12, 1u32..12, 2u32..32, 2u32..32)
        .prop_map(move |(c, r, w, h)| GridDims::new(c, r, w * step, h * step))
}

fn presence(dims: GridDims) -> impl Strategy<Value = Vec<(i32, i32)>> {
    let cells = all_cells(dims);
    let n = cells.len();
    proptest::collection::vec(any::<bool>(), n).prop_map(move |mask| {
        cells
            .iter()
            .zip(mask)
            .filter_map(|(c, keep)| keep.then_some(*c))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn orthogonal_full_map_viewport_draws_each_present_cell_once(
        (dims, present) in grid_dims(false).prop_flat_map(|d| (Just(d), presence(d)))
    ) {
        let r = OrthogonalRenderer::new(dims.cols, dims.rows, dims.tile_width, dims.tile_height);
        let layer = encoded_layer("orthogonal", dims, present.iter().copied());
        let viewport = ViewportRect::new(
            0.0,
            0.0,
            f64::from(dims.cols * dims.tile_width),
            f64::from(dims.rows * dims.tile_height),
        );
        assert_each_once(dims, &present, &draw(&r, &layer, viewport));
    }

    #[test]
    fn isometric_full_map_viewport_draws_each_present_cell_once(
        (dims, present) in grid_dims(true).prop_flat_map(|d| (Just(d), presence(d)))
    ) {
        let r = IsometricRenderer::new(dims.cols, dims.rows, dims.tile_width, dims.tile_height);
        let layer = encoded_layer("isometric", dims, present.iter().copied());
        let span = f64::from(dims.cols + dims.rows);
        let viewport = ViewportRect::new(
            0.0,
            0.0,
            span * f64::from(dims.tile_width) / 2.0,
            span * f64::from(dims.tile_height) / 2.0,
        );
        assert_each_once(dims, &present, &draw(&r, &layer, viewport));
    }

    #[test]
    fn hexagonal_full_map_viewport_draws_each_present_cell_once(
        (dims, present) in grid_dims(false).prop_flat_map(|d| (Just(d), presence(d))),
        flat_top in any::<bool>(),
        odd in any::<bool>(),
        side_frac in 0.0f64..1.0,
    ) {
        let axis = if flat_top { StaggerAxis::X } else { StaggerAxis::Y };
        let index = if odd { StaggerIndex::Odd } else { StaggerIndex::Even };
        let extent = if flat_top { dims.tile_width } else { dims.tile_height };
        // Sides shorter than the tile extent; see the rectangular-tile tests
        // below for the full-extent case.
        let side = (side_frac * f64::from(extent)).floor() as u32;
        let r = HexagonalRenderer::new(
            dims.cols,
            dims.rows,
            dims.tile_width,
            dims.tile_height,
            hex_params(axis, index, side),
        );
        let layer = encoded_layer("hexagonal", dims, present.iter().copied());
        assert_each_once(dims, &present, &draw(&r, &layer, map_bounds(&r, dims)));
    }

    #[test]
    fn arbitrary_viewports_never_draw_a_cell_twice(
        dims in grid_dims(true),
        x in -400.0f64..400.0,
        y in -400.0f64..400.0,
        w in 0.0f64..300.0,
        h in 0.0f64..300.0,
    ) {
        let renderers: [Box<dyn GridRenderer>; 3] = [
            Box::new(OrthogonalRenderer::new(dims.cols, dims.rows, dims.tile_width, dims.tile_height)),
            Box::new(IsometricRenderer::new(dims.cols, dims.rows, dims.tile_width, dims.tile_height)),
            Box::new(HexagonalRenderer::new(
                dims.cols,
                dims.rows,
                dims.tile_width,
                dims.tile_height,
                hex_params(StaggerAxis::Y, StaggerIndex::Odd, dims.tile_height / 2),
            )),
        ];
        for r in &renderers {
            let layer = encoded_layer(r.orientation().as_str(), dims, all_cells(dims));
            let rec = draw(r.as_ref(), &layer, ViewportRect::new(x, y, w, h));
            let visited = decode(dims, rec.calls());
            let unique: HashSet<_> = visited.iter().collect();
            prop_assert_eq!(unique.len(), visited.len());
            prop_assert!(visited.iter().all(|&(cx, cy)| dims.contains(cx, cy)));
        }
    }
}

#[test]
fn rectangular_hex_tiles_are_covered_at_moderate_aspect() {
    for (tw, th) in [(32, 32), (32, 16), (16, 32)] {
        let dims = GridDims::new(5, 4, tw, th);
        for (axis, index) in STAGGERS {
            let side = if axis == StaggerAxis::X { tw } else { th };
            let r = HexagonalRenderer::new(5, 4, tw, th, hex_params(axis, index, side));
            let cells = all_cells(dims);
            let layer = encoded_layer("hexagonal", dims, cells.iter().copied());
            assert_each_once(dims, &cells, &draw(&r, &layer, map_bounds(&r, dims)));
        }
    }
}

#[test]
fn tall_rectangular_odd_flat_top_tiles_skip_the_first_column() {
    // With the side as long as the tile is wide, the origin classifies into
    // column 1, so the scan starts past column 0.
    let dims = GridDims::new(3, 3, 4, 12);
    let r = HexagonalRenderer::new(3, 3, 4, 12, hex_params(StaggerAxis::X, StaggerIndex::Odd, 4));
    assert_eq!(r.pixel_to_tile(0.0, 0.0), GridPoint::new(1.0, -1.0));

    let layer = encoded_layer("hexagonal", dims, all_cells(dims));
    let viewport = map_bounds(&r, dims);
    assert_eq!(viewport, ViewportRect::new(0.0, 0.0, 12.0, 42.0));

    let visited: HashSet<_> = decode(dims, draw(&r, &layer, viewport).calls()).into_iter().collect();
    let expected: HashSet<_> = all_cells(dims).into_iter().filter(|&(x, _)| x > 0).collect();
    assert_eq!(visited, expected);
}

// ---------------------------------------------------------------------------
// Edge margin
// ---------------------------------------------------------------------------

#[test]
fn zero_size_viewport_on_an_orthogonal_tile_corner_draws_that_tile() {
    let dims = GridDims::new(6, 5, 32, 24);
    let r = OrthogonalRenderer::new(6, 5, 32, 24);
    for (x, y) in all_cells(dims) {
        let layer = encoded_layer("orthogonal", dims, [(x, y)]);
        let p = r.tile_to_pixel(f64::from(x), f64::from(y));
        let rec = draw(&r, &layer, ViewportRect::new(p.x, p.y, 0.0, 0.0));
        assert_eq!(decode(dims, rec.calls()), vec![(x, y)]);
    }
}

#[test]
fn zero_size_viewport_on_an_isometric_tile_vertex_draws_that_tile() {
    let dims = GridDims::new(5, 7, 64, 32);
    let r = IsometricRenderer::new(5, 7, 64, 32);
    for (x, y) in all_cells(dims) {
        let layer = encoded_layer("isometric", dims, [(x, y)]);
        let p = r.tile_to_pixel(f64::from(x), f64::from(y));
        let rec = draw(&r, &layer, ViewportRect::new(p.x, p.y, 0.0, 0.0));
        assert_eq!(decode(dims, rec.calls()), vec![(x, y)]);
    }
}

#[test]
fn zero_size_viewport_at_a_regular_hex_center_draws_that_tile() {
    let dims = GridDims::new(6, 5, 32, 32);
    for (axis, index) in STAGGERS {
        let r = HexagonalRenderer::new(6, 5, 32, 32, hex_params(axis, index, 16));
        for (x, y) in all_cells(dims) {
            let layer = encoded_layer("hexagonal", dims, [(x, y)]);
            let p = r.tile_to_pixel(f64::from(x), f64::from(y));
            let rec = draw(&r, &layer, ViewportRect::new(p.x + 16.0, p.y + 16.0, 0.0, 0.0));
            assert_eq!(decode(dims, rec.calls()), vec![(x, y)], "{axis:?}/{index:?}");
        }
    }
}

#[test]
fn zero_size_viewport_at_a_wide_flat_top_center_can_miss_the_tile() {
    // The end corner, pushed out by one tile, still classifies into row 0,
    // so the row range is empty for the unshifted columns.
    let dims = GridDims::new(3, 3, 47, 32);
    let r = HexagonalRenderer::new(3, 3, 47, 32, hex_params(StaggerAxis::X, StaggerIndex::Odd, 34));
    let center = |x: i32, y: i32| {
        let p = r.tile_to_pixel(f64::from(x), f64::from(y));
        ViewportRect::new(p.x + 23.5, p.y + 16.0, 0.0, 0.0)
    };

    let layer = encoded_layer("hexagonal", dims, [(0, 0)]);
    assert!(draw(&r, &layer, center(0, 0)).is_empty());

    let layer = encoded_layer("hexagonal", dims, [(1, 0)]);
    assert_eq!(decode(dims, draw(&r, &layer, center(1, 0)).calls()), vec![(1, 0)]);
}

// ---------------------------------------------------------------------------
// Concrete layouts
// ---------------------------------------------------------------------------

#[test]
fn orthogonal_draws_row_major_at_cell_corners() {
    let dims = GridDims::new(3, 2, 32, 32);
    let r = OrthogonalRenderer::new(3, 2, 32, 32);
    let layer = encoded_layer("orthogonal", dims, all_cells(dims));
    let rec = draw(&r, &layer, ViewportRect::new(0.0, 0.0, 96.0, 64.0));

    let placed: Vec<_> = rec.calls().iter().map(|c| (c.gid, c.x, c.y)).collect();
    assert_eq!(
        placed,
        vec![
            (1, 0, 0),
            (2, 32, 0),
            (3, 64, 0),
            (4, 0, 32),
            (5, 32, 32),
            (6, 64, 32),
        ]
    );
}

#[test]
fn isometric_four_by_four_places_corner_tiles() {
    let dims = GridDims::new(4, 4, 64, 32);
    let r = IsometricRenderer::new(4, 4, 64, 32);
    let layer = encoded_layer("isometric", dims, all_cells(dims));
    let rec = draw(&r, &layer, ViewportRect::new(0.0, 0.0, 256.0, 128.0));

    assert_eq!(rec.len(), 16);
    let at = |gid: u32| {
        let c = rec.calls_for_gid(gid).next().unwrap();
        (c.x, c.y)
    };
    assert_eq!(at(1), (96, 0));
    assert_eq!(at(16), (96, 96));
    // Tiles are issued back to front: (0, 0) first, (3, 3) last.
    assert_eq!(rec.calls().first().map(|c| c.gid), Some(1));
    assert_eq!(rec.calls().last().map(|c| c.gid), Some(16));
}

#[test]
fn viewport_outside_the_map_draws_nothing() {
    let dims = GridDims::new(4, 4, 32, 32);
    let r = OrthogonalRenderer::new(4, 4, 32, 32);
    let layer = encoded_layer("orthogonal", dims, all_cells(dims));
    let rec = draw(&r, &layer, ViewportRect::new(1000.0, 1000.0, 64.0, 64.0));
    assert!(rec.is_empty());
}

// ---------------------------------------------------------------------------
// Compatibility
// ---------------------------------------------------------------------------

#[test]
fn can_render_requires_every_field_to_match() {
    let dims = GridDims::new(10, 8, 32, 16);
    let renderers: [Box<dyn GridRenderer>; 3] = [
        Box::new(OrthogonalRenderer::new(10, 8, 32, 16)),
        Box::new(IsometricRenderer::new(10, 8, 32, 16)),
        Box::new(HexagonalRenderer::new(
            10,
            8,
            32,
            16,
            hex_params(StaggerAxis::X, StaggerIndex::Even, 8),
        )),
    ];

    let variants = [
        GridDims::new(11, 8, 32, 16),
        GridDims::new(10, 9, 32, 16),
        GridDims::new(10, 8, 33, 16),
        GridDims::new(10, 8, 32, 17),
    ];

    for r in &renderers {
        let name = r.orientation().as_str();
        assert!(r.can_render(&encoded_layer(name, dims, NO_CELLS)), "{name}");

        for other in variants {
            assert!(!r.can_render(&encoded_layer(name, other, NO_CELLS)), "{name} vs {other}");
        }

        for other in ["orthogonal", "isometric", "hexagonal", "staggered", "Orthogonal", ""] {
            if other != name {
                assert!(!r.can_render(&encoded_layer(other, dims, NO_CELLS)), "{name} vs {other}");
            }
        }
    }
}

#[test]
fn mismatched_layer_is_rejected_without_drawing() {
    let dims = GridDims::new(4, 4, 32, 32);
    let r = IsometricRenderer::new(4, 4, 32, 32);
    let layer = encoded_layer("orthogonal", dims, all_cells(dims));
    let mut rec = DrawRecorder::new();
    let err = r
        .draw_tile_layer(&mut rec, &layer, ViewportRect::new(0.0, 0.0, 128.0, 128.0))
        .unwrap_err();
    assert!(matches!(err, RenderError::LayerMismatch { .. }));
    assert!(rec.is_empty());
}

// ---------------------------------------------------------------------------
// Frame manifests
// ---------------------------------------------------------------------------

#[test]
fn redrawing_the_same_frame_reproduces_its_manifest() {
    let dims = GridDims::new(6, 6, 64, 32);
    let r = IsometricRenderer::new(6, 6, 64, 32);
    let layer = encoded_layer("isometric", dims, all_cells(dims));
    let viewport = ViewportRect::new(40.0, 10.0, 200.0, 120.0);

    let first = FrameManifest::capture("layer", "isometric", viewport, &draw(&r, &layer, viewport)).unwrap();
    let json = first.to_json().unwrap();

    let second = FrameManifest::capture("layer", "isometric", viewport, &draw(&r, &layer, viewport)).unwrap();
    let stored = FrameManifest::from_json(&json).unwrap();
    assert!(stored.first_divergence(&second).is_none());
}

#[test]
fn changing_one_cell_is_reported_at_its_draw_call() {
    let dims = GridDims::new(5, 5, 32, 32);
    let r = OrthogonalRenderer::new(5, 5, 32, 32);
    let viewport = ViewportRect::new(0.0, 0.0, 160.0, 160.0);
    let mut layer = encoded_layer("orthogonal", dims, all_cells(dims));
    let expected = FrameManifest::capture("layer", "orthogonal", viewport, &draw(&r, &layer, viewport)).unwrap();

    let ts = Arc::new(Tileset::new("t", 1, 32, 32));
    layer.set_cell(2, 1, Some(TileCell::new(99, ts))).unwrap();
    let actual = FrameManifest::capture("layer", "orthogonal", viewport, &draw(&r, &layer, viewport)).unwrap();

    match expected.first_divergence(&actual) {
        Some(FrameDivergence::Call { index, expected, actual }) => {
            // Row-major: row 1 starts at call 5.
            assert_eq!(index, 7);
            assert_eq!((expected.gid, actual.gid), (8, 99));
            assert_eq!((actual.x, actual.y), (64, 32));
        }
        other => panic!("expected call divergence, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Pool
// ---------------------------------------------------------------------------

#[test]
fn pool_draws_a_mixed_map() {
    let ortho_dims = GridDims::new(4, 4, 32, 32);
    let iso_dims = GridDims::new(4, 4, 64, 32);
    let ground = encoded_layer("orthogonal", ortho_dims, all_cells(ortho_dims));
    let decor = encoded_layer("orthogonal", ortho_dims, [(0, 0), (3, 3)]);
    let overlay = encoded_layer("isometric", iso_dims, all_cells(iso_dims));

    let mut pool = RendererPool::new();
    let mut rec = DrawRecorder::new();
    let viewport = ViewportRect::new(0.0, 0.0, 256.0, 128.0);
    let mut total = 0;
    for layer in [&ground, &decor, &overlay] {
        total += pool.draw_layer(&mut rec, layer, None, viewport).unwrap();
    }

    assert_eq!(pool.len(), 2);
    assert_eq!(total, 16 + 2 + 16);
    assert_eq!(rec.len(), total);
}
