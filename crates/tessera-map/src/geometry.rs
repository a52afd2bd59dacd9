//! Value types shared by every grid topology.
//!
//! [`GridPoint`] doubles as a pixel-space point and a tile-index pair; callers
//! tell the two apart by context and turn fractional tile coordinates into
//! indices with [`GridPoint::floor`] or [`GridPoint::ceil`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::MapError;

// ---------------------------------------------------------------------------
// GridPoint
// ---------------------------------------------------------------------------

/// A 2D coordinate pair in pixel space or tile space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GridPoint {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl GridPoint {
    /// Construct a point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Round both coordinates toward negative infinity.
    #[inline]
    pub fn floor(self) -> Self {
        Self::new(self.x.floor(), self.y.floor())
    }

    /// Round both coordinates toward positive infinity.
    #[inline]
    pub fn ceil(self) -> Self {
        Self::new(self.x.ceil(), self.y.ceil())
    }

    /// Translate by `(dx, dy)`.
    #[inline]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// The point as integer tile indices.
    ///
    /// Values are truncated; call [`floor`](Self::floor) or
    /// [`ceil`](Self::ceil) first to pick the rounding direction.
    #[inline]
    pub fn to_index(self) -> (i32, i32) {
        (self.x as i32, self.y as i32)
    }
}

// ---------------------------------------------------------------------------
// ViewportRect
// ---------------------------------------------------------------------------

/// The camera-visible pixel rectangle for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportRect {
    /// Left edge in pixels.
    pub x: f64,
    /// Top edge in pixels.
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl ViewportRect {
    /// Construct a viewport from its top-left corner and size.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (`x + width`).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

// ---------------------------------------------------------------------------
// Orientation
// ---------------------------------------------------------------------------

/// Grid topology declared by a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Square cells on a rectangular grid.
    Orthogonal,
    /// Diamond cells; tile (0, 0) sits at the top center of the map.
    Isometric,
    /// Flat-top or pointy-top hexagons in doubled-offset layout.
    Hexagonal,
}

impl Orientation {
    /// The exact string a layer declares for this orientation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Orientation::Orthogonal => "orthogonal",
            Orientation::Isometric => "isometric",
            Orientation::Hexagonal => "hexagonal",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "orthogonal" => Ok(Orientation::Orthogonal),
            "isometric" => Ok(Orientation::Isometric),
            "hexagonal" => Ok(Orientation::Hexagonal),
            other => Err(MapError::UnknownOrientation(other.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Stagger parameters
// ---------------------------------------------------------------------------

/// Which axis of a hexagonal grid is staggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaggerAxis {
    /// Columns are staggered (flat-top hexagons).
    X,
    /// Rows are staggered (pointy-top hexagons).
    Y,
}

impl FromStr for StaggerAxis {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" => Ok(StaggerAxis::X),
            "y" => Ok(StaggerAxis::Y),
            other => Err(MapError::UnknownStaggerAxis(other.to_owned())),
        }
    }
}

/// Whether odd or even rows/columns are the shifted ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaggerIndex {
    /// Odd-indexed rows/columns are shifted.
    Odd,
    /// Even-indexed rows/columns are shifted.
    Even,
}

impl FromStr for StaggerIndex {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "odd" => Ok(StaggerIndex::Odd),
            "even" => Ok(StaggerIndex::Even),
            other => Err(MapError::UnknownStaggerIndex(other.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
