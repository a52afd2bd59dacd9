//! Placed map objects.

use serde::{Deserialize, Serialize};

/// An object placed on an object layer.
///
/// Positions are in pixels as stored by the map editor; renderers rewrite
/// them into the engine's top-left convention via `adjust_position`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MapObject {
    /// Object name, for diagnostics.
    #[serde(default)]
    pub name: String,
    /// Horizontal position in pixels.
    pub x: f64,
    /// Vertical position in pixels.
    pub y: f64,
    /// Width in pixels.
    #[serde(default)]
    pub width: f64,
    /// Height in pixels.
    #[serde(default)]
    pub height: f64,
    /// Global id of the tile graphic, for tile objects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gid: Option<u32>,
}

impl MapObject {
    /// A shape object (no tile graphic).
    pub fn new(name: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            width,
            height,
            gid: None,
        }
    }

    /// Builder-style setter turning this into a tile object.
    pub fn with_gid(mut self, gid: u32) -> Self {
        self.gid = Some(gid);
        self
    }

    /// Whether the object draws a tile graphic.
    pub fn is_tile_object(&self) -> bool {
        self.gid.is_some()
    }
}
