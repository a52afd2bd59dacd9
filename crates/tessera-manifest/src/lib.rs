//! Tessera Manifest -- recorded draw output for visual-parity checks.
//!
//! Renderers only decide which tile goes where; this crate captures those
//! decisions so they can be compared across versions without a GPU.
//!
//! # Modules
//!
//! - [`recorder`]: [`DrawRecorder`](recorder::DrawRecorder), a
//!   [`TileSurface`](tessera_map::tileset::TileSurface) that records every
//!   draw request in issue order, with simple query helpers.
//! - [`frame`]: [`FrameManifest`](frame::FrameManifest), a serializable,
//!   BLAKE3-hashed record of one layer's draw calls for one viewport, and
//!   [`FrameDivergence`](frame::FrameDivergence) for reporting the first
//!   difference between two manifests.

#![deny(unsafe_code)]

pub mod frame;
pub mod recorder;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced while building or loading manifests.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// JSON serialization or deserialization failed.
    #[error("manifest serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A loaded manifest whose stored hash does not match its draw calls.
    #[error("manifest hash mismatch: stored {stored}, computed {computed}")]
    HashMismatch { stored: String, computed: String },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::frame::{FrameDivergence, FrameManifest};
    pub use crate::recorder::{DrawCall, DrawRecorder};
    pub use crate::ManifestError;
}
