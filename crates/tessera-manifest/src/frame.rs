//! Frame manifests.
//!
//! A [`FrameManifest`] freezes the draw calls one layer produced for one
//! viewport, together with a BLAKE3 digest of those calls. Manifests are
//! plain JSON, so a known-good frame can be checked in as a fixture and later
//! frames compared against it with [`FrameManifest::first_divergence`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tessera_manifest::prelude::*;
//! use tessera_map::prelude::*;
//!
//! let ts = Arc::new(Tileset::new("t", 1, 32, 32));
//! let cell = TileCell::new(1, Arc::clone(&ts));
//! let mut recorder = DrawRecorder::new();
//! ts.draw_tile(&mut recorder, 0, 0, &cell);
//!
//! let viewport = ViewportRect::new(0.0, 0.0, 64.0, 64.0);
//! let manifest = FrameManifest::capture("ground", "orthogonal", viewport, &recorder).unwrap();
//! let json = manifest.to_json().unwrap();
//! let loaded = FrameManifest::from_json(&json).unwrap();
//! assert!(manifest.first_divergence(&loaded).is_none());
//! ```

use serde::{Deserialize, Serialize};
use tessera_map::geometry::ViewportRect;

use crate::recorder::{DrawCall, DrawRecorder};
use crate::ManifestError;

// ---------------------------------------------------------------------------
// FrameManifest
// ---------------------------------------------------------------------------

/// The draw calls of one layer for one viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameManifest {
    /// Name of the drawn layer.
    pub layer: String,
    /// Orientation string of the drawn layer.
    pub orientation: String,
    /// Viewport the layer was drawn for.
    pub viewport: ViewportRect,
    /// Draw calls in issue order.
    pub calls: Vec<DrawCall>,
    /// BLAKE3 hex digest of `calls`.
    pub hash: String,
}

impl FrameManifest {
    /// Snapshot the calls held by `recorder`.
    pub fn capture(
        layer: impl Into<String>,
        orientation: impl Into<String>,
        viewport: ViewportRect,
        recorder: &DrawRecorder,
    ) -> Result<Self, ManifestError> {
        let calls = recorder.calls().to_vec();
        let hash = hash_calls(&calls)?;
        let manifest = Self {
            layer: layer.into(),
            orientation: orientation.into(),
            viewport,
            calls,
            hash,
        };
        tracing::debug!(
            layer = %manifest.layer,
            calls = manifest.calls.len(),
            hash = %manifest.hash,
            "frame manifest captured"
        );
        Ok(manifest)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, ManifestError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a manifest and check that its stored hash matches its calls.
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_json::from_str(json)?;
        manifest.verify()?;
        Ok(manifest)
    }

    /// Recompute the digest and compare it with the stored one.
    pub fn verify(&self) -> Result<(), ManifestError> {
        let computed = hash_calls(&self.calls)?;
        if computed != self.hash {
            return Err(ManifestError::HashMismatch {
                stored: self.hash.clone(),
                computed,
            });
        }
        Ok(())
    }

    /// The first difference between `self` (expected) and `actual`.
    ///
    /// Calls are compared in order; if one list is a prefix of the other the
    /// length difference is reported. Equal calls under different stored
    /// hashes are a [`Hash`](FrameDivergence::Hash) divergence. A stored hash
    /// never hides a call difference.
    pub fn first_divergence(&self, actual: &FrameManifest) -> Option<FrameDivergence> {
        let mismatch = self
            .calls
            .iter()
            .zip(&actual.calls)
            .position(|(e, a)| e != a);
        if let Some(index) = mismatch {
            return Some(FrameDivergence::Call {
                index,
                expected: self.calls[index].clone(),
                actual: actual.calls[index].clone(),
            });
        }

        if self.calls.len() != actual.calls.len() {
            return Some(FrameDivergence::Length {
                expected: self.calls.len(),
                actual: actual.calls.len(),
            });
        }

        if self.hash == actual.hash {
            return None;
        }

        // Same calls under different stored hashes: one of them is stale.
        Some(FrameDivergence::Hash {
            expected: self.hash.clone(),
            actual: actual.hash.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// FrameDivergence
// ---------------------------------------------------------------------------

/// Where two frame manifests first disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FrameDivergence {
    /// The call at `index` differs.
    Call {
        index: usize,
        expected: DrawCall,
        actual: DrawCall,
    },
    /// One call list is a strict prefix of the other.
    Length { expected: usize, actual: usize },
    /// Calls are equal but the stored hashes are not.
    Hash { expected: String, actual: String },
}

// ---------------------------------------------------------------------------
// Hashing helpers
// ---------------------------------------------------------------------------

/// BLAKE3 hex digest of the JSON encoding of `calls`.
fn hash_calls(calls: &[DrawCall]) -> Result<String, ManifestError> {
    let bytes = serde_json::to_vec(calls)?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
