//! Detection API response schema.
//!
//! The backend is treated as an opaque collaborator: we take the handful of
//! fields this tool renders and ignore everything else it may attach
//! (coordinates, class labels, confidences). Parsing is deliberately lenient:
//! a missing field never fails the flow, it defaults.

use serde::{Deserialize, Serialize};

use crate::error::PlastiscanError;

/// One detected particle's bounding box, in pixels.
///
/// Only the dimensions matter for size analysis; a box with a missing
/// `width` or `height` defaults that dimension to `0` rather than failing.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
pub struct DetectionBox {
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

/// A parsed detection response.
///
/// Field defaults mirror what the service omits on sparse results:
/// `total_count → 0`, `boxes → []`, `status → "UNKNOWN"`, `risk_score → 0`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DetectionResult {
    /// Total particles the detector counted (its own tally, which may differ
    /// from `boxes.len()`).
    #[serde(default)]
    pub total_count: u64,

    /// Bounding boxes in detector order.
    #[serde(default)]
    pub boxes: Vec<DetectionBox>,

    /// Status label assigned by the service.
    #[serde(default = "default_status")]
    pub status: String,

    /// Risk score assigned by the service.
    #[serde(default)]
    pub risk_score: f64,
}

fn default_status() -> String {
    "UNKNOWN".to_string()
}

impl Default for DetectionResult {
    fn default() -> Self {
        Self {
            total_count: 0,
            boxes: Vec::new(),
            status: default_status(),
            risk_score: 0.0,
        }
    }
}

/// Parses a detection response from raw JSON bytes.
///
/// # Errors
/// Returns an error if the bytes are not a JSON object; missing fields inside
/// a well-formed object are defaulted, not rejected.
pub fn from_json_slice(data: &[u8]) -> Result<DetectionResult, PlastiscanError> {
    serde_json::from_slice(data).map_err(|source| PlastiscanError::ResponseParse { source })
}
