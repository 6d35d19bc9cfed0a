//! Runtime configuration for the detection flow.
//!
//! All tunables live in an explicit [`DetectConfig`] that is constructed once
//! (from CLI arguments and environment variables) and passed down; the core
//! modules carry no globals and no hidden state.

use std::time::Duration;

/// Default detection service endpoint.
pub const DEFAULT_API_URL: &str = "https://microplastic-detection-backend.onrender.com/detect";

/// Default directory holding the bundled example images.
pub const DEFAULT_EXAMPLE_DIR: &str = "Example_images";

/// Default pixel-to-nanometer conversion factor for the microscope optics.
pub const DEFAULT_PIXEL_TO_NM: f64 = 100.0;

/// Default risk threshold reported alongside results.
///
/// The threshold is configuration only: no local logic compares against it.
/// The alert rule lives in the detection service; the value is carried so the
/// JSON output is self-describing for downstream consumers.
pub const DEFAULT_RISK_THRESHOLD: f64 = 15.0;

/// Default timeout for the detection request, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for one detection run.
#[derive(Clone, Debug)]
pub struct DetectConfig {
    /// Detection service endpoint URL.
    pub api_url: String,
    /// Pixel-to-nanometer conversion factor.
    pub pixel_to_nm: f64,
    /// Risk threshold echoed in structured output (unused by local logic).
    pub risk_threshold: f64,
    /// Bound on the whole detection request.
    pub timeout: Duration,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            pixel_to_nm: DEFAULT_PIXEL_TO_NM,
            risk_threshold: DEFAULT_RISK_THRESHOLD,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
