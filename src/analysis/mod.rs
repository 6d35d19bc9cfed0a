//! Particle size analysis.
//!
//! This module is the reproducible core of the tool: given a parsed detection
//! result and a pixel-to-nanometer factor, it derives a physical size per
//! bounding box and a three-bucket size classification suitable for text
//! display and charting.
//!
//! The computation is pure: no I/O, no state, nothing that can block.

mod report;

pub use report::DetectionReport;

use serde::Serialize;

use crate::api::DetectionResult;

/// Lower band factor: sizes within +10% of the minimum count as "Min Size".
const MIN_BAND_FACTOR: f64 = 1.10;

/// Upper band factor: sizes within -10% of the maximum count as "Max Size".
const MAX_BAND_FACTOR: f64 = 0.90;

/// Physical size derived for one detected particle, in detector order.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct SizeSample {
    /// 1-based display index.
    pub index: usize,
    /// Box width converted to nanometers.
    pub width_nm: f64,
    /// Box height converted to nanometers.
    pub height_nm: f64,
    /// Equivalent-area square side: `sqrt(width_nm * height_nm)`.
    pub size_nm: f64,
}

/// Aggregate size statistics and bucket counts.
///
/// `min_count` and `max_count` are independent band tallies, not a partition:
/// when the size range is narrow enough that `min_thresh >= max_thresh`, a
/// single size can land in both bands. `avg_count` is the residual against the
/// detector's `total_count` and is signed so that this double-count case is
/// reported as-is (a negative middle bucket) instead of being papered over.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct SizeSummary {
    pub min_size: f64,
    pub avg_size: f64,
    pub max_size: f64,
    pub min_thresh: f64,
    pub max_thresh: f64,
    pub min_count: usize,
    pub avg_count: i64,
    pub max_count: usize,
}

/// Per-particle sizes plus their summary.
#[derive(Clone, Debug, Serialize)]
pub struct SizeBreakdown {
    pub samples: Vec<SizeSample>,
    pub summary: SizeSummary,
}

/// Analyze a detection result.
///
/// Converts each box to nanometers using `pixel_to_nm`, takes the geometric
/// mean of the converted dimensions as the particle size, and classifies all
/// sizes into min/average/max buckets.
///
/// Returns `None` when the result contains no boxes, the "nothing detected"
/// state, which callers render as an informational message rather than a
/// zero-filled summary.
pub fn analyze(result: &DetectionResult, pixel_to_nm: f64) -> Option<SizeBreakdown> {
    let samples: Vec<SizeSample> = result
        .boxes
        .iter()
        .enumerate()
        .map(|(i, bbox)| {
            let width_nm = bbox.width * pixel_to_nm;
            let height_nm = bbox.height * pixel_to_nm;
            SizeSample {
                index: i + 1,
                width_nm,
                height_nm,
                size_nm: (width_nm * height_nm).sqrt(),
            }
        })
        .collect();

    if samples.is_empty() {
        return None;
    }

    let sizes: Vec<f64> = samples.iter().map(|sample| sample.size_nm).collect();

    let min_size = sizes.iter().copied().fold(f64::INFINITY, f64::min);
    let max_size = sizes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg_size = sizes.iter().sum::<f64>() / sizes.len() as f64;

    let min_thresh = min_size * MIN_BAND_FACTOR;
    let max_thresh = max_size * MAX_BAND_FACTOR;

    let min_count = sizes.iter().filter(|&&s| s <= min_thresh).count();
    let max_count = sizes.iter().filter(|&&s| s >= max_thresh).count();
    let avg_count = result.total_count as i64 - min_count as i64 - max_count as i64;

    Some(SizeBreakdown {
        samples,
        summary: SizeSummary {
            min_size,
            avg_size,
            max_size,
            min_thresh,
            max_thresh,
            min_count,
            avg_count,
            max_count,
        },
    })
}
