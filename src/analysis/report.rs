//! Detection report types and terminal formatting.
//!
//! A [`DetectionReport`] can be rendered as text (Display) or serialized as
//! JSON for programmatic use.

use serde::Serialize;
use std::fmt;

use crate::api::DetectionResult;

use super::SizeBreakdown;

/// Everything one detection run produced, ready for display.
#[derive(Clone, Debug, Serialize)]
pub struct DetectionReport {
    /// Total particles counted by the detector.
    pub total_count: u64,
    /// Risk score assigned by the detector.
    pub risk_score: f64,
    /// Status label assigned by the detector.
    pub status: String,
    /// Configured risk threshold, echoed for downstream consumers.
    pub risk_threshold: f64,
    /// Per-particle sizes and summary; `None` when nothing was detected.
    pub breakdown: Option<SizeBreakdown>,
    /// Display-only option for chart rendering width.
    #[serde(skip)]
    pub(crate) bar_width: usize,
}

/// Bar labels for the three size buckets, in display order.
const BUCKET_LABELS: [&str; 3] = ["Min Size", "Average Size", "Max Size"];

impl DetectionReport {
    /// Builds a report from the service result and the analyzed sizes.
    pub fn new(
        result: &DetectionResult,
        breakdown: Option<SizeBreakdown>,
        risk_threshold: f64,
        bar_width: usize,
    ) -> Self {
        Self {
            total_count: result.total_count,
            risk_score: result.risk_score,
            status: result.status.clone(),
            risk_threshold,
            breakdown,
            bar_width,
        }
    }
}

impl fmt::Display for DetectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(
            f,
            "╭─────────────────────────────────────────────────────────────╮"
        )?;
        writeln!(
            f,
            "│                🧪  Microplastic Detection Report            │"
        )?;
        writeln!(
            f,
            "╰─────────────────────────────────────────────────────────────╯"
        )?;
        writeln!(f)?;

        self.fmt_summary(f)?;
        writeln!(f)?;
        self.fmt_sizes(f)?;
        writeln!(f)?;
        self.fmt_buckets(f)?;

        Ok(())
    }
}

impl DetectionReport {
    fn fmt_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "┌─ Detection Summary ───────────────────────────────────────┐"
        )?;
        writeln!(
            f,
            "│                                                           │"
        )?;
        writeln!(
            f,
            "│   Total Microplastics Detected: {:<8}                  │",
            self.total_count
        )?;
        writeln!(
            f,
            "│   Risk Score:                   {:<8}                  │",
            format_value(self.risk_score)
        )?;
        writeln!(
            f,
            "│   Final Status:                 {:<24}  │",
            truncate_label(&self.status, 24)
        )?;
        writeln!(
            f,
            "│                                                           │"
        )?;
        writeln!(
            f,
            "└───────────────────────────────────────────────────────────┘"
        )?;
        Ok(())
    }

    fn fmt_sizes(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Rows vary in width, so this section stays unboxed.
        writeln!(f, "📐 Individual Microplastic Sizes (nm)")?;
        writeln!(f)?;

        match &self.breakdown {
            Some(breakdown) => {
                for sample in &breakdown.samples {
                    writeln!(
                        f,
                        "   Microplastic {}: Width = {:.1} nm | Height = {:.1} nm | Size ≈ {:.1} nm",
                        sample.index, sample.width_nm, sample.height_nm, sample.size_nm
                    )?;
                }
            }
            None => {
                writeln!(f, "   (none)")?;
            }
        }

        Ok(())
    }

    fn fmt_buckets(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(breakdown) = &self.breakdown else {
            writeln!(f, "ℹ No microplastics detected.")?;
            return Ok(());
        };

        let s = &breakdown.summary;
        let counts: [i64; 3] = [s.min_count as i64, s.avg_count, s.max_count as i64];
        let max_count = counts.iter().copied().max().unwrap_or(1).max(1) as usize;

        writeln!(
            f,
            "┌─ Size Category Counts ────────────────────────────────────┐"
        )?;
        writeln!(
            f,
            "│                                                           │"
        )?;
        writeln!(
            f,
            "│   Microplastic Size Distribution (Count-Based)            │"
        )?;
        writeln!(
            f,
            "│                                                           │"
        )?;
        writeln!(
            f,
            "│                   Count                                   │"
        )?;

        for (label, count) in BUCKET_LABELS.iter().zip(counts) {
            // A negative residual draws an empty bar; the count itself is
            // shown unclamped.
            let filled = count.max(0) as usize;
            writeln!(
                f,
                "│   {:<13} {:>7}  {}│",
                label,
                count,
                pad_bar(
                    &render_bar(filled, max_count, self.bar_width),
                    self.bar_width
                )
            )?;
        }

        writeln!(
            f,
            "│                                                           │"
        )?;
        writeln!(
            f,
            "└───────────────────────────────────────────────────────────┘"
        )?;
        Ok(())
    }
}

/// Format an f64 without trailing noise: integers print bare.
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}

/// Render a horizontal bar using Unicode block characters.
fn render_bar(count: usize, max_count: usize, width: usize) -> String {
    if max_count == 0 || width == 0 {
        return String::new();
    }

    let filled = (count * width) / max_count;
    let filled = filled.min(width);
    "█".repeat(filled) + &"░".repeat(width - filled)
}

/// Pad a bar string to ensure consistent column alignment.
fn pad_bar(bar: &str, width: usize) -> String {
    let visual_len = bar.chars().count();
    let padding = (width + 2).saturating_sub(visual_len);
    format!("{}{}", bar, " ".repeat(padding))
}

/// Truncate a label to fit in the display column.
fn truncate_label(label: &str, max_len: usize) -> String {
    if label.chars().count() <= max_len {
        label.to_string()
    } else {
        let cut: String = label.chars().take(max_len - 1).collect();
        format!("{cut}…")
    }
}
