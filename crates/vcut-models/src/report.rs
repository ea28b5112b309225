//! Dry-run (preview) cut reports.

use serde::{Deserialize, Serialize};

/// A single cut segment in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutSegment {
    pub start: f64,
    pub end: f64,
}

/// Report returned by the preview endpoint.
///
/// `total_duration`, `cut_time` and `cut_percentage` are measured by
/// probing the input and the produced output. Segment boundaries are not
/// parsed from the cutting tool's timeline, so `cut_segments` is always
/// empty and `segments_count` is 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewReport {
    /// Input duration in seconds (0.0 when the probe is unavailable)
    pub total_duration: f64,
    /// Seconds that would be removed by the cut
    pub cut_time: f64,
    /// Share of the input that would be removed, in percent
    pub cut_percentage: f64,
    /// Cut segment boundaries (not derived, see type docs)
    pub cut_segments: Vec<CutSegment>,
    /// Number of cut segments (not derived, see type docs)
    pub segments_count: u32,
    /// Threshold the analysis ran with, in percent
    pub threshold: f64,
    /// Human-readable outcome description
    pub status: String,
}

impl PreviewReport {
    /// Report for an analysis whose timeline came back empty: nothing
    /// to cut at this threshold.
    pub fn empty_timeline(total_duration: f64, threshold: f64) -> Self {
        Self {
            total_duration,
            cut_time: 0.0,
            cut_percentage: 0.0,
            cut_segments: Vec::new(),
            segments_count: 0,
            threshold,
            status: format!(
                "No silent sections found to cut (threshold: {}%)",
                threshold
            ),
        }
    }

    /// Report derived from the input duration and the duration of the
    /// cut output the tool produced.
    ///
    /// Either probe may have failed and reported 0.0; in that case the
    /// derived numbers degrade to zero rather than going negative.
    pub fn from_durations(total_duration: f64, output_duration: f64, threshold: f64) -> Self {
        let cut_time = if total_duration > 0.0 && output_duration > 0.0 {
            (total_duration - output_duration).max(0.0)
        } else {
            0.0
        };
        let cut_percentage = if total_duration > 0.0 {
            cut_time / total_duration * 100.0
        } else {
            0.0
        };
        let status = if total_duration > 0.0 {
            "Video analyzed successfully".to_string()
        } else {
            "Video analyzed successfully (duration unavailable)".to_string()
        };
        Self {
            total_duration,
            cut_time,
            cut_percentage,
            cut_segments: Vec::new(),
            segments_count: 0,
            threshold,
            status,
        }
    }
}
