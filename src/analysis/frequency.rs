//! Frequency-Based Detection
//!
//! Alternative pipeline for highly regular swings: estimate the oscillation
//! rate from zero crossings around the series mean, derive how many
//! reversals that rate implies, and keep exactly that many extrema ranked by
//! global prominence. Unlike the robust pipeline this path does not enforce
//! kind alternation; consecutive same-kind points can appear in its output.

use super::extrema::{find_extrema, global_prominence, ExtremumCandidate};
use super::smoothing::smooth_positions;
use crate::config::TrackingConfig;
use crate::types::{Position, Trajectory, TurningPoint};
use tracing::debug;

/// Minimum trajectory length for the frequency pipeline
pub const MIN_FREQUENCY_SAMPLES: usize = 31;

/// Estimate the oscillation frequency in cycles per sample.
///
/// Counts sign changes of `x - mean` between consecutive samples; every full
/// cycle crosses the mean twice, so `frequency = crossings / (2n)`. Series
/// of 10 or fewer samples are too short to estimate and return 0.
pub fn estimate_frequency(xs: &[f64]) -> f64 {
    if xs.len() <= 10 {
        return 0.0;
    }

    let mean = xs.iter().sum::<f64>() / xs.len() as f64;

    let mut crossings = 0usize;
    let mut last_sign: Option<i8> = None;
    for &x in xs {
        let sign = if x > mean { 1 } else { -1 };
        if let Some(last) = last_sign {
            if last != sign {
                crossings += 1;
            }
        }
        last_sign = Some(sign);
    }

    crossings as f64 / (2.0 * xs.len() as f64)
}

/// Number of reversals implied by a frequency estimate: two per cycle.
pub fn expected_peaks(n: usize, frequency: f64) -> usize {
    (n as f64 * frequency * 2.0).round() as usize
}

/// Map an index of a (possibly length-reduced) analysis series back onto the
/// original trajectory by proportional scaling.
fn scale_index(series_index: usize, series_len: usize, original_len: usize) -> usize {
    let scaled = (series_index as f64 * original_len as f64 / series_len as f64).round() as usize;
    scaled.min(original_len - 1)
}

/// Detect turning points via the frequency estimate and a global-prominence
/// top-N selection.
///
/// Returns an empty sequence for trajectories shorter than
/// [`MIN_FREQUENCY_SAMPLES`].
pub fn frequency_turning_points(
    trajectory: &Trajectory,
    config: &TrackingConfig,
) -> Vec<TurningPoint> {
    let samples = trajectory.samples();
    if samples.len() < MIN_FREQUENCY_SAMPLES {
        return Vec::new();
    }

    let series: Vec<Position> = if config.frequency_use_smoothed {
        smooth_positions(&trajectory.positions(), config.smoothing_window)
    } else {
        trajectory.positions()
    };
    let xs: Vec<f64> = series.iter().map(|p| p.x).collect();

    let frequency = estimate_frequency(&xs);
    let target = expected_peaks(xs.len(), frequency);
    debug!(frequency, target, "frequency estimate");
    if target == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<(ExtremumCandidate, f64)> = find_extrema(&series)
        .into_iter()
        .map(|c| {
            let prominence = global_prominence(&xs, c.index, c.kind);
            (c, prominence)
        })
        .collect();

    // Most prominent first; stable sort keeps earlier extrema ahead on ties.
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(target);

    // Restore chronological order for the kept set.
    ranked.sort_by_key(|(c, _)| c.index);

    let mut turning_points: Vec<TurningPoint> = Vec::with_capacity(ranked.len());
    for (candidate, _) in ranked {
        let frame_index = scale_index(candidate.index, xs.len(), samples.len());
        // Proportional scaling can collide after rounding; keep the first
        // point mapped to a frame so indices stay strictly increasing.
        if let Some(last) = turning_points.last() {
            if frame_index <= last.frame_index {
                continue;
            }
        }
        turning_points.push(TurningPoint {
            frame_index,
            point: samples[frame_index].position,
            is_maximum: candidate.kind.is_maximum(),
        });
    }

    turning_points
}
