//! Legacy Direction-Reversal Detector
//!
//! The pre-adaptive detection strategy: no smoothing, no thresholds, just
//! strict sign changes of the x motion between consecutive samples. It
//! over-detects on noisy traces, which is why the adaptive pipeline replaced
//! it, but it still serves as the fallback when that pipeline under-detects.

use crate::types::{Trajectory, TurningPoint};

/// Detect turning points as raw x-direction reversals.
///
/// The first sample is always emitted as a seed point; its kind is chosen
/// opposite to the first reversal implied by the initial movement direction,
/// so the output alternates from the start. Afterwards every strict sign
/// change of `x[i] - x[i-1]` emits the sample before the change. Traces with
/// fewer than 3 samples yield nothing; a trace without any x movement yields
/// the seed alone.
pub fn direction_reversals(trajectory: &Trajectory) -> Vec<TurningPoint> {
    let samples = trajectory.samples();
    if samples.len() <= 2 {
        return Vec::new();
    }

    // Initial direction: the first non-zero x step. Every movement counts,
    // however small.
    let mut direction: Option<i8> = None;
    for pair in samples.windows(2) {
        let dx = pair[1].position.x - pair[0].position.x;
        if dx != 0.0 {
            direction = Some(if dx > 0.0 { 1 } else { -1 });
            break;
        }
    }

    let mut current = match direction {
        Some(d) => d,
        None => {
            // No horizontal movement at all: nothing beyond the seed.
            return vec![TurningPoint {
                frame_index: 0,
                point: samples[0].position,
                is_maximum: false,
            }];
        }
    };

    let mut turning_points = vec![TurningPoint {
        frame_index: 0,
        point: samples[0].position,
        is_maximum: current < 0,
    }];

    for i in 1..samples.len() {
        let dx = samples[i].position.x - samples[i - 1].position.x;
        if dx == 0.0 {
            continue;
        }
        let new_direction = if dx > 0.0 { 1 } else { -1 };
        if new_direction != current {
            turning_points.push(TurningPoint {
                frame_index: i - 1,
                point: samples[i - 1].position,
                is_maximum: current > 0,
            });
            current = new_direction;
        }
    }

    turning_points
}
