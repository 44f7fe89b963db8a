//! Turning-Point Detection Engine
//!
//! Orchestrates the detection pipeline: smoothing, extremum extraction,
//! amplitude-relative prominence filtering, alternation enforcement and
//! index remapping, with a legacy fallback for under-detection and a
//! frequency-based alternative mode. The engine is a pure computation over
//! an immutable trajectory snapshot; diagnostics are returned as values
//! alongside the result instead of being printed.

use super::alternation::enforce_alternation;
use super::extrema::{find_extrema, global_prominence, local_prominence, ExtremumCandidate};
use super::fallback::direction_reversals;
use super::frequency::{frequency_turning_points, MIN_FREQUENCY_SAMPLES};
use super::smoothing::smooth_positions;
use crate::config::{DetectionMode, ProminenceStrategy, TrackingConfig};
use crate::types::{Position, Trajectory, TurningPoint};
use serde::Serialize;
use tracing::{debug, warn};

/// Minimum trajectory length for the adaptive primary pipeline
pub const MIN_PRIMARY_SAMPLES: usize = 16;

/// Minimum turning points for a detection to count as successful
pub const MIN_TURNING_POINTS: usize = 3;

/// Absolute per-axis tolerance when matching a smoothed candidate back to an
/// original sample
pub const POSITION_MATCH_TOLERANCE: f64 = 1e-3;

/// Which strategy produced a detection result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionStrategy {
    /// Adaptive prominence-filtered pipeline
    Primary,
    /// Legacy direction-reversal detector, engaged after primary
    /// under-detection
    LegacyFallback,
    /// Zero-crossing frequency pipeline
    FrequencyBased,
}

/// Non-fatal diagnostic events emitted during detection.
///
/// Advisory only: warnings never change the returned sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetectionWarning {
    /// Trajectory shorter than the active pipeline's minimum
    InsufficientData { len: usize, required: usize },
    /// Primary pipeline under-detected and the legacy detector was engaged
    FallbackActivated { primary_count: usize },
    /// Neither strategy produced enough turning points
    UnderDetection { count: usize },
    /// Detected count deviates far from the rate-based expectation
    ImplausibleCount { count: usize, expected: f64 },
}

/// Result of one engine invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    /// Ordered turning points; alternation holds on the primary and fallback
    /// paths, strictly increasing frame indices on every path
    pub turning_points: Vec<TurningPoint>,
    /// Strategy that produced (or last attempted) the result
    pub strategy: DetectionStrategy,
    /// Diagnostic events collected along the way
    pub warnings: Vec<DetectionWarning>,
}

/// Turning-point detection engine.
///
/// Holds only the immutable configuration; every call is an independent pure
/// computation, safe to run concurrently with other calls.
#[derive(Debug, Clone)]
pub struct TurningPointDetector {
    config: TrackingConfig,
}

impl TurningPointDetector {
    pub fn new(config: TrackingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrackingConfig {
        &self.config
    }

    /// Detect turning points, deriving the video duration for the
    /// plausibility check from the trajectory's last timestamp.
    pub fn detect(&self, trajectory: &Trajectory) -> Detection {
        self.detect_with_duration(trajectory, None)
    }

    /// Detect turning points with an explicit video duration for the
    /// plausibility check.
    pub fn detect_with_duration(
        &self,
        trajectory: &Trajectory,
        video_duration_secs: Option<f64>,
    ) -> Detection {
        match self.config.mode {
            DetectionMode::Robust => self.detect_robust(trajectory, video_duration_secs),
            DetectionMode::Frequency => self.detect_frequency(trajectory),
        }
    }

    fn detect_robust(&self, trajectory: &Trajectory, video_duration_secs: Option<f64>) -> Detection {
        let mut warnings = Vec::new();

        if trajectory.len() < MIN_PRIMARY_SAMPLES {
            warnings.push(DetectionWarning::InsufficientData {
                len: trajectory.len(),
                required: MIN_PRIMARY_SAMPLES,
            });
        }

        let primary = robust_turning_points(trajectory, &self.config);

        if primary.len() < MIN_TURNING_POINTS {
            return self.run_fallback(trajectory, primary.len(), warnings);
        }

        // Plausibility: compare against the expected reversal rate. Skipped
        // when no positive duration is known.
        let duration = video_duration_secs.unwrap_or_else(|| trajectory.duration_secs());
        let expected = duration * self.config.expected_turns_per_second;
        if expected > 0.0 {
            let deviation = (primary.len() as f64 - expected).abs();
            if deviation > expected * self.config.max_deviation_factor {
                warn!(
                    count = primary.len(),
                    expected, "turning point count deviates from expected rate"
                );
                warnings.push(DetectionWarning::ImplausibleCount {
                    count: primary.len(),
                    expected,
                });
            }
        }

        debug!(count = primary.len(), "primary detection succeeded");
        Detection {
            turning_points: primary,
            strategy: DetectionStrategy::Primary,
            warnings,
        }
    }

    fn run_fallback(
        &self,
        trajectory: &Trajectory,
        primary_count: usize,
        mut warnings: Vec<DetectionWarning>,
    ) -> Detection {
        if !self.config.allow_fallback {
            warnings.push(DetectionWarning::UnderDetection {
                count: primary_count,
            });
            return Detection {
                turning_points: Vec::new(),
                strategy: DetectionStrategy::Primary,
                warnings,
            };
        }

        warn!(primary_count, "primary detection under-detected, engaging legacy fallback");
        warnings.push(DetectionWarning::FallbackActivated { primary_count });

        let fallback = direction_reversals(trajectory);
        if fallback.len() < MIN_TURNING_POINTS {
            warnings.push(DetectionWarning::UnderDetection {
                count: fallback.len(),
            });
            return Detection {
                turning_points: Vec::new(),
                strategy: DetectionStrategy::LegacyFallback,
                warnings,
            };
        }

        Detection {
            turning_points: fallback,
            strategy: DetectionStrategy::LegacyFallback,
            warnings,
        }
    }

    fn detect_frequency(&self, trajectory: &Trajectory) -> Detection {
        let mut warnings = Vec::new();

        if trajectory.len() < MIN_FREQUENCY_SAMPLES {
            warnings.push(DetectionWarning::InsufficientData {
                len: trajectory.len(),
                required: MIN_FREQUENCY_SAMPLES,
            });
            return Detection {
                turning_points: Vec::new(),
                strategy: DetectionStrategy::FrequencyBased,
                warnings,
            };
        }

        Detection {
            turning_points: frequency_turning_points(trajectory, &self.config),
            strategy: DetectionStrategy::FrequencyBased,
            warnings,
        }
    }
}

impl Default for TurningPointDetector {
    fn default() -> Self {
        Self::new(TrackingConfig::default())
    }
}

/// Run the adaptive primary pipeline on its own: smooth, extract extrema,
/// filter by amplitude-relative prominence, enforce alternation and remap
/// indices onto the original trajectory.
///
/// Returns an empty sequence for trajectories shorter than
/// [`MIN_PRIMARY_SAMPLES`]. Does not engage the fallback and performs no
/// plausibility check; [`TurningPointDetector::detect`] layers those on top.
pub fn robust_turning_points(trajectory: &Trajectory, config: &TrackingConfig) -> Vec<TurningPoint> {
    let samples = trajectory.samples();
    if samples.len() < MIN_PRIMARY_SAMPLES {
        return Vec::new();
    }

    let smoothed = smooth_positions(&trajectory.positions(), config.smoothing_window);
    let xs: Vec<f64> = smoothed.iter().map(|p| p.x).collect();

    // Adaptive thresholds scale with the observed swing amplitude, so
    // detection behaves the same regardless of absolute units.
    let max_x = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min_x = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let amplitude = max_x - min_x;

    // Computed for observability only; the historical tuning surface exposes
    // it but no stage consumes it as a filter.
    let min_movement = (amplitude * config.min_movement_factor).max(0.01);
    let min_prominence = amplitude * config.min_prominence_factor;
    debug!(amplitude, min_movement, min_prominence, "adaptive thresholds");

    let candidates = find_extrema(&smoothed);

    let filtered: Vec<ExtremumCandidate> = match config.prominence_strategy {
        ProminenceStrategy::Local => candidates
            .iter()
            .enumerate()
            .filter(|(i, _)| local_prominence(&candidates, *i) >= min_prominence)
            .map(|(_, c)| *c)
            .collect(),
        ProminenceStrategy::Global => candidates
            .iter()
            .filter(|c| global_prominence(&xs, c.index, c.kind) >= min_prominence)
            .copied()
            .collect(),
    };

    let alternating = enforce_alternation(&filtered);

    let mut turning_points: Vec<TurningPoint> = Vec::with_capacity(alternating.len());
    for candidate in alternating {
        let frame_index = remap_index(samples, &candidate);
        // Near-duplicate original positions can pull two candidates onto the
        // same sample; keep the first so indices stay strictly increasing.
        if let Some(last) = turning_points.last() {
            if frame_index <= last.frame_index {
                continue;
            }
        }
        turning_points.push(TurningPoint {
            frame_index,
            point: Position::new(candidate.x, candidate.y),
            is_maximum: candidate.kind.is_maximum(),
        });
    }

    turning_points
}

/// Recover the original trajectory index for a smoothed-series candidate.
///
/// Forward-scans for the first sample within tolerance of the candidate's
/// position (first match wins); candidates with no close sample keep their
/// series index, which lines up because smoothing preserves length.
fn remap_index(samples: &[crate::types::TrackedSample], candidate: &ExtremumCandidate) -> usize {
    samples
        .iter()
        .position(|s| {
            (s.position.x - candidate.x).abs() < POSITION_MATCH_TOLERANCE
                && (s.position.y - candidate.y).abs() < POSITION_MATCH_TOLERANCE
        })
        .unwrap_or(candidate.index)
}
