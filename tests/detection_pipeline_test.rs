//! Detection Pipeline Integration Tests
//!
//! Exercises the engine end to end over synthetic swings: output invariants
//! (alternation, monotonic frame indices), minimum-length guards, degenerate
//! inputs, amplitude independence and strategy tagging.

use swing_analyzer::analysis::detector::robust_turning_points;
use swing_analyzer::analysis::frequency::frequency_turning_points;
use swing_analyzer::{
    DetectionMode, DetectionStrategy, DetectionWarning, Position, TrackedSample, TrackingConfig,
    Trajectory, TurningPoint, TurningPointDetector,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn trajectory_xy(points: &[(f64, f64)], fps: f64) -> Trajectory {
    let samples = points
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| TrackedSample::new(i as u64, i as f64 / fps, Position::new(x, y), 1.0))
        .collect();
    Trajectory::new(samples).expect("synthetic trajectory is ordered")
}

fn sine_trajectory(n: usize, amplitude: f64, step: f64, fps: f64) -> Trajectory {
    let points: Vec<(f64, f64)> = (0..n)
        .map(|i| {
            let phase = i as f64 * step;
            (0.5 + amplitude * phase.sin(), 0.4 + 0.1 * phase.cos())
        })
        .collect();
    trajectory_xy(&points, fps)
}

/// Deterministic jitter for noise-robustness tests
fn jitter(seed: &mut u64) -> f64 {
    *seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    ((*seed >> 33) as f64 / u32::MAX as f64) - 0.5
}

fn alternates(points: &[TurningPoint]) -> bool {
    points.windows(2).all(|w| w[0].is_maximum != w[1].is_maximum)
}

fn strictly_increasing(points: &[TurningPoint]) -> bool {
    points.windows(2).all(|w| w[0].frame_index < w[1].frame_index)
}

// ============================================================================
// Scenario: clean multi-cycle swing
// ============================================================================

#[test]
fn test_clean_sine_yields_four_to_six_alternating_points() {
    // ~2.5 cycles over 40 frames.
    let trajectory = sine_trajectory(40, 0.3, 0.4, 16.0);
    let detection = TurningPointDetector::default().detect(&trajectory);

    assert_eq!(detection.strategy, DetectionStrategy::Primary);
    let count = detection.turning_points.len();
    assert!((4..=6).contains(&count), "expected 4-6 points, got {count}");
    assert!(alternates(&detection.turning_points));
    assert!(strictly_increasing(&detection.turning_points));
}

#[test]
fn test_first_kind_matches_initial_derivative() {
    // x rises at the start, so the first reversal must be a maximum.
    let rising = sine_trajectory(40, 0.3, 0.4, 16.0);
    let detection = TurningPointDetector::default().detect(&rising);
    assert!(detection.turning_points[0].is_maximum);

    // Mirrored signal falls first: the first reversal must be a minimum.
    let points: Vec<(f64, f64)> = (0..40)
        .map(|i| {
            let phase = i as f64 * 0.4;
            (0.5 - 0.3 * phase.sin(), 0.4 + 0.1 * phase.cos())
        })
        .collect();
    let falling = trajectory_xy(&points, 16.0);
    let detection = TurningPointDetector::default().detect(&falling);
    assert!(!detection.turning_points[0].is_maximum);
}

// ============================================================================
// Scenario: single visible cycle at the primary stage
// ============================================================================

#[test]
fn test_single_cycle_yields_exactly_one_maximum() {
    // 16 samples: x rises 0.4 -> 0.6, then falls back; amplitude 0.2.
    let mut xs = Vec::with_capacity(16);
    for i in 0..=8 {
        xs.push(0.4 + 0.025 * i as f64);
    }
    for k in 1..=7 {
        xs.push(0.6 - 0.027 * k as f64);
    }
    assert_eq!(xs.len(), 16);

    let points: Vec<(f64, f64)> = xs.into_iter().map(|x| (x, 0.5)).collect();
    let trajectory = trajectory_xy(&points, 30.0);

    let detected = robust_turning_points(&trajectory, &TrackingConfig::default());
    assert_eq!(detected.len(), 1);
    assert!(detected[0].is_maximum);
}

// ============================================================================
// Minimum-length guards
// ============================================================================

#[test]
fn test_fifteen_samples_refused_by_primary_stage() {
    let trajectory = sine_trajectory(15, 0.3, 0.4, 30.0);
    assert!(robust_turning_points(&trajectory, &TrackingConfig::default()).is_empty());
}

#[test]
fn test_length_ten_empty_from_both_pipelines() {
    // Monotonic ramp: nothing to reverse on, below both minimums.
    let points: Vec<(f64, f64)> = (0..10).map(|i| (0.1 + 0.05 * i as f64, 0.5)).collect();
    let trajectory = trajectory_xy(&points, 30.0);
    let config = TrackingConfig::default();

    assert!(robust_turning_points(&trajectory, &config).is_empty());
    assert!(frequency_turning_points(&trajectory, &config).is_empty());

    let robust = TurningPointDetector::new(config.clone()).detect(&trajectory);
    assert!(robust.turning_points.is_empty());

    let frequency_config = TrackingConfig {
        mode: DetectionMode::Frequency,
        ..config
    };
    let frequency = TurningPointDetector::new(frequency_config).detect(&trajectory);
    assert!(frequency.turning_points.is_empty());
    assert_eq!(frequency.strategy, DetectionStrategy::FrequencyBased);
}

// ============================================================================
// Degenerate input
// ============================================================================

#[test]
fn test_constant_trajectory_yields_empty() {
    let points = vec![(0.5, 0.5); 24];
    let trajectory = trajectory_xy(&points, 30.0);
    let detection = TurningPointDetector::default().detect(&trajectory);
    assert!(detection.turning_points.is_empty());
}

#[test]
fn test_empty_trajectory_yields_empty() {
    let trajectory = Trajectory::new(vec![]).unwrap();
    let detection = TurningPointDetector::default().detect(&trajectory);
    assert!(detection.turning_points.is_empty());
}

// ============================================================================
// Amplitude independence
// ============================================================================

#[test]
fn test_threshold_scales_with_amplitude() {
    let small = sine_trajectory(40, 0.1, 0.4, 16.0);
    let large = sine_trajectory(40, 0.2, 0.4, 16.0);

    let detector = TurningPointDetector::default();
    let small_detection = detector.detect(&small);
    let large_detection = detector.detect(&large);

    assert_eq!(
        small_detection.turning_points.len(),
        large_detection.turning_points.len()
    );
    let small_pattern: Vec<bool> =
        small_detection.turning_points.iter().map(|p| p.is_maximum).collect();
    let large_pattern: Vec<bool> =
        large_detection.turning_points.iter().map(|p| p.is_maximum).collect();
    assert_eq!(small_pattern, large_pattern);
}

// ============================================================================
// Invariants under noise
// ============================================================================

#[test]
fn test_invariants_hold_on_noisy_swing() {
    let mut seed = 0x5eed_5eed_5eed_5eedu64;
    let points: Vec<(f64, f64)> = (0..120)
        .map(|i| {
            let phase = i as f64 * 0.25;
            (
                0.5 + 0.25 * phase.sin() + 0.02 * jitter(&mut seed),
                0.4 + 0.1 * phase.cos() + 0.02 * jitter(&mut seed),
            )
        })
        .collect();
    let trajectory = trajectory_xy(&points, 30.0);

    let detection = TurningPointDetector::default().detect(&trajectory);
    assert!(detection.turning_points.len() >= 3);
    assert!(alternates(&detection.turning_points));
    assert!(strictly_increasing(&detection.turning_points));
}

#[test]
fn test_frequency_mode_indices_increase() {
    let trajectory = sine_trajectory(90, 0.3, 0.3, 30.0);
    let config = TrackingConfig {
        mode: DetectionMode::Frequency,
        ..Default::default()
    };
    let detection = TurningPointDetector::new(config).detect(&trajectory);
    assert_eq!(detection.strategy, DetectionStrategy::FrequencyBased);
    assert!(!detection.turning_points.is_empty());
    assert!(strictly_increasing(&detection.turning_points));
}

// ============================================================================
// Fallback behavior and diagnostics
// ============================================================================

#[test]
fn test_fallback_tagging_and_warning() {
    // 12 samples of clean zigzag: too short for the primary pipeline, rich
    // in raw reversals.
    let points: Vec<(f64, f64)> = (0..12)
        .map(|i| (if i % 4 < 2 { 0.3 + 0.1 * (i % 2) as f64 } else { 0.7 - 0.1 * (i % 2) as f64 }, 0.5))
        .collect();
    let trajectory = trajectory_xy(&points, 30.0);

    let detection = TurningPointDetector::default().detect(&trajectory);
    assert_eq!(detection.strategy, DetectionStrategy::LegacyFallback);
    assert!(detection.turning_points.len() >= 3);
    assert!(alternates(&detection.turning_points));
    assert!(detection
        .warnings
        .iter()
        .any(|w| matches!(w, DetectionWarning::FallbackActivated { .. })));
}

#[test]
fn test_warnings_do_not_change_result() {
    // Force an implausible count by claiming a very long video.
    let trajectory = sine_trajectory(40, 0.3, 0.4, 16.0);
    let detector = TurningPointDetector::default();

    let plain = detector.detect_with_duration(&trajectory, Some(2.5));
    let warned = detector.detect_with_duration(&trajectory, Some(60.0));

    assert!(warned
        .warnings
        .iter()
        .any(|w| matches!(w, DetectionWarning::ImplausibleCount { .. })));
    assert_eq!(plain.turning_points, warned.turning_points);
}

#[test]
fn test_detection_serializes_to_json() {
    let trajectory = sine_trajectory(40, 0.3, 0.4, 16.0);
    let detection = TurningPointDetector::default().detect(&trajectory);

    let json = serde_json::to_string(&detection).unwrap();
    assert!(json.contains("\"strategy\":\"primary\""));
    assert!(json.contains("\"turning_points\""));
}
