//! Revolution Segment Construction
//!
//! Downstream consumer of the detection engine: groups the ordered turning
//! points into overlapping three-point "ellipse" segments (one per full
//! revolution) and derives tilt angles and aggregate statistics. Each
//! segment's third point doubles as the next segment's first.

use crate::analysis::detector::TurningPointDetector;
use crate::config::TrackingConfig;
use crate::types::{Position, Trajectory, TurningPoint};
use serde::Serialize;
use tracing::debug;

/// Minimum trajectory length for a full throw analysis
pub const MIN_ANALYSIS_SAMPLES: usize = 21;

/// Deltas below this are treated as no movement when computing tilt
const ANGLE_EPSILON: f64 = 1e-3;

/// One revolution of the swing, spanning three consecutive turning points
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ellipse {
    /// 1-based revolution number
    pub number: usize,
    /// First turning point of the segment
    pub start: TurningPoint,
    /// Second turning point; the tilt angle derives from start and end
    pub end: TurningPoint,
    /// Tilt angle in degrees; positive tilts left, negative right
    pub tilt_angle: f64,
    /// First trajectory sample index covered by this revolution
    pub first_frame: usize,
    /// Last trajectory sample index covered by this revolution
    pub last_frame: usize,
}

/// Complete analysis of one throw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThrowAnalysis {
    pub ellipses: Vec<Ellipse>,
    pub total_frames: usize,
    pub average_angle: f64,
}

/// Aggregate statistics over the detected revolutions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EllipseStatistics {
    /// Average horizontal extent of a revolution (normalized units)
    pub average_width: f64,
    /// Average vertical extent of a revolution (normalized units)
    pub average_height: f64,
    /// Average revolution duration in seconds
    pub average_duration_secs: f64,
    /// Average tilt angle in degrees
    pub average_tilt_angle: f64,
    /// 0..1, higher means more consistent tilt across revolutions
    pub consistency_score: f64,
}

/// Tilt angle between the first two turning points of a revolution.
///
/// Uses `atan2(|dy|, |dx|)` for the magnitude. In normalized screen
/// coordinates y grows downward, so a start point with the smaller y lies
/// higher: the revolution tilts left and the angle is positive; otherwise it
/// tilts right and the angle is negative.
pub fn tilt_angle(start: Position, end: Position) -> f64 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;

    if dx.abs() <= ANGLE_EPSILON && dy.abs() <= ANGLE_EPSILON {
        return 0.0;
    }

    let degrees = dy.abs().atan2(dx.abs()).to_degrees();
    if start.y < end.y {
        degrees
    } else {
        -degrees
    }
}

/// Group turning points into overlapping three-point revolutions:
/// (0,1,2), (2,3,4), (4,5,6), ...
///
/// Triples with frame indices outside the trajectory, or out of order, are
/// skipped. Fewer than 3 turning points yield no revolutions.
pub fn build_ellipses(turning_points: &[TurningPoint], trajectory: &Trajectory) -> Vec<Ellipse> {
    let mut ellipses = Vec::new();
    if turning_points.len() < 3 {
        return ellipses;
    }

    let mut start_index = 0;
    while start_index + 2 < turning_points.len() {
        let first = turning_points[start_index];
        let second = turning_points[start_index + 1];
        let third = turning_points[start_index + 2];

        if third.frame_index >= trajectory.len() || first.frame_index > third.frame_index {
            debug!(number = ellipses.len() + 1, "skipping revolution with invalid frame range");
            start_index += 2;
            continue;
        }

        ellipses.push(Ellipse {
            number: ellipses.len() + 1,
            start: first,
            end: second,
            tilt_angle: tilt_angle(first.point, second.point),
            first_frame: first.frame_index,
            last_frame: third.frame_index,
        });

        start_index += 2;
    }

    ellipses
}

/// Run detection and revolution construction end to end.
///
/// Returns `None` when the trajectory is too short, detection produces fewer
/// than 3 turning points, or no revolution can be formed; these are expected
/// outcomes for poor traces, not errors.
pub fn analyze_trajectory(trajectory: &Trajectory, config: &TrackingConfig) -> Option<ThrowAnalysis> {
    if trajectory.len() < MIN_ANALYSIS_SAMPLES {
        return None;
    }

    let detection = TurningPointDetector::new(config.clone()).detect(trajectory);
    if detection.turning_points.len() < 3 {
        return None;
    }

    let ellipses = build_ellipses(&detection.turning_points, trajectory);
    if ellipses.is_empty() {
        return None;
    }

    let average_angle =
        ellipses.iter().map(|e| e.tilt_angle).sum::<f64>() / ellipses.len() as f64;

    Some(ThrowAnalysis {
        ellipses,
        total_frames: trajectory.len(),
        average_angle,
    })
}

impl EllipseStatistics {
    /// Compute aggregate statistics for a set of revolutions.
    pub fn from_ellipses(ellipses: &[Ellipse], trajectory: &Trajectory) -> Self {
        if ellipses.is_empty() {
            return Self {
                average_width: 0.0,
                average_height: 0.0,
                average_duration_secs: 0.0,
                average_tilt_angle: 0.0,
                consistency_score: 0.0,
            };
        }

        let samples = trajectory.samples();
        let count = ellipses.len() as f64;

        let mut width_sum = 0.0;
        let mut height_sum = 0.0;
        let mut duration_sum = 0.0;
        for ellipse in ellipses {
            let span = &samples[ellipse.first_frame..=ellipse.last_frame];
            let min_x = span.iter().map(|s| s.position.x).fold(f64::INFINITY, f64::min);
            let max_x = span.iter().map(|s| s.position.x).fold(f64::NEG_INFINITY, f64::max);
            let min_y = span.iter().map(|s| s.position.y).fold(f64::INFINITY, f64::min);
            let max_y = span.iter().map(|s| s.position.y).fold(f64::NEG_INFINITY, f64::max);
            width_sum += max_x - min_x;
            height_sum += max_y - min_y;
            duration_sum +=
                samples[ellipse.last_frame].timestamp - samples[ellipse.first_frame].timestamp;
        }

        let angles: Vec<f64> = ellipses.iter().map(|e| e.tilt_angle).collect();
        let average_tilt_angle = angles.iter().sum::<f64>() / count;

        // Consistency as the inverse coefficient of variation of the tilt.
        let cv = if average_tilt_angle > 0.0 {
            std_deviation(&angles) / average_tilt_angle
        } else {
            0.0
        };
        let consistency_score = (1.0 - cv).max(0.0);

        Self {
            average_width: width_sum / count,
            average_height: height_sum / count,
            average_duration_secs: duration_sum / count,
            average_tilt_angle,
            consistency_score,
        }
    }
}

fn std_deviation(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        / (values.len() - 1) as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrackedSample;

    fn trajectory(n: usize) -> Trajectory {
        let samples = (0..n)
            .map(|i| {
                let x = 0.5 + 0.3 * (i as f64 * 0.4).sin();
                let y = 0.5 + 0.1 * (i as f64 * 0.4).cos();
                TrackedSample::new(i as u64, i as f64 / 30.0, Position::new(x, y), 1.0)
            })
            .collect();
        Trajectory::new(samples).unwrap()
    }

    fn point(frame_index: usize, x: f64, y: f64, is_maximum: bool) -> TurningPoint {
        TurningPoint {
            frame_index,
            point: Position::new(x, y),
            is_maximum,
        }
    }

    #[test]
    fn test_too_few_points_no_ellipses() {
        let points = vec![point(0, 0.2, 0.5, false), point(5, 0.8, 0.5, true)];
        assert!(build_ellipses(&points, &trajectory(30)).is_empty());
    }

    #[test]
    fn test_three_points_one_ellipse() {
        let points = vec![
            point(2, 0.2, 0.5, false),
            point(8, 0.8, 0.4, true),
            point(14, 0.2, 0.5, false),
        ];
        let ellipses = build_ellipses(&points, &trajectory(30));
        assert_eq!(ellipses.len(), 1);
        assert_eq!(ellipses[0].number, 1);
        assert_eq!(ellipses[0].first_frame, 2);
        assert_eq!(ellipses[0].last_frame, 14);
    }

    #[test]
    fn test_five_points_two_overlapping_ellipses() {
        let points = vec![
            point(2, 0.2, 0.5, false),
            point(8, 0.8, 0.4, true),
            point(14, 0.2, 0.5, false),
            point(20, 0.8, 0.4, true),
            point(26, 0.2, 0.5, false),
        ];
        let ellipses = build_ellipses(&points, &trajectory(30));
        assert_eq!(ellipses.len(), 2);
        // The second revolution starts where the first ended.
        assert_eq!(ellipses[0].last_frame, 14);
        assert_eq!(ellipses[1].first_frame, 14);
        assert_eq!(ellipses[1].last_frame, 26);
    }

    #[test]
    fn test_four_points_still_one_ellipse() {
        let points = vec![
            point(2, 0.2, 0.5, false),
            point(8, 0.8, 0.4, true),
            point(14, 0.2, 0.5, false),
            point(20, 0.8, 0.4, true),
        ];
        assert_eq!(build_ellipses(&points, &trajectory(30)).len(), 1);
    }

    #[test]
    fn test_out_of_range_triple_skipped() {
        let points = vec![
            point(2, 0.2, 0.5, false),
            point(8, 0.8, 0.4, true),
            point(99, 0.2, 0.5, false),
        ];
        assert!(build_ellipses(&points, &trajectory(30)).is_empty());
    }

    #[test]
    fn test_tilt_angle_left_positive() {
        // Start higher on screen (smaller y): tilts left.
        let angle = tilt_angle(Position::new(0.2, 0.3), Position::new(0.8, 0.5));
        assert!(angle > 0.0);
        assert!((angle - (0.2f64.atan2(0.6).to_degrees())).abs() < 1e-9);
    }

    #[test]
    fn test_tilt_angle_right_negative() {
        let angle = tilt_angle(Position::new(0.2, 0.5), Position::new(0.8, 0.3));
        assert!(angle < 0.0);
    }

    #[test]
    fn test_tilt_angle_no_movement_is_zero() {
        let angle = tilt_angle(Position::new(0.5, 0.5), Position::new(0.5005, 0.5005));
        assert_eq!(angle, 0.0);
    }

    #[test]
    fn test_analyze_trajectory_happy_path() {
        let analysis = analyze_trajectory(&trajectory(60), &TrackingConfig::default())
            .expect("analysis should succeed on a clean multi-cycle swing");
        assert!(!analysis.ellipses.is_empty());
        assert_eq!(analysis.total_frames, 60);
        let mean = analysis.ellipses.iter().map(|e| e.tilt_angle).sum::<f64>()
            / analysis.ellipses.len() as f64;
        assert!((analysis.average_angle - mean).abs() < 1e-12);
    }

    #[test]
    fn test_analyze_trajectory_too_short() {
        assert!(analyze_trajectory(&trajectory(20), &TrackingConfig::default()).is_none());
    }

    #[test]
    fn test_statistics_empty() {
        let stats = EllipseStatistics::from_ellipses(&[], &trajectory(30));
        assert_eq!(stats.average_width, 0.0);
        assert_eq!(stats.consistency_score, 0.0);
    }

    #[test]
    fn test_statistics_identical_ellipses_fully_consistent() {
        let points = vec![
            point(2, 0.2, 0.5, false),
            point(8, 0.8, 0.4, true),
            point(14, 0.2, 0.5, false),
            point(20, 0.8, 0.4, true),
            point(26, 0.2, 0.5, false),
        ];
        let traj = trajectory(30);
        let ellipses = build_ellipses(&points, &traj);
        let stats = EllipseStatistics::from_ellipses(&ellipses, &traj);
        assert!(stats.average_width > 0.0);
        assert!(stats.average_height > 0.0);
        assert!((stats.average_duration_secs - 12.0 / 30.0).abs() < 1e-9);
        // Identical tilt angles: zero variance, full consistency.
        assert!((stats.consistency_score - 1.0).abs() < 1e-9);
    }
}
