//! # Swing Analyzer
//!
//! Turns the noisy per-frame position trace of a tracked, swung implement
//! into a structured description of the swing: an alternating sequence of
//! turning points, grouped into revolution segments with derived angle
//! statistics.
//!
//! ## Overview
//!
//! An external tracker detects the implement frame by frame and hands over a
//! complete [`Trajectory`]. The engine smooths the trace, extracts local
//! extrema of the dominant oscillation axis, filters them by
//! amplitude-relative prominence, enforces strict max/min alternation and
//! maps the survivors back onto the original frames. A zero-crossing
//! frequency estimator provides an alternative pipeline for highly regular
//! swings, and a legacy direction-reversal detector serves as fallback when
//! the adaptive pipeline under-detects.
//!
//! ## Quick Start
//!
//! ```no_run
//! use swing_analyzer::{TrackingConfig, Trajectory, TurningPointDetector};
//! use std::path::Path;
//!
//! let trajectory = Trajectory::load_csv(Path::new("throw.csv"), 30.0)?;
//!
//! let detector = TurningPointDetector::new(TrackingConfig::default());
//! let detection = detector.detect(&trajectory);
//!
//! println!(
//!     "{} turning points via {:?}",
//!     detection.turning_points.len(),
//!     detection.strategy
//! );
//! # Ok::<(), swing_analyzer::Error>(())
//! ```
//!
//! ## Detection Pipeline
//!
//! ```text
//! ┌────────────┐   ┌───────────┐   ┌────────────┐   ┌────────────┐
//! │ Trajectory │──▶│  Smoother │──▶│  Extremum  │──▶│ Prominence │
//! │  (tracker) │   │ (mov avg) │   │  Extractor │   │   Filter   │
//! └────────────┘   └───────────┘   └────────────┘   └────────────┘
//!                                                          │
//!                                                          ▼
//! ┌────────────┐   ┌───────────┐   ┌────────────┐   ┌────────────┐
//! │ Revolution │◀──│ Detection │◀──│    Index   │◀──│ Alternation│
//! │  Builder   │   │ (+ warns) │   │  Remapper  │   │  Enforcer  │
//! └────────────┘   └───────────┘   └────────────┘   └────────────┘
//! ```
//!
//! The engine is a pure, synchronous computation over an immutable snapshot:
//! no I/O, no shared state, safe to invoke concurrently with independent
//! inputs. Diagnostics travel as [`analysis::DetectionWarning`] values in
//! the result, never as side effects on the returned sequence.

pub mod analysis;
pub mod app;
pub mod config;
pub mod revolution;
pub mod types;

// Re-export commonly used types
pub use analysis::{Detection, DetectionStrategy, DetectionWarning, TurningPointDetector};
pub use config::{DetectionMode, ProminenceStrategy, TrackingConfig};
pub use revolution::{analyze_trajectory, Ellipse, EllipseStatistics, ThrowAnalysis};
pub use types::{Position, TrackedSample, Trajectory, TurningPoint};

/// Result type alias for the swing analyzer
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the swing analyzer
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Trajectory error: {0}")]
    Trajectory(String),

    #[error("Trajectory parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
