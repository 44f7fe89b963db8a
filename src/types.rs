//! Core types for trajectory analysis
//!
//! Defines the data structures exchanged with the external tracker and the
//! downstream revolution builder.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Frame rate assumed when loading trajectories from CSV exports that carry
/// no timestamps.
pub const DEFAULT_FRAME_RATE: f64 = 30.0;

/// Normalized 2D position (0..1 on both axes)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One tracked detection, produced per video frame by the external tracker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackedSample {
    /// Original video frame number
    pub frame_index: u64,
    /// Presentation time in seconds, relative to the start of the video
    pub timestamp: f64,
    /// Center of the detected bounding box, normalized coordinates
    pub position: Position,
    /// Detector confidence for this frame
    pub confidence: f32,
}

impl TrackedSample {
    pub fn new(frame_index: u64, timestamp: f64, position: Position, confidence: f32) -> Self {
        Self {
            frame_index,
            timestamp,
            position,
            confidence,
        }
    }
}

/// Complete time-ordered trace of one throw.
///
/// Construction validates ordering so every consumer can rely on strictly
/// increasing frame numbers and non-decreasing timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trajectory {
    samples: Vec<TrackedSample>,
}

impl Trajectory {
    /// Create a trajectory from tracker output.
    ///
    /// Rejects duplicate or decreasing frame numbers and decreasing
    /// timestamps.
    pub fn new(samples: Vec<TrackedSample>) -> crate::Result<Self> {
        for pair in samples.windows(2) {
            if pair[1].frame_index <= pair[0].frame_index {
                return Err(crate::Error::Trajectory(format!(
                    "frame index must be strictly increasing, got {} after {}",
                    pair[1].frame_index, pair[0].frame_index
                )));
            }
            if pair[1].timestamp < pair[0].timestamp {
                return Err(crate::Error::Trajectory(format!(
                    "timestamp must be monotonic, got {} after {}",
                    pair[1].timestamp, pair[0].timestamp
                )));
            }
        }
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[TrackedSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Positions only, in sample order
    pub fn positions(&self) -> Vec<Position> {
        self.samples.iter().map(|s| s.position).collect()
    }

    /// Duration covered by the trace: the last sample's timestamp.
    ///
    /// Timestamps are relative to the start of the video, so this matches
    /// the video duration when tracking ran to the end.
    pub fn duration_secs(&self) -> f64 {
        self.samples.last().map(|s| s.timestamp).unwrap_or(0.0)
    }

    /// Load a trajectory from a JSON file (array of samples)
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let samples: Vec<TrackedSample> = serde_json::from_str(&content)?;
        Self::new(samples)
    }

    /// Save the trajectory as JSON
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(&self.samples)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Parse the `Frame,X,Y` CSV format exported by the tracker.
    ///
    /// An optional header line is skipped. Timestamps are synthesized from
    /// the frame number at the given frame rate; confidence is not part of
    /// the export and defaults to 1.0.
    pub fn from_csv_str(content: &str, frame_rate: f64) -> crate::Result<Self> {
        if frame_rate <= 0.0 {
            return Err(crate::Error::Parse(format!(
                "frame rate must be positive, got {frame_rate}"
            )));
        }
        let mut samples = Vec::new();
        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() != 3 {
                return Err(crate::Error::Parse(format!(
                    "line {}: expected 3 fields, got {}",
                    line_no + 1,
                    fields.len()
                )));
            }
            // Header line ("Frame,X,Y")
            if line_no == 0 && fields[0].parse::<u64>().is_err() {
                continue;
            }
            let frame: u64 = fields[0].parse().map_err(|_| {
                crate::Error::Parse(format!("line {}: invalid frame number", line_no + 1))
            })?;
            let x: f64 = fields[1].parse().map_err(|_| {
                crate::Error::Parse(format!("line {}: invalid x coordinate", line_no + 1))
            })?;
            let y: f64 = fields[2].parse().map_err(|_| {
                crate::Error::Parse(format!("line {}: invalid y coordinate", line_no + 1))
            })?;
            samples.push(TrackedSample::new(
                frame,
                frame as f64 / frame_rate,
                Position::new(x, y),
                1.0,
            ));
        }
        Self::new(samples)
    }

    /// Load a `Frame,X,Y` CSV export
    pub fn load_csv(path: &Path, frame_rate: f64) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_csv_str(&content, frame_rate)
    }
}

/// A detected reversal of the dominant oscillation axis.
///
/// `frame_index` addresses the original trajectory sample list, never the
/// smoothed series a detector worked on internally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurningPoint {
    pub frame_index: usize,
    pub point: Position,
    pub is_maximum: bool,
}
