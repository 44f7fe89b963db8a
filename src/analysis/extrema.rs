//! Extremum Candidates and Prominence Scoring
//!
//! Locates raw local maxima/minima of the x-channel and scores how far each
//! one stands out against competing extrema of the opposite kind. Two
//! bounding rules exist and stay numerically distinct: the robust pipeline
//! bounds against the nearest opposing candidates, the frequency pipeline
//! against the whole series (see [`crate::config::ProminenceStrategy`]).

use crate::types::Position;

/// Kind of a local extremum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtremumKind {
    Maximum,
    Minimum,
}

impl ExtremumKind {
    pub fn is_maximum(&self) -> bool {
        matches!(self, ExtremumKind::Maximum)
    }
}

/// A local extremum of the smoothed (or raw) series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtremumCandidate {
    /// Index into the series the candidate was extracted from
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub kind: ExtremumKind,
}

/// Find all strict local extrema of the x-channel.
///
/// A sample qualifies only when its x value is strictly above (maximum) or
/// strictly below (minimum) both immediate neighbors, so plateaus produce no
/// candidates. Endpoints lack two neighbors and are never candidates.
pub fn find_extrema(series: &[Position]) -> Vec<ExtremumCandidate> {
    let mut candidates = Vec::new();
    if series.len() < 3 {
        return candidates;
    }

    for i in 1..series.len() - 1 {
        let prev = series[i - 1].x;
        let curr = series[i].x;
        let next = series[i + 1].x;

        if curr > prev && curr > next {
            candidates.push(ExtremumCandidate {
                index: i,
                x: curr,
                y: series[i].y,
                kind: ExtremumKind::Maximum,
            });
        } else if curr < prev && curr < next {
            candidates.push(ExtremumCandidate {
                index: i,
                x: curr,
                y: series[i].y,
                kind: ExtremumKind::Minimum,
            });
        }
    }

    candidates
}

/// Prominence bounded by the nearest opposing candidates.
///
/// Looks for the closest earlier and later candidate of the opposite kind
/// within the candidate list. A side without an opposing candidate imposes
/// no bound; a candidate with no opposing candidate on either side stands
/// unchallenged and is treated as infinitely prominent.
pub fn local_prominence(candidates: &[ExtremumCandidate], idx: usize) -> f64 {
    let candidate = &candidates[idx];

    let left = candidates[..idx]
        .iter()
        .rev()
        .find(|c| c.kind != candidate.kind)
        .map(|c| c.x);
    let right = candidates[idx + 1..]
        .iter()
        .find(|c| c.kind != candidate.kind)
        .map(|c| c.x);

    match candidate.kind {
        ExtremumKind::Maximum => {
            let bound = match (left, right) {
                (Some(l), Some(r)) => l.max(r),
                (Some(l), None) => l,
                (None, Some(r)) => r,
                (None, None) => return f64::INFINITY,
            };
            candidate.x - bound
        }
        ExtremumKind::Minimum => {
            let bound = match (left, right) {
                (Some(l), Some(r)) => l.min(r),
                (Some(l), None) => l,
                (None, Some(r)) => r,
                (None, None) => return f64::INFINITY,
            };
            bound - candidate.x
        }
    }
}

/// Prominence bounded by the most extreme opposing value between the
/// extremum and each series boundary.
pub fn global_prominence(values: &[f64], index: usize, kind: ExtremumKind) -> f64 {
    let peak = values[index];

    match kind {
        ExtremumKind::Maximum => {
            let left = values[..index].iter().copied().fold(peak, f64::min);
            let right = values[index + 1..].iter().copied().fold(peak, f64::min);
            peak - left.max(right)
        }
        ExtremumKind::Minimum => {
            let left = values[..index].iter().copied().fold(peak, f64::max);
            let right = values[index + 1..].iter().copied().fold(peak, f64::max);
            left.min(right) - peak
        }
    }
}
