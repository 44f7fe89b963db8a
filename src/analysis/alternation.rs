//! Alternation Enforcement
//!
//! Collapses same-kind runs of filtered candidates so the final sequence
//! strictly interleaves maxima and minima. This is the core correctness
//! invariant of the detection engine.

use super::extrema::{ExtremumCandidate, ExtremumKind};

/// Reduce a candidate sequence to one that strictly alternates kind.
///
/// Scans in index order. A candidate of a new kind is kept; a candidate
/// repeating the last kept kind replaces its predecessor only when it is
/// strictly more extreme (higher x for a maximum run, lower x for a minimum
/// run) and is discarded otherwise.
pub fn enforce_alternation(candidates: &[ExtremumCandidate]) -> Vec<ExtremumCandidate> {
    let mut kept: Vec<ExtremumCandidate> = Vec::new();

    for candidate in candidates {
        match kept.last() {
            Some(last) if last.kind == candidate.kind => {
                let more_extreme = match candidate.kind {
                    ExtremumKind::Maximum => candidate.x > last.x,
                    ExtremumKind::Minimum => candidate.x < last.x,
                };
                if more_extreme {
                    *kept.last_mut().expect("run has a last element") = *candidate;
                }
            }
            _ => kept.push(*candidate),
        }
    }

    kept
}
