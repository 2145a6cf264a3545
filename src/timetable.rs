//! Weighted interval scheduling for timetable construction.
//!
//! Given the time slots of a student's enrolled subjects, selects the
//! maximum-total-weight subset of non-overlapping slots.
//!
//! # Algorithm
//!
//! 1. Sort intervals ascending by end time.
//! 2. For each interval `j`, find `p(j)`: the rightmost earlier
//!    interval whose end does not pass `j`'s start (backward linear
//!    scan, O(n²) overall — accepted at timetable scale).
//! 3. DP over prefixes: `dp[j] = max(dp[j-1], w[j] + dp[p(j)])`,
//!    keeping an inclusion flag. Inclusion wins only on **strict**
//!    improvement, so exclusion takes ties.
//! 4. Walk the flags backward to reconstruct the chosen set, then
//!    reverse into chronological order.
//!
//! # Reference
//! Kleinberg & Tardos (2006), "Algorithm Design", Ch. 6.1

use crate::models::SubjectSlot;

/// One schedulable interval: a subject code bound to its catalog slot.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotInterval {
    /// Subject code.
    pub code: String,
    /// Start, minutes since midnight.
    pub start_min: u32,
    /// End, minutes since midnight (exclusive).
    pub end_min: u32,
    /// Scheduling weight.
    pub weight: f64,
}

impl SlotInterval {
    /// Binds a subject code to a catalog slot.
    pub fn from_slot(code: impl Into<String>, slot: &SubjectSlot) -> Self {
        Self {
            code: code.into(),
            start_min: slot.start_min,
            end_min: slot.end_min,
            weight: slot.weight,
        }
    }
}

/// Selects the maximum-weight non-overlapping subset of intervals.
///
/// Returns the chosen subject codes in chronological order. Empty
/// input yields an empty result, not an error.
pub fn optimize(mut intervals: Vec<SlotInterval>) -> Vec<String> {
    if intervals.is_empty() {
        return Vec::new();
    }
    intervals.sort_by_key(|iv| iv.end_min);
    let n = intervals.len();

    // p[j]: 1-based index of the last interval ending at or before
    // interval j's start; 0 when none exists.
    let mut p = vec![0usize; n];
    for j in 0..n {
        let start_j = intervals[j].start_min;
        for i in (0..j).rev() {
            if intervals[i].end_min <= start_j {
                p[j] = i + 1;
                break;
            }
        }
    }

    let mut dp = vec![0.0f64; n + 1];
    let mut keep = vec![false; n + 1];
    for j in 1..=n {
        let incl = intervals[j - 1].weight + dp[p[j - 1]];
        let excl = dp[j - 1];
        // Strict comparison: exclusion wins ties.
        if incl > excl {
            dp[j] = incl;
            keep[j] = true;
        } else {
            dp[j] = excl;
        }
    }

    let mut chosen = Vec::new();
    let mut j = n;
    while j > 0 {
        if keep[j] {
            chosen.push(intervals[j - 1].code.clone());
            j = p[j - 1];
        } else {
            j -= 1;
        }
    }
    chosen.reverse();
    chosen
}
