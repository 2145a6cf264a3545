//! Class representative selection.
//!
//! Greedy per-department top-K ranking: every student gets a weighted
//! score combining GPA (rescaled to a percentage) and overall
//! attendance rate; scores are bucketed by department and each bucket
//! keeps its best `max(1, k)` entries.
//!
//! Weight validation is the caller's responsibility (see
//! [`RankWeights::validate`]); selection itself never rejects input.

use std::collections::HashMap;

use crate::models::{round2, Student};
use crate::sort::mergesort;

/// Department label used when a record carries no department.
pub const UNASSIGNED_DEPARTMENT: &str = "-";

/// Weights for the representative score.
///
/// `score = alpha * (gpa / 4 * 100) + beta * attendance_rate`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankWeights {
    /// GPA weight.
    pub alpha: f64,
    /// Attendance weight.
    pub beta: f64,
}

impl RankWeights {
    /// Creates a weight pair.
    pub fn new(alpha: f64, beta: f64) -> Self {
        Self { alpha, beta }
    }

    /// Checks that both weights are non-negative and at least one is
    /// positive.
    ///
    /// # Errors
    /// [`crate::Error::Validation`] otherwise.
    pub fn validate(&self) -> crate::Result<()> {
        if self.alpha < 0.0 || self.beta < 0.0 || !self.alpha.is_finite() || !self.beta.is_finite()
        {
            return Err(crate::Error::Validation(
                "weights must be non-negative".into(),
            ));
        }
        if self.alpha + self.beta == 0.0 {
            return Err(crate::Error::Validation(
                "at least one weight must be > 0".into(),
            ));
        }
        Ok(())
    }
}

impl Default for RankWeights {
    /// The conventional 70/30 GPA/attendance split.
    fn default() -> Self {
        Self {
            alpha: 0.7,
            beta: 0.3,
        }
    }
}

/// A ranked representative candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Representative {
    /// Student identifier.
    pub student_id: String,
    /// Student name.
    pub name: String,
    /// GPA at selection time.
    pub gpa: f64,
    /// Overall attendance percentage at selection time.
    pub attendance_rate: f64,
    /// Weighted score, rounded to 2 decimals.
    pub score: f64,
}

/// Picks the top `max(1, top_per_dept)` students per department.
///
/// Buckets are sorted descending by score; ties preserve the input
/// order of the student sequence (stable sort, no further tie-break).
/// Students without a department fall into
/// [`UNASSIGNED_DEPARTMENT`].
pub fn choose_representatives<'a>(
    students: impl IntoIterator<Item = &'a Student>,
    top_per_dept: usize,
    weights: RankWeights,
) -> HashMap<String, Vec<Representative>> {
    let mut buckets: HashMap<String, Vec<Representative>> = HashMap::new();
    for student in students {
        let gpa = student.gpa();
        let attendance = student.attendance_rate();
        let score = round2(weights.alpha * (gpa / 4.0 * 100.0) + weights.beta * attendance);
        let dept = if student.department.trim().is_empty() {
            UNASSIGNED_DEPARTMENT.to_owned()
        } else {
            student.department.clone()
        };
        buckets.entry(dept).or_default().push(Representative {
            student_id: student.student_id.clone(),
            name: student.name.clone(),
            gpa,
            attendance_rate: attendance,
            score,
        });
    }

    let keep = top_per_dept.max(1);
    buckets
        .into_iter()
        .map(|(dept, bucket)| {
            // Stable ascending sort on the negated score = stable
            // descending on the score.
            let mut ranked = mergesort(&bucket, |r| -r.score);
            ranked.truncate(keep);
            (dept, ranked)
        })
        .collect()
}
