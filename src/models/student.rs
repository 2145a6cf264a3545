//! Student record model.
//!
//! A record owns its enrollment set, grade map, grade-undo history,
//! and attendance log. Enrollment is a prerequisite for recording a
//! grade or attendance entry, but dropping a subject later never
//! retroactively invalidates data already recorded for it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::collections::{normalize_code, Stack, SubjectSet};
use crate::error::{Error, Result};

/// One (subject, score) grade event, as pushed onto the undo history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeEntry {
    /// Normalized subject code.
    pub subject: String,
    /// Score in [0, 100].
    pub score: f64,
}

/// One attendance log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Calendar date, caller-formatted (e.g. `"2024-01-01"`).
    pub date: String,
    /// Normalized subject code.
    pub subject: String,
    /// Whether the student was present.
    pub present: bool,
}

/// A student record.
///
/// Identity (`student_id`) is globally unique and immutable after
/// creation; uniqueness is enforced by the registry, not here.
///
/// # Example
/// ```
/// use roster::models::Student;
///
/// let mut s = Student::new("S1", "Ada", "CS", "F", 2).unwrap();
/// s.enroll_subject("MATH").unwrap();
/// s.add_grade("math", 90.0).unwrap();
/// assert_eq!(s.gpa(), 3.6);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    /// Unique student identifier.
    pub student_id: String,
    /// Full name.
    pub name: String,
    /// Department label; may be empty.
    pub department: String,
    /// Gender label.
    pub gender: String,
    /// Study year, 1..=4.
    pub year: u8,
    /// Enrolled subject codes in enrollment order.
    #[serde(default)]
    pub subjects: SubjectSet,
    /// Subject code -> ordered score sequence.
    #[serde(default)]
    pub grades: BTreeMap<String, Vec<f64>>,
    /// Undo history mirroring the most recent grade additions.
    #[serde(default)]
    pub grade_history: Stack<GradeEntry>,
    /// Attendance log in recording order.
    #[serde(default)]
    pub attendance_log: Vec<AttendanceRecord>,
}

/// Rounds to two decimal places.
pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

impl Student {
    /// Creates a record.
    ///
    /// # Errors
    /// [`Error::Validation`] if `year` is outside 1..=4.
    pub fn new(
        student_id: impl Into<String>,
        name: impl Into<String>,
        department: impl Into<String>,
        gender: impl Into<String>,
        year: u8,
    ) -> Result<Self> {
        if !(1..=4).contains(&year) {
            return Err(Error::validation("year must be 1..4"));
        }
        Ok(Self {
            student_id: student_id.into(),
            name: name.into(),
            department: department.into(),
            gender: gender.into(),
            year,
            subjects: SubjectSet::new(),
            grades: BTreeMap::new(),
            grade_history: Stack::new(),
            attendance_log: Vec::new(),
        })
    }

    /// Enrolls the student in a subject.
    ///
    /// # Errors
    /// [`Error::DuplicateKey`] if already enrolled.
    pub fn enroll_subject(&mut self, code: &str) -> Result<()> {
        self.subjects.insert(code)
    }

    /// Drops a subject from the enrollment set.
    ///
    /// Grades and attendance already recorded for the subject remain.
    ///
    /// # Errors
    /// [`Error::NotFound`] if not enrolled.
    pub fn drop_subject(&mut self, code: &str) -> Result<()> {
        self.subjects.remove(code)
    }

    /// Records a score for an enrolled subject and pushes it onto the
    /// undo history.
    ///
    /// # Errors
    /// [`Error::NotFound`] if not enrolled in the subject;
    /// [`Error::Validation`] if the score is outside [0, 100].
    pub fn add_grade(&mut self, subject: &str, score: f64) -> Result<()> {
        let subject = normalize_code(subject);
        if !self.subjects.contains(&subject) {
            return Err(Error::not_found("enrollment", subject));
        }
        if !(0.0..=100.0).contains(&score) {
            return Err(Error::validation("score must be 0..100"));
        }
        self.grades.entry(subject.clone()).or_default().push(score);
        self.grade_history.push(GradeEntry { subject, score });
        Ok(())
    }

    /// Undoes the most recent grade addition.
    ///
    /// Pops the top history entry and removes the subject's trailing
    /// score only if it still equals the popped score. If the score
    /// sequence was mutated out of band since the push, the pop still
    /// consumes the history entry without removing a score; this no-op
    /// is defined behavior, not an error.
    ///
    /// # Errors
    /// [`Error::EmptyStructure`] if there is no grade to undo.
    pub fn undo_last_grade(&mut self) -> Result<()> {
        let entry = self.grade_history.pop()?;
        if let Some(scores) = self.grades.get_mut(&entry.subject) {
            if scores.last() == Some(&entry.score) {
                scores.pop();
            }
        }
        Ok(())
    }

    /// Appends an attendance entry for an enrolled subject.
    ///
    /// # Errors
    /// [`Error::NotFound`] if not enrolled in the subject.
    pub fn record_attendance(&mut self, date: &str, subject: &str, present: bool) -> Result<()> {
        let subject = normalize_code(subject);
        if !self.subjects.contains(&subject) {
            return Err(Error::not_found("enrollment", subject));
        }
        self.attendance_log.push(AttendanceRecord {
            date: date.to_owned(),
            subject,
            present,
        });
        Ok(())
    }

    /// Grade point average on a 4.0 scale, rounded to 2 decimals.
    ///
    /// Per-subject score averages are averaged, rescaled from a 0-100
    /// percentage to 0-4. Subjects with no scores are ignored;
    /// no grades at all yields 0.0.
    pub fn gpa(&self) -> f64 {
        let averages: Vec<f64> = self
            .grades
            .values()
            .filter(|scores| !scores.is_empty())
            .map(|scores| scores.iter().sum::<f64>() / scores.len() as f64)
            .collect();
        if averages.is_empty() {
            return 0.0;
        }
        let pct = averages.iter().sum::<f64>() / averages.len() as f64;
        round2(pct / 100.0 * 4.0)
    }

    /// Percentage of logged attendance marked present across all
    /// subjects, rounded to 2 decimals. 0.0 with no log.
    pub fn attendance_rate(&self) -> f64 {
        rate(self.attendance_log.iter())
    }

    /// Attendance percentage for one subject. 0.0 with no entries.
    pub fn subject_attendance_rate(&self, subject: &str) -> f64 {
        let subject = normalize_code(subject);
        rate(self
            .attendance_log
            .iter()
            .filter(|r| r.subject == subject))
    }
}

fn rate<'a>(entries: impl Iterator<Item = &'a AttendanceRecord>) -> f64 {
    let mut total = 0usize;
    let mut present = 0usize;
    for entry in entries {
        total += 1;
        if entry.present {
            present += 1;
        }
    }
    if total == 0 {
        return 0.0;
    }
    round2(100.0 * present as f64 / total as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student() -> Student {
        Student::new("S1", "Ada", "CS", "F", 2).unwrap()
    }

    #[test]
    fn test_year_validation() {
        assert!(Student::new("S1", "A", "CS", "F", 0).is_err());
        assert!(Student::new("S1", "A", "CS", "F", 5).is_err());
        assert!(Student::new("S1", "A", "CS", "F", 1).is_ok());
        assert!(Student::new("S1", "A", "CS", "F", 4).is_ok());
    }

    #[test]
    fn test_enroll_and_drop() {
        let mut s = student();
        s.enroll_subject("math").unwrap();
        assert!(s.subjects.contains("MATH"));
        assert!(matches!(
            s.enroll_subject(" MATH ").unwrap_err(),
            Error::DuplicateKey { .. }
        ));
        s.drop_subject("Math").unwrap();
        assert!(!s.subjects.contains("MATH"));
        assert!(matches!(
            s.drop_subject("MATH").unwrap_err(),
            Error::NotFound { .. }
        ));
    }

    #[test]
    fn test_add_grade_requires_enrollment() {
        let mut s = student();
        assert!(matches!(
            s.add_grade("MATH", 90.0).unwrap_err(),
            Error::NotFound { .. }
        ));
        s.enroll_subject("MATH").unwrap();
        s.add_grade("math", 90.0).unwrap();
        assert_eq!(s.grades["MATH"], vec![90.0]);
        assert_eq!(s.grade_history.len(), 1);
    }

    #[test]
    fn test_grade_score_range() {
        let mut s = student();
        s.enroll_subject("MATH").unwrap();
        assert!(s.add_grade("MATH", -1.0).is_err());
        assert!(s.add_grade("MATH", 100.5).is_err());
        assert!(s.add_grade("MATH", 0.0).is_ok());
        assert!(s.add_grade("MATH", 100.0).is_ok());
    }

    #[test]
    fn test_undo_removes_trailing_score() {
        let mut s = student();
        s.enroll_subject("MATH").unwrap();
        s.add_grade("MATH", 90.0).unwrap();
        s.undo_last_grade().unwrap();
        assert!(s.grades["MATH"].is_empty());
        assert!(matches!(
            s.undo_last_grade().unwrap_err(),
            Error::EmptyStructure(_)
        ));
    }

    #[test]
    fn test_undo_out_of_band_mutation_is_noop() {
        let mut s = student();
        s.enroll_subject("MATH").unwrap();
        s.add_grade("MATH", 90.0).unwrap();
        // Mutate the score list behind the history's back.
        s.grades.get_mut("MATH").unwrap().push(70.0);
        s.undo_last_grade().unwrap();
        // History entry consumed, but no score removed: the trailing
        // score (70) no longer matched the popped one (90).
        assert_eq!(s.grades["MATH"], vec![90.0, 70.0]);
        assert!(s.grade_history.is_empty());
    }

    #[test]
    fn test_undo_order_is_lifo() {
        let mut s = student();
        s.enroll_subject("MATH").unwrap();
        s.enroll_subject("PHY").unwrap();
        s.add_grade("MATH", 80.0).unwrap();
        s.add_grade("PHY", 60.0).unwrap();
        s.undo_last_grade().unwrap();
        assert_eq!(s.grades["MATH"], vec![80.0]);
        assert!(s.grades["PHY"].is_empty());
    }

    #[test]
    fn test_drop_keeps_recorded_data() {
        let mut s = student();
        s.enroll_subject("MATH").unwrap();
        s.add_grade("MATH", 85.0).unwrap();
        s.record_attendance("2024-01-01", "MATH", true).unwrap();
        s.drop_subject("MATH").unwrap();
        assert_eq!(s.grades["MATH"], vec![85.0]);
        assert_eq!(s.attendance_log.len(), 1);
        // But new recordings against the dropped subject fail.
        assert!(s.add_grade("MATH", 70.0).is_err());
        assert!(s.record_attendance("2024-01-02", "MATH", true).is_err());
    }

    #[test]
    fn test_gpa_example() {
        // {MATH: [80, 90], PHYS: [70]} -> averages [85, 70] -> 77.5% -> 3.10
        let mut s = student();
        s.enroll_subject("MATH").unwrap();
        s.enroll_subject("PHYS").unwrap();
        s.add_grade("MATH", 80.0).unwrap();
        s.add_grade("MATH", 90.0).unwrap();
        s.add_grade("PHYS", 70.0).unwrap();
        assert!((s.gpa() - 3.10).abs() < 1e-9);
    }

    #[test]
    fn test_gpa_no_grades() {
        let s = student();
        assert_eq!(s.gpa(), 0.0);
    }

    #[test]
    fn test_attendance_rates() {
        let mut s = student();
        s.enroll_subject("MATH").unwrap();
        s.enroll_subject("PHY").unwrap();
        s.record_attendance("d1", "MATH", true).unwrap();
        s.record_attendance("d2", "MATH", false).unwrap();
        s.record_attendance("d3", "PHY", true).unwrap();
        assert!((s.attendance_rate() - 66.67).abs() < 1e-9);
        assert!((s.subject_attendance_rate("math") - 50.0).abs() < 1e-9);
        assert!((s.subject_attendance_rate("PHY") - 100.0).abs() < 1e-9);
        assert_eq!(s.subject_attendance_rate("CHEM"), 0.0);
    }

    #[test]
    fn test_attendance_rate_empty() {
        let s = student();
        assert_eq!(s.attendance_rate(), 0.0);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut s = student();
        s.enroll_subject("MATH").unwrap();
        s.enroll_subject("PHY").unwrap();
        s.add_grade("MATH", 90.0).unwrap();
        s.record_attendance("2024-01-01", "PHY", true).unwrap();

        let json = serde_json::to_string(&s).unwrap();
        let mut restored: Student = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.student_id, "S1");
        assert_eq!(restored.subjects.to_vec(), vec!["MATH", "PHY"]);
        assert_eq!(restored.grades["MATH"], vec![90.0]);
        assert_eq!(restored.attendance_log, s.attendance_log);
        // History survives: undo still works after a round trip.
        restored.undo_last_grade().unwrap();
        assert!(restored.grades["MATH"].is_empty());
    }
}
