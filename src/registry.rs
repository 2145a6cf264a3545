//! Registry: orchestration over the student record collection.
//!
//! Owns the primary record storage (an insertion-ordered arena), the
//! student-ID index tree, the deferred attendance ingest queue, and the
//! subject slot catalog. All querying, ranking, and optimization
//! operations go through here.
//!
//! # Ownership
//! Records live in one place: the arena. The index tree maps student
//! IDs to arena slot numbers, never to record copies, so index and
//! arena can never diverge on mutation. Removal clears the slot and
//! deletes the index key; slot numbers are stable for a record's
//! lifetime.
//!
//! # Concurrency
//! Single-threaded by contract. Nothing here is internally
//! synchronized; concurrent callers must serialize externally.

use std::collections::{BTreeMap, HashMap};

use tracing::warn;

use crate::collections::{normalize_code, IndexTree, Queue};
use crate::error::{Error, Result};
use crate::models::{Student, SubjectSlot};
use crate::select::{self, RankWeights, Representative};
use crate::sort::{binary_search, mergesort};
use crate::timetable::{self, SlotInterval};

/// A staged attendance event awaiting batch application.
#[derive(Debug, Clone)]
pub struct AttendanceEvent {
    /// Target student ID.
    pub student_id: String,
    /// Calendar date; empty means "use the drain's fallback date".
    pub date: String,
    /// Subject code (normalized on application).
    pub subject: String,
    /// Present flag.
    pub present: bool,
}

/// One skipped entry from an attendance drain.
#[derive(Debug, Clone)]
pub struct IngestFailure {
    /// Student ID the event referenced.
    pub student_id: String,
    /// Subject code the event referenced.
    pub subject: String,
    /// Why the entry was skipped.
    pub reason: String,
}

/// Outcome of draining the attendance queue.
///
/// Per-entry failures are non-fatal: they are collected here (and
/// logged) while processing continues, so the queue is always empty
/// after a drain.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Entries successfully applied.
    pub applied: usize,
    /// Entries skipped, in processing order.
    pub failures: Vec<IngestFailure>,
}

/// The student record registry.
///
/// # Example
/// ```
/// use roster::registry::Registry;
/// use roster::models::Student;
///
/// let mut reg = Registry::new();
/// reg.add_student(Student::new("S1", "Ada", "CS", "F", 2).unwrap()).unwrap();
/// assert_eq!(reg.get("S1").unwrap().name, "Ada");
/// ```
#[derive(Default)]
pub struct Registry {
    // Insertion-ordered arena; removal leaves a hole so index slot
    // numbers stay valid.
    records: Vec<Option<Student>>,
    index: IndexTree<String, usize>,
    ingest: Queue<AttendanceEvent>,
    catalog: BTreeMap<String, SubjectSlot>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the registry holds no records.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Adds a record.
    ///
    /// # Errors
    /// [`Error::DuplicateKey`] if the student ID already exists.
    pub fn add_student(&mut self, student: Student) -> Result<()> {
        if self.index.get(&student.student_id).is_some() {
            return Err(Error::duplicate("student", student.student_id));
        }
        let id = student.student_id.clone();
        let slot = self.records.len();
        self.records.push(Some(student));
        self.index.insert(id, slot);
        Ok(())
    }

    /// Looks up a record by student ID via the index.
    pub fn get(&self, student_id: &str) -> Option<&Student> {
        let slot = *self.index.get(student_id)?;
        self.records.get(slot)?.as_ref()
    }

    /// Mutable lookup by student ID.
    pub fn get_mut(&mut self, student_id: &str) -> Option<&mut Student> {
        let slot = *self.index.get(student_id)?;
        self.records.get_mut(slot)?.as_mut()
    }

    /// Removes a record.
    ///
    /// # Errors
    /// [`Error::NotFound`] if the student ID is unknown.
    pub fn remove_student(&mut self, student_id: &str) -> Result<()> {
        let slot = self
            .index
            .remove(student_id)
            .ok_or_else(|| Error::not_found("student", student_id))?;
        if let Some(record) = self.records.get_mut(slot) {
            *record = None;
        }
        Ok(())
    }

    /// Iterates live records in insertion order.
    pub fn students(&self) -> impl Iterator<Item = &Student> {
        self.records.iter().filter_map(Option::as_ref)
    }

    /// Records sorted by name (case-insensitive), stable merge sort.
    pub fn sorted_by_name(&self) -> Vec<&Student> {
        let students: Vec<&Student> = self.students().collect();
        mergesort(&students, |s| s.name.to_lowercase())
    }

    /// Records sorted ascending by student ID, realized from an
    /// in-order index traversal.
    pub fn sorted_by_id(&self) -> Vec<&Student> {
        self.index
            .iter()
            .filter_map(|(_, &slot)| self.records.get(slot)?.as_ref())
            .collect()
    }

    /// Records sorted by GPA.
    ///
    /// Ascending by default; `descending` reverses the sorted output,
    /// so equal-GPA records appear in reverse input order.
    pub fn sorted_by_gpa(&self, descending: bool) -> Vec<&Student> {
        let students: Vec<&Student> = self.students().collect();
        let sorted = mergesort(&students, |s| s.gpa());
        if descending {
            sorted.into_iter().rev().collect()
        } else {
            sorted
        }
    }

    /// Finds all records whose name matches (case-insensitive).
    ///
    /// Sorts by name, binary-searches to the first match, then scans
    /// forward through the run of equal names.
    pub fn find_by_name(&self, name: &str) -> Vec<&Student> {
        let target = name.trim().to_lowercase();
        let students: Vec<&Student> = self.students().collect();
        let sorted = mergesort(&students, |s| s.name.to_lowercase());
        let Some(first) = binary_search(&sorted, &target, |s| s.name.to_lowercase()) else {
            return Vec::new();
        };
        sorted[first..]
            .iter()
            .take_while(|s| s.name.to_lowercase() == target)
            .copied()
            .collect()
    }

    // ===== Attendance ingest =====

    /// Stages an attendance event for a later drain.
    pub fn enqueue_attendance(&mut self, student_id: &str, date: &str, subject: &str, present: bool) {
        self.ingest.enqueue(AttendanceEvent {
            student_id: student_id.to_owned(),
            date: date.to_owned(),
            subject: subject.to_owned(),
            present,
        });
    }

    /// Number of staged attendance events.
    pub fn pending_attendance(&self) -> usize {
        self.ingest.len()
    }

    /// Drains the attendance queue in FIFO order.
    ///
    /// Each event resolves its student through the index and records
    /// the attendance entry. Unknown students and unenrolled subjects
    /// skip that single event (logged and reported in the returned
    /// [`IngestReport`]); processing continues, and failures are
    /// consumed rather than retried. Events with an empty date use the
    /// caller-supplied `fallback_date`.
    pub fn process_attendance(&mut self, fallback_date: &str) -> IngestReport {
        let mut report = IngestReport::default();
        while let Ok(event) = self.ingest.dequeue() {
            let Some(student) = self.get_mut(&event.student_id) else {
                warn!(student_id = %event.student_id, "skipping attendance for unknown student");
                report.failures.push(IngestFailure {
                    student_id: event.student_id,
                    subject: event.subject,
                    reason: "unknown student".to_owned(),
                });
                continue;
            };
            let date = if event.date.is_empty() {
                fallback_date
            } else {
                &event.date
            };
            match student.record_attendance(date, &event.subject, event.present) {
                Ok(()) => report.applied += 1,
                Err(err) => {
                    warn!(
                        student_id = %event.student_id,
                        subject = %event.subject,
                        error = %err,
                        "skipping attendance entry"
                    );
                    report.failures.push(IngestFailure {
                        student_id: event.student_id,
                        subject: event.subject,
                        reason: err.to_string(),
                    });
                }
            }
        }
        report
    }

    // ===== Subject slot catalog =====

    /// Creates or updates a catalog slot for a subject.
    ///
    /// # Errors
    /// [`Error::Validation`] on an empty code, a non-positive interval,
    /// or a negative weight.
    pub fn set_subject_slot(
        &mut self,
        code: &str,
        start_min: u32,
        end_min: u32,
        weight: f64,
    ) -> Result<()> {
        let code = normalize_code(code);
        if code.is_empty() {
            return Err(Error::validation("subject code must not be empty"));
        }
        let slot = SubjectSlot::new(start_min, end_min, weight)?;
        self.catalog.insert(code, slot);
        Ok(())
    }

    /// Looks up a subject's catalog slot.
    pub fn subject_slot(&self, code: &str) -> Option<&SubjectSlot> {
        self.catalog.get(&normalize_code(code))
    }

    /// The full slot catalog, keyed by subject code.
    pub fn subject_slots(&self) -> &BTreeMap<String, SubjectSlot> {
        &self.catalog
    }

    /// Replaces the whole catalog (used when restoring from storage).
    pub fn set_catalog(&mut self, catalog: BTreeMap<String, SubjectSlot>) {
        self.catalog = catalog;
    }

    // ===== Ranking and optimization =====

    /// Picks per-department class representatives.
    ///
    /// # Errors
    /// [`Error::Validation`] if the weights are negative or both zero.
    pub fn choose_representatives(
        &self,
        top_per_dept: usize,
        weights: RankWeights,
    ) -> Result<HashMap<String, Vec<Representative>>> {
        weights.validate()?;
        Ok(select::choose_representatives(
            self.students(),
            top_per_dept,
            weights,
        ))
    }

    /// Builds the maximum-weight non-overlapping timetable for one
    /// student's enrolled subjects.
    ///
    /// Subjects without a catalog slot are silently excluded; an empty
    /// enrollment-catalog intersection yields an empty timetable.
    ///
    /// # Errors
    /// [`Error::NotFound`] for an unknown student ID.
    pub fn optimize_timetable_for(&self, student_id: &str) -> Result<Vec<String>> {
        let student = self
            .get(student_id)
            .ok_or_else(|| Error::not_found("student", student_id))?;
        let intervals: Vec<SlotInterval> = student
            .subjects
            .iter()
            .filter_map(|code| {
                self.catalog
                    .get(code)
                    .map(|slot| SlotInterval::from_slot(code, slot))
            })
            .collect();
        Ok(timetable::optimize(intervals))
    }

    // ===== Snapshot restore =====

    /// Rebuilds the record set from snapshots.
    ///
    /// Snapshots are added in order; one that collides on student ID
    /// is skipped with a warning rather than failing the whole
    /// restore. The ingest queue and catalog are left untouched.
    pub fn replace_all(&mut self, snapshots: Vec<Student>) {
        self.records.clear();
        self.index = IndexTree::new();
        for student in snapshots {
            let id = student.student_id.clone();
            if let Err(err) = self.add_student(student) {
                warn!(student_id = %id, error = %err, "skipping record snapshot");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: &str, name: &str, dept: &str) -> Student {
        Student::new(id, name, dept, "-", 1).unwrap()
    }

    fn registry_with(ids: &[&str]) -> Registry {
        let mut reg = Registry::new();
        for &id in ids {
            reg.add_student(student(id, id, "CS")).unwrap();
        }
        reg
    }

    #[test]
    fn test_add_and_get() {
        let mut reg = Registry::new();
        reg.add_student(student("S1", "Ada", "CS")).unwrap();
        assert_eq!(reg.get("S1").unwrap().name, "Ada");
        assert!(reg.get("S2").is_none());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut reg = registry_with(&["S1"]);
        let err = reg.add_student(student("S1", "Other", "EE")).unwrap_err();
        assert!(matches!(err, Error::DuplicateKey { .. }));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_remove_student() {
        let mut reg = registry_with(&["S1", "S2", "S3"]);
        reg.remove_student("S2").unwrap();
        assert_eq!(reg.len(), 2);
        assert!(reg.get("S2").is_none());
        assert!(reg.get("S1").is_some());
        assert!(matches!(
            reg.remove_student("S2").unwrap_err(),
            Error::NotFound { .. }
        ));
        // Insertion order survives removal.
        let ids: Vec<&str> = reg.students().map(|s| s.student_id.as_str()).collect();
        assert_eq!(ids, vec!["S1", "S3"]);
    }

    #[test]
    fn test_reuse_id_after_removal() {
        let mut reg = registry_with(&["S1"]);
        reg.remove_student("S1").unwrap();
        reg.add_student(student("S1", "again", "CS")).unwrap();
        assert_eq!(reg.get("S1").unwrap().name, "again");
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_sorted_by_id_uses_index_order() {
        let mut reg = Registry::new();
        for id in ["S3", "S1", "S2"] {
            reg.add_student(student(id, id, "CS")).unwrap();
        }
        let ids: Vec<&str> = reg.sorted_by_id().iter().map(|s| s.student_id.as_str()).collect();
        assert_eq!(ids, vec!["S1", "S2", "S3"]);
    }

    #[test]
    fn test_sorted_by_name_case_insensitive() {
        let mut reg = Registry::new();
        reg.add_student(student("S1", "charlie", "CS")).unwrap();
        reg.add_student(student("S2", "Alice", "CS")).unwrap();
        reg.add_student(student("S3", "bob", "CS")).unwrap();
        let names: Vec<&str> = reg.sorted_by_name().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "bob", "charlie"]);
    }

    #[test]
    fn test_sorted_by_gpa_descending() {
        let mut reg = Registry::new();
        for (id, score) in [("S1", 60.0), ("S2", 90.0), ("S3", 75.0)] {
            let mut s = student(id, id, "CS");
            s.enroll_subject("MATH").unwrap();
            s.add_grade("MATH", score).unwrap();
            reg.add_student(s).unwrap();
        }
        let ids: Vec<&str> = reg
            .sorted_by_gpa(true)
            .iter()
            .map(|s| s.student_id.as_str())
            .collect();
        assert_eq!(ids, vec!["S2", "S3", "S1"]);
    }

    #[test]
    fn test_find_by_name_collects_run() {
        let mut reg = Registry::new();
        reg.add_student(student("S1", "Kim", "CS")).unwrap();
        reg.add_student(student("S2", "kim", "EE")).unwrap();
        reg.add_student(student("S3", "Lee", "CS")).unwrap();

        let hits = reg.find_by_name("KIM");
        assert_eq!(hits.len(), 2);
        assert!(reg.find_by_name("Park").is_empty());
    }

    #[test]
    fn test_process_attendance_applies_valid_entries() {
        let mut reg = Registry::new();
        let mut s = student("S1", "Ada", "CS");
        s.enroll_subject("MATH").unwrap();
        reg.add_student(s).unwrap();

        reg.enqueue_attendance("S1", "2024-01-01", "MATH", true);
        assert_eq!(reg.pending_attendance(), 1);

        let report = reg.process_attendance("2024-06-01");
        assert_eq!(report.applied, 1);
        assert!(report.failures.is_empty());
        assert_eq!(reg.pending_attendance(), 0);

        let log = &reg.get("S1").unwrap().attendance_log;
        assert_eq!(log.len(), 1);
        assert!(log[0].present);
        assert_eq!(log[0].date, "2024-01-01");
    }

    #[test]
    fn test_process_attendance_skips_unknown_student() {
        let mut reg = Registry::new();
        let mut s = student("S1", "Ada", "CS");
        s.enroll_subject("MATH").unwrap();
        reg.add_student(s).unwrap();

        reg.enqueue_attendance("S999", "2024-01-01", "MATH", true);
        reg.enqueue_attendance("S1", "2024-01-01", "MATH", true);

        let report = reg.process_attendance("2024-06-01");
        assert_eq!(report.applied, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].student_id, "S999");
        assert_eq!(report.failures[0].reason, "unknown student");
        assert_eq!(reg.pending_attendance(), 0);
    }

    #[test]
    fn test_process_attendance_skips_unenrolled_subject() {
        let mut reg = registry_with(&["S1"]);
        reg.enqueue_attendance("S1", "2024-01-01", "MATH", true);
        let report = reg.process_attendance("2024-06-01");
        assert_eq!(report.applied, 0);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].reason.contains("not found"));
        // Queue is empty even though every entry failed.
        assert_eq!(reg.pending_attendance(), 0);
    }

    #[test]
    fn test_process_attendance_fallback_date() {
        let mut reg = Registry::new();
        let mut s = student("S1", "Ada", "CS");
        s.enroll_subject("MATH").unwrap();
        reg.add_student(s).unwrap();

        reg.enqueue_attendance("S1", "", "MATH", false);
        let report = reg.process_attendance("2024-06-01");
        assert_eq!(report.applied, 1);
        assert_eq!(reg.get("S1").unwrap().attendance_log[0].date, "2024-06-01");
    }

    #[test]
    fn test_catalog_set_and_get() {
        let mut reg = Registry::new();
        reg.set_subject_slot(" math ", 540, 600, 2.0).unwrap();
        let slot = reg.subject_slot("MATH").unwrap();
        assert_eq!(slot.start_min, 540);
        assert_eq!(slot.end_min, 600);

        // Update in place.
        reg.set_subject_slot("MATH", 600, 660, 3.0).unwrap();
        assert_eq!(reg.subject_slot("math").unwrap().start_min, 600);
        assert_eq!(reg.subject_slots().len(), 1);
    }

    #[test]
    fn test_catalog_validation() {
        let mut reg = Registry::new();
        assert!(reg.set_subject_slot("MATH", 600, 600, 1.0).is_err());
        assert!(reg.set_subject_slot("MATH", 0, 60, -1.0).is_err());
        assert!(reg.set_subject_slot("   ", 0, 60, 1.0).is_err());
    }

    #[test]
    fn test_choose_representatives_validates_weights() {
        let reg = registry_with(&["S1"]);
        assert!(reg
            .choose_representatives(1, RankWeights::new(0.0, 0.0))
            .is_err());
        assert!(reg
            .choose_representatives(1, RankWeights::default())
            .is_ok());
    }

    #[test]
    fn test_optimize_timetable_reference_case() {
        let mut reg = Registry::new();
        let mut s = student("S1", "Ada", "CS");
        for code in ["MATH", "PHY", "CHEM"] {
            s.enroll_subject(code).unwrap();
        }
        reg.add_student(s).unwrap();
        reg.set_subject_slot("MATH", 0, 60, 5.0).unwrap();
        reg.set_subject_slot("PHY", 60, 120, 6.0).unwrap();
        reg.set_subject_slot("CHEM", 30, 90, 8.0).unwrap();

        let chosen = reg.optimize_timetable_for("S1").unwrap();
        assert_eq!(chosen, vec!["MATH", "PHY"]);
    }

    #[test]
    fn test_optimize_timetable_excludes_uncataloged() {
        let mut reg = Registry::new();
        let mut s = student("S1", "Ada", "CS");
        s.enroll_subject("MATH").unwrap();
        s.enroll_subject("ART").unwrap(); // no catalog slot
        reg.add_student(s).unwrap();
        reg.set_subject_slot("MATH", 0, 60, 1.0).unwrap();

        assert_eq!(reg.optimize_timetable_for("S1").unwrap(), vec!["MATH"]);
    }

    #[test]
    fn test_optimize_timetable_empty_intersection() {
        let mut reg = registry_with(&["S1"]);
        reg.set_subject_slot("MATH", 0, 60, 1.0).unwrap();
        assert!(reg.optimize_timetable_for("S1").unwrap().is_empty());
    }

    #[test]
    fn test_optimize_timetable_unknown_student() {
        let reg = Registry::new();
        assert!(matches!(
            reg.optimize_timetable_for("S1").unwrap_err(),
            Error::NotFound { .. }
        ));
    }

    #[test]
    fn test_replace_all_skips_duplicate_snapshots() {
        let mut reg = registry_with(&["OLD"]);
        let snapshots = vec![
            student("S1", "Ada", "CS"),
            student("S1", "Imposter", "EE"),
            student("S2", "Bob", "CS"),
        ];
        reg.replace_all(snapshots);
        assert_eq!(reg.len(), 2);
        assert!(reg.get("OLD").is_none());
        assert_eq!(reg.get("S1").unwrap().name, "Ada");
    }

    #[test]
    fn test_index_matches_arena_after_mutations() {
        let mut reg = Registry::new();
        for i in 0..10 {
            reg.add_student(student(&format!("S{i}"), "x", "CS")).unwrap();
        }
        for i in (0..10).step_by(2) {
            reg.remove_student(&format!("S{i}")).unwrap();
        }
        assert_eq!(reg.len(), 5);
        // Every indexed ID resolves to a live record with the same ID.
        for s in reg.sorted_by_id() {
            assert_eq!(reg.get(&s.student_id).unwrap().student_id, s.student_id);
        }
    }

    #[test]
    fn test_mutation_through_get_mut_is_visible_everywhere() {
        let mut reg = registry_with(&["S1"]);
        reg.get_mut("S1").unwrap().enroll_subject("MATH").unwrap();
        // Arena iteration and index lookup see the same record.
        assert!(reg.students().next().unwrap().subjects.contains("MATH"));
        assert!(reg.get("S1").unwrap().subjects.contains("MATH"));
    }
}
