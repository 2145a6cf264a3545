//! Student record keeping built on classic data structures.
//!
//! Keeps per-student grade and attendance state, indexes records by ID,
//! and layers a few textbook algorithms on top: stable sorting, duplicate
//! aware binary search, department representative selection, and weighted
//! interval scheduling for personal timetables.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Student`, `GradeEntry`, `AttendanceRecord`,
//!   `SubjectSlot`
//! - **`collections`**: Backing structures — `SubjectSet`, `Stack`, `Queue`,
//!   `IndexTree`
//! - **`sort`**: Merge sort, quicksort, and first-occurrence binary search
//! - **`select`**: Weighted ranking of department representatives
//! - **`timetable`**: Weighted interval scheduling over subject slots
//! - **`registry`**: The record set — arena storage plus the ID index
//! - **`store`**: JSON file persistence with corrupt-file quarantine
//!
//! # Example
//!
//! ```
//! use roster::{Registry, Student};
//!
//! let mut registry = Registry::new();
//! registry.add_student(Student::new("S1", "Ada", "CS", "F", 2)?)?;
//! let student = registry.get_mut("S1").unwrap();
//! student.enroll_subject("MATH")?;
//! student.add_grade("MATH", 90.0)?;
//! assert_eq!(registry.get("S1").unwrap().gpa(), 3.6);
//! # Ok::<(), roster::Error>(())
//! ```
//!
//! # References
//!
//! - Cormen et al. (2009), "Introduction to Algorithms"
//! - Kleinberg & Tardos (2005), "Algorithm Design" (weighted interval scheduling)

pub mod collections;
pub mod error;
pub mod models;
pub mod registry;
pub mod select;
pub mod sort;
pub mod store;
pub mod timetable;

pub use error::{Error, Result};
pub use models::{Student, SubjectSlot};
pub use registry::Registry;
pub use select::{RankWeights, Representative};
pub use store::JsonStore;
