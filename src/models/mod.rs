//! Record and catalog domain models.
//!
//! - [`Student`]: identity, descriptive attributes, subject enrollment,
//!   grades with undo history, and the attendance log
//! - [`SubjectSlot`]: catalog entry placing a subject in the day
//!   (minutes since midnight) with a scheduling weight
//!
//! All models serialize with serde and round-trip losslessly through
//! the JSON store.

mod slot;
mod student;

pub use slot::{format_minutes, parse_hhmm, SubjectSlot};
pub use student::{AttendanceRecord, GradeEntry, Student};

pub(crate) use student::round2;
