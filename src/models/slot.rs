//! Subject time slot model.
//!
//! A catalog entry places a subject in the day as a half-open interval
//! of minutes since midnight, with a non-negative scheduling weight.
//! Slots live independently of any student record and are read-only
//! from the timetable optimizer's perspective.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A subject's scheduled time slot.
///
/// `end_min` must be strictly greater than `start_min`; construction
/// enforces this along with a non-negative weight.
///
/// # Example
/// ```
/// use roster::models::SubjectSlot;
///
/// let slot = SubjectSlot::new(9 * 60, 10 * 60, 1.5).unwrap();
/// assert_eq!(slot.duration_min(), 60);
/// assert!(SubjectSlot::new(600, 600, 1.0).is_err()); // zero length
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectSlot {
    /// Slot start, minutes since midnight.
    #[serde(rename = "start")]
    pub start_min: u32,
    /// Slot end, minutes since midnight (exclusive, > start).
    #[serde(rename = "end")]
    pub end_min: u32,
    /// Scheduling weight (importance), >= 0. Defaults to 1.0.
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl SubjectSlot {
    /// Creates a slot, validating the interval and weight.
    ///
    /// # Errors
    /// [`Error::Validation`] unless `end_min > start_min` and
    /// `weight >= 0`.
    pub fn new(start_min: u32, end_min: u32, weight: f64) -> Result<Self> {
        if end_min <= start_min {
            return Err(Error::validation("end must be after start"));
        }
        if weight < 0.0 || !weight.is_finite() {
            return Err(Error::validation("weight must be non-negative"));
        }
        Ok(Self {
            start_min,
            end_min,
            weight,
        })
    }

    /// Slot length in minutes.
    #[inline]
    pub fn duration_min(&self) -> u32 {
        self.end_min - self.start_min
    }

    /// Whether two slots overlap in time.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_min < other.end_min && other.start_min < self.end_min
    }
}

/// Parses an `HH:MM` string into minutes since midnight.
///
/// # Errors
/// [`Error::Validation`] on a missing colon, non-numeric parts, or an
/// out-of-range hour/minute.
pub fn parse_hhmm(hhmm: &str) -> Result<u32> {
    let hhmm = hhmm.trim();
    if hhmm.is_empty() {
        return Err(Error::validation("empty time"));
    }
    let (h, m) = hhmm
        .split_once(':')
        .ok_or_else(|| Error::validation("time must be HH:MM"))?;
    let h: u32 = h
        .trim()
        .parse()
        .map_err(|_| Error::validation("time must be HH:MM"))?;
    let m: u32 = m
        .trim()
        .parse()
        .map_err(|_| Error::validation("time must be HH:MM"))?;
    if h >= 24 || m >= 60 {
        return Err(Error::validation("time out of range"));
    }
    Ok(h * 60 + m)
}

/// Formats minutes since midnight as `HH:MM`.
pub fn format_minutes(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
