//! JSON file persistence adapter.
//!
//! Serializes the record set and the slot catalog to a pair of JSON
//! files. Malformed input never crashes the registry: an unreadable
//! file is renamed aside (`<name>.corrupt`, best effort) and treated
//! as empty, and individual record snapshots that fail to reconstruct
//! are skipped with a warning while the rest load normally.
//!
//! Best-effort fallback only; no transactionality is attempted.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::Result;
use crate::models::{Student, SubjectSlot};
use crate::registry::Registry;

/// File-backed store for records and the slot catalog.
///
/// # Example
/// ```no_run
/// use roster::store::JsonStore;
///
/// let store = JsonStore::new("data.json", "catalog.json");
/// let registry = store.load_registry().unwrap();
/// store.save_registry(&registry).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct JsonStore {
    data_path: PathBuf,
    catalog_path: PathBuf,
}

impl JsonStore {
    /// Creates a store over the given record and catalog file paths.
    pub fn new(data_path: impl Into<PathBuf>, catalog_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            catalog_path: catalog_path.into(),
        }
    }

    /// Loads all record snapshots.
    ///
    /// A missing file is seeded empty; an unreadable or malformed file
    /// is quarantined and treated as empty; snapshots that fail to
    /// reconstruct (bad shape, out-of-range year) are skipped.
    pub fn load_students(&self) -> Result<Vec<Student>> {
        let Some(raw) = read_or_seed(&self.data_path, "[]")? else {
            return Ok(Vec::new());
        };
        let values: Vec<serde_json::Value> = match serde_json::from_str(raw.trim()) {
            Ok(values) => values,
            Err(err) => {
                warn!(path = %self.data_path.display(), error = %err, "quarantining unreadable data file");
                quarantine(&self.data_path);
                return Ok(Vec::new());
            }
        };

        let mut students = Vec::with_capacity(values.len());
        for value in values {
            match serde_json::from_value::<Student>(value) {
                Ok(student) if (1..=4).contains(&student.year) => students.push(student),
                Ok(student) => {
                    warn!(student_id = %student.student_id, year = student.year, "skipping snapshot with out-of-range year");
                }
                Err(err) => {
                    warn!(error = %err, "skipping unreadable record snapshot");
                }
            }
        }
        debug!(count = students.len(), "loaded record snapshots");
        Ok(students)
    }

    /// Writes all record snapshots as a pretty-printed JSON array.
    pub fn save_students(&self, students: &[&Student]) -> Result<()> {
        let json = serde_json::to_string_pretty(students)?;
        fs::write(&self.data_path, json)?;
        debug!(count = students.len(), path = %self.data_path.display(), "saved records");
        Ok(())
    }

    /// Loads the slot catalog with the same tolerance as
    /// [`load_students`](Self::load_students).
    pub fn load_catalog(&self) -> Result<BTreeMap<String, SubjectSlot>> {
        let Some(raw) = read_or_seed(&self.catalog_path, "{}")? else {
            return Ok(BTreeMap::new());
        };
        match serde_json::from_str(raw.trim()) {
            Ok(catalog) => Ok(catalog),
            Err(err) => {
                warn!(path = %self.catalog_path.display(), error = %err, "quarantining unreadable catalog file");
                quarantine(&self.catalog_path);
                Ok(BTreeMap::new())
            }
        }
    }

    /// Writes the slot catalog.
    pub fn save_catalog(&self, catalog: &BTreeMap<String, SubjectSlot>) -> Result<()> {
        let json = serde_json::to_string_pretty(catalog)?;
        fs::write(&self.catalog_path, json)?;
        Ok(())
    }

    /// Loads records and catalog into a fresh registry.
    pub fn load_registry(&self) -> Result<Registry> {
        let mut registry = Registry::new();
        registry.replace_all(self.load_students()?);
        registry.set_catalog(self.load_catalog()?);
        Ok(registry)
    }

    /// Persists a registry's records and catalog.
    pub fn save_registry(&self, registry: &Registry) -> Result<()> {
        let students: Vec<&Student> = registry.students().collect();
        self.save_students(&students)?;
        self.save_catalog(registry.subject_slots())
    }
}

/// Reads a file, seeding it with `empty` when missing.
///
/// Returns `None` when the file was just seeded or is blank.
fn read_or_seed(path: &Path, empty: &str) -> Result<Option<String>> {
    if !path.exists() {
        fs::write(path, empty)?;
        return Ok(None);
    }
    let raw = fs::read_to_string(path)?;
    if raw.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(raw))
}

/// Renames a broken file aside so the next save starts clean.
/// Best effort: a failed rename is logged and otherwise ignored.
fn quarantine(path: &Path) {
    let mut target = path.as_os_str().to_owned();
    target.push(".corrupt");
    if let Err(err) = fs::rename(path, &target) {
        warn!(path = %path.display(), error = %err, "could not quarantine file");
    }
}
