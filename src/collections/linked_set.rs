//! Insertion-ordered subject enrollment set.
//!
//! A singly-linked list of normalized subject codes with set semantics:
//! no duplicates, order of first insertion preserved. Membership and
//! removal are O(n); at enrollment scale (a handful of codes per
//! student) simplicity wins over asymptotics.

use serde::de::{Deserializer, SeqAccess, Visitor};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

struct Node {
    code: String,
    next: Option<Box<Node>>,
}

/// Ordered, duplicate-free set of subject codes.
///
/// Codes are normalized (trimmed, ASCII-uppercased) on every operation,
/// so `"math "` and `"MATH"` refer to the same subject.
///
/// # Example
/// ```
/// use roster::collections::SubjectSet;
///
/// let mut set = SubjectSet::new();
/// set.insert("math").unwrap();
/// set.insert("PHY").unwrap();
/// assert!(set.insert(" MATH ").is_err()); // duplicate
/// assert!(set.contains("phy"));
/// assert_eq!(set.to_vec(), vec!["MATH", "PHY"]);
/// ```
#[derive(Default)]
pub struct SubjectSet {
    head: Option<Box<Node>>,
    len: usize,
}

/// Trims and ASCII-uppercases a subject code.
pub(crate) fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

impl SubjectSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of enrolled codes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether a code (after normalization) is present.
    pub fn contains(&self, code: &str) -> bool {
        let code = normalize_code(code);
        self.iter().any(|c| c == code)
    }

    /// Appends a code to the end of the enrollment order.
    ///
    /// # Errors
    /// [`Error::DuplicateKey`] if the normalized code is already present.
    pub fn insert(&mut self, code: &str) -> Result<()> {
        let code = normalize_code(code);
        if self.contains(&code) {
            return Err(Error::duplicate("subject", code));
        }
        self.push_back(code);
        Ok(())
    }

    /// Removes a code.
    ///
    /// # Errors
    /// [`Error::NotFound`] if the normalized code is absent.
    pub fn remove(&mut self, code: &str) -> Result<()> {
        let code = normalize_code(code);
        let mut cursor = &mut self.head;
        loop {
            match cursor {
                None => return Err(Error::not_found("subject", code)),
                Some(node) if node.code == code => {
                    let next = node.next.take();
                    *cursor = next;
                    self.len -= 1;
                    return Ok(());
                }
                Some(node) => cursor = &mut node.next,
            }
        }
    }

    /// Iterates codes in enrollment order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            cursor: self.head.as_deref(),
        }
    }

    /// Collects the codes into a vector in enrollment order.
    pub fn to_vec(&self) -> Vec<String> {
        self.iter().map(str::to_owned).collect()
    }

    // Appends without the duplicate check; caller guarantees uniqueness.
    fn push_back(&mut self, code: String) {
        let node = Box::new(Node { code, next: None });
        let mut cursor = &mut self.head;
        while let Some(existing) = cursor {
            cursor = &mut existing.next;
        }
        *cursor = Some(node);
        self.len += 1;
    }
}

/// Iterator over enrolled codes.
pub struct Iter<'a> {
    cursor: Option<&'a Node>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let node = self.cursor?;
        self.cursor = node.next.as_deref();
        Some(&node.code)
    }
}

impl Clone for SubjectSet {
    fn clone(&self) -> Self {
        let mut set = SubjectSet::new();
        for code in self.iter() {
            set.push_back(code.to_owned());
        }
        set
    }
}

impl std::fmt::Debug for SubjectSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl Drop for SubjectSet {
    // Unlink iteratively so long enrollment lists cannot overflow the
    // stack through recursive Box drops.
    fn drop(&mut self) {
        let mut cursor = self.head.take();
        while let Some(mut node) = cursor {
            cursor = node.next.take();
        }
    }
}

impl Serialize for SubjectSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len))?;
        for code in self.iter() {
            seq.serialize_element(code)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for SubjectSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct SetVisitor;

        impl<'de> Visitor<'de> for SetVisitor {
            type Value = SubjectSet;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a sequence of subject codes")
            }

            fn visit_seq<A: SeqAccess<'de>>(
                self,
                mut seq: A,
            ) -> std::result::Result<SubjectSet, A::Error> {
                let mut set = SubjectSet::new();
                while let Some(code) = seq.next_element::<String>()? {
                    // Tolerate duplicates in stored snapshots: keep the
                    // first occurrence, drop the rest.
                    let _ = set.insert(&code);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_seq(SetVisitor)
    }
}
