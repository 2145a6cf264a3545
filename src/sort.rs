//! Generic sort and search routines used for ranking.
//!
//! All routines are parameterized by a key-extraction closure so the
//! same machinery sorts students by name, GPA, or ID.
//!
//! - [`mergesort`]: stable O(n log n); ties preserve input order, which
//!   [`binary_search`] relies on for duplicate-range scanning
//! - [`quicksort`]: three-way partition around a middle-element pivot;
//!   equal-to-pivot elements keep their relative order
//! - [`binary_search`]: bisection returning the *first* index of an
//!   equal-keyed run, or `None`
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 2.3, 7

/// Stable merge sort, ascending by the extracted key.
///
/// Elements with equal keys retain their relative input order.
pub fn mergesort<T, K, F>(items: &[T], key: F) -> Vec<T>
where
    T: Clone,
    K: PartialOrd,
    F: Fn(&T) -> K + Copy,
{
    if items.len() <= 1 {
        return items.to_vec();
    }
    let mid = items.len() / 2;
    let left = mergesort(&items[..mid], key);
    let right = mergesort(&items[mid..], key);
    merge(left, right, key)
}

fn merge<T, K, F>(left: Vec<T>, right: Vec<T>, key: F) -> Vec<T>
where
    T: Clone,
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    let mut out = Vec::with_capacity(left.len() + right.len());
    let mut i = 0;
    let mut j = 0;
    while i < left.len() && j < right.len() {
        // <= keeps the left element first on ties: stability.
        if key(&left[i]) <= key(&right[j]) {
            out.push(left[i].clone());
            i += 1;
        } else {
            out.push(right[j].clone());
            j += 1;
        }
    }
    out.extend_from_slice(&left[i..]);
    out.extend_from_slice(&right[j..]);
    out
}

/// Quicksort with a middle-element pivot and three-way partition.
///
/// Partitions into strictly-less / equal / strictly-greater relative to
/// the pivot key, recurses on the outer partitions, and concatenates.
/// Not guaranteed stable across recursion, but elements equal to the
/// pivot retain their relative order.
pub fn quicksort<T, K, F>(items: &[T], key: F) -> Vec<T>
where
    T: Clone,
    K: PartialOrd,
    F: Fn(&T) -> K + Copy,
{
    if items.len() <= 1 {
        return items.to_vec();
    }
    let pivot_key = key(&items[items.len() / 2]);

    let mut less = Vec::new();
    let mut equal = Vec::new();
    let mut greater = Vec::new();
    for item in items {
        let k = key(item);
        if k < pivot_key {
            less.push(item.clone());
        } else if k > pivot_key {
            greater.push(item.clone());
        } else {
            equal.push(item.clone());
        }
    }

    let mut out = quicksort(&less, key);
    out.extend(equal);
    out.extend(quicksort(&greater, key));
    out
}

/// Binary search over a slice sorted ascending by the same key.
///
/// Returns the index of the **first** element whose key equals
/// `target` (duplicates are scanned backward to the start of the run),
/// or `None` if absent.
///
/// Caller contract: `sorted` must already be ascending by `key`; this
/// is not enforced internally.
pub fn binary_search<T, K, F>(sorted: &[T], target: &K, key: F) -> Option<usize>
where
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    let mut lo = 0usize;
    let mut hi = sorted.len().checked_sub(1)?;

    loop {
        let mid = (lo + hi) / 2;
        let mid_key = key(&sorted[mid]);
        if mid_key == *target {
            let mut first = mid;
            while first > 0 && key(&sorted[first - 1]) == *target {
                first -= 1;
            }
            return Some(first);
        } else if mid_key < *target {
            lo = mid + 1;
        } else {
            hi = mid.checked_sub(1)?;
        }
        if lo > hi {
            return None;
        }
    }
}
