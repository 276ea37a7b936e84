//! Hamming distance over categorical key tuples.

/// Number of coordinates at which two categorical tuples disagree.
///
/// Tuples of unequal length count every unpaired coordinate as a mismatch,
/// so the distance stays symmetric.
#[must_use]
pub fn mismatch_count(a: &[&str], b: &[&str]) -> usize {
    let paired = a.iter().zip(b).filter(|(x, y)| x != y).count();
    paired + a.len().abs_diff(b.len())
}
