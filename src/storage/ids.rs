//! Identifier allocation for system-assigned ids

/// Returns the next free id: 1 for an empty collection, otherwise one more
/// than the largest id present.
///
/// Ids are never reused because records are never physically removed.
/// Returns `None` once the largest id is `i32::MAX`.
pub fn next_id<E>(records: &[E], id_of: impl Fn(&E) -> i32) -> Option<i32> {
    match records.iter().map(id_of).max() {
        Some(max) => max.checked_add(1),
        None => Some(1),
    }
}
