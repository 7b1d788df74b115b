//! Tag de-duplication shared by every input shape.

use std::collections::HashSet;

/// Order-preserving, case-sensitive de-duplication.
///
/// Entries that are empty or whitespace-only after trimming are dropped;
/// surviving entries keep their original spelling and first-occurrence
/// position. Idempotent.
#[must_use]
pub fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.into_iter()
        .filter(|tag| !tag.trim().is_empty())
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}
