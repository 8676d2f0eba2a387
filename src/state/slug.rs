//! Deduplicating ID allocator shared by switches and timers

use std::collections::HashSet;

/// Mints address-safe IDs of the form `{prefix}-{slug}`
#[derive(Debug, Default, Clone)]
pub struct SlugAllocator {
    taken: HashSet<String>,
}

impl SlugAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh ID for `title` under `prefix`
    ///
    /// The title is lowercased and every character outside `[0-9a-z]` becomes
    /// `-`. Collisions get `-1`, `-2`, ... appended.
    pub fn allocate(&mut self, prefix: &str, title: &str) -> String {
        let slug: String = title
            .to_lowercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();
        let base = format!("{}-{}", prefix, slug);

        if self.taken.insert(base.clone()) {
            return base;
        }

        let mut number = 1u32;
        loop {
            let candidate = format!("{}-{}", base, number);
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            number += 1;
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.taken.contains(id)
    }

    /// Mark an existing ID as used, e.g. one restored from a snapshot
    pub fn reserve(&mut self, id: &str) {
        self.taken.insert(id.to_string());
    }
}
