//! Edits made in memory that have not been saved yet.

use std::collections::BTreeSet;

/// Set of `(language, namespace, key)` entries marked as modified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifiedSet {
    entries: BTreeSet<(String, String, String)>,
}

impl ModifiedSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, language: &str, namespace: &str, key: &str) {
        self.entries.insert((language.to_string(), namespace.to_string(), key.to_string()));
    }

    #[must_use]
    pub fn contains(&self, language: &str, namespace: &str, key: &str) -> bool {
        self.entries.contains(&(language.to_string(), namespace.to_string(), key.to_string()))
    }

    /// Forgets a single file's entries, e.g. after it was saved.
    pub fn clear_file(&mut self, language: &str, namespace: &str) {
        self.entries.retain(|(l, n, _)| !(l == language && n == namespace));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.entries.iter().map(|(l, n, k)| (l.as_str(), n.as_str(), k.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[googletest::test]
    fn mark_and_query() {
        let mut modified = ModifiedSet::new();
        modified.mark("en", "app.json", "a");
        modified.mark("en", "app.json", "a");

        expect_that!(modified.len(), eq(1));
        expect_that!(modified.contains("en", "app.json", "a"), eq(true));
        expect_that!(modified.contains("de", "app.json", "a"), eq(false));
    }

    #[googletest::test]
    fn clear_file_keeps_other_files() {
        let mut modified = ModifiedSet::new();
        modified.mark("en", "app.json", "a");
        modified.mark("en", "app.json", "b");
        modified.mark("de", "app.json", "a");

        modified.clear_file("en", "app.json");

        let remaining: Vec<_> = modified.iter().collect();
        assert_eq!(remaining, vec![("de", "app.json", "a")]);

        modified.clear();
        expect_that!(modified.is_empty(), eq(true));
    }
}
