//! Languages and namespaces discovered under the root directory.

use std::collections::BTreeSet;
use std::path::Path;

use ignore::WalkBuilder;

use crate::config::DirectoryMatcher;
use crate::types::{
    LanguageRef,
    NAMESPACE_SUFFIX,
};

/// Cache of which languages and namespaces exist.
///
/// Built by scanning the root and kept up to date by structural operations. It is not
/// refreshed on out-of-band changes to the directory; call [`Self::refresh`] for that.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructureIndex {
    /// Real language codes (never the schema directory)
    languages: BTreeSet<String>,
    /// Namespace file names, each ending in `.json`
    namespaces: BTreeSet<String>,
}

impl StructureIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans `root` two levels deep.
    ///
    /// Depth-1 directories accepted by `matcher` are languages; `*.json` files inside
    /// them are namespaces. The schema directory contributes no namespaces.
    #[must_use]
    pub fn scan(root: &Path, matcher: &DirectoryMatcher) -> Self {
        let mut index = Self::new();
        if !root.is_dir() {
            tracing::debug!(root = %root.display(), "Root is not a directory; empty index");
            return index;
        }

        for result in WalkBuilder::new(root)
            .standard_filters(false)
            .max_depth(Some(2))
            .follow_links(false)
            .build()
        {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!(?err, "Failed to read directory entry");
                    continue;
                }
            };
            let Some(file_type) = entry.file_type() else {
                continue;
            };
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };

            match entry.depth() {
                1 if file_type.is_dir() && matcher.is_language_dir(name) => {
                    index.languages.insert(name.to_string());
                }
                2 if file_type.is_file() && name.ends_with(NAMESPACE_SUFFIX) => {
                    let parent = entry
                        .path()
                        .parent()
                        .and_then(Path::file_name)
                        .and_then(|parent| parent.to_str());
                    if parent.is_some_and(|parent| matcher.is_language_dir(parent)) {
                        index.namespaces.insert(name.to_string());
                    }
                }
                _ => {}
            }
        }

        tracing::debug!(
            root = %root.display(),
            languages = index.languages.len(),
            namespaces = index.namespaces.len(),
            "Scanned translation root"
        );
        index
    }

    /// Replaces the index with a fresh scan of `root`.
    pub fn refresh(&mut self, root: &Path, matcher: &DirectoryMatcher) {
        *self = Self::scan(root, matcher);
    }

    #[must_use]
    pub const fn languages(&self) -> &BTreeSet<String> {
        &self.languages
    }

    #[must_use]
    pub const fn namespaces(&self) -> &BTreeSet<String> {
        &self.namespaces
    }

    #[must_use]
    pub fn has_language(&self, code: &str) -> bool {
        self.languages.contains(code)
    }

    #[must_use]
    pub fn has_namespace(&self, namespace: &str) -> bool {
        self.namespaces.contains(namespace)
    }

    /// Whether `language` can hold files; the schema always can.
    #[must_use]
    pub fn contains(&self, language: &LanguageRef) -> bool {
        match language {
            LanguageRef::Real(code) => self.has_language(code),
            LanguageRef::Schema => true,
        }
    }

    /// Real languages in ascending order.
    pub fn real_languages(&self) -> impl Iterator<Item = LanguageRef> + '_ {
        self.languages.iter().map(LanguageRef::real)
    }

    /// Real languages followed by the schema.
    pub fn languages_with_schema(&self) -> impl Iterator<Item = LanguageRef> + '_ {
        self.real_languages().chain(std::iter::once(LanguageRef::Schema))
    }

    pub(crate) fn insert_language(&mut self, code: impl Into<String>) {
        self.languages.insert(code.into());
    }

    pub(crate) fn remove_language(&mut self, code: &str) -> bool {
        self.languages.remove(code)
    }

    pub(crate) fn insert_namespace(&mut self, namespace: impl Into<String>) {
        self.namespaces.insert(namespace.into());
    }

    pub(crate) fn remove_namespace(&mut self, namespace: &str) -> bool {
        self.namespaces.remove(namespace)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use rstest::*;
    use tempfile::TempDir;

    use super::*;
    use crate::config::HubSettings;

    fn matcher() -> DirectoryMatcher {
        DirectoryMatcher::new(&HubSettings::default()).unwrap()
    }

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "{}").unwrap();
    }

    #[googletest::test]
    fn scan_collects_languages_and_namespaces() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "en/app.json");
        touch(temp_dir.path(), "en/common.json");
        touch(temp_dir.path(), "de/app.json");
        fs::create_dir_all(temp_dir.path().join("fr")).unwrap();

        let index = StructureIndex::scan(temp_dir.path(), &matcher());

        assert_eq!(index.languages().iter().collect::<Vec<_>>(), vec!["de", "en", "fr"]);
        assert_eq!(index.namespaces().iter().collect::<Vec<_>>(), vec!["app.json", "common.json"]);
    }

    #[googletest::test]
    fn scan_skips_schema_hidden_dirs_and_non_json_files() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "en/app.json");
        touch(temp_dir.path(), "en/notes.txt");
        touch(temp_dir.path(), "_schema/only-in-schema.json");
        touch(temp_dir.path(), ".git/config.json");
        touch(temp_dir.path(), "export.json");

        let index = StructureIndex::scan(temp_dir.path(), &matcher());

        assert_eq!(index.languages().iter().collect::<Vec<_>>(), vec!["en"]);
        assert_eq!(index.namespaces().iter().collect::<Vec<_>>(), vec!["app.json"]);
    }

    #[googletest::test]
    fn scan_of_missing_root_is_empty() {
        let temp_dir = TempDir::new().unwrap();

        let index = StructureIndex::scan(&temp_dir.path().join("missing"), &matcher());

        expect_that!(index.languages().len(), eq(0));
        expect_that!(index.namespaces().len(), eq(0));
    }

    #[googletest::test]
    fn refresh_picks_up_changes() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "en/app.json");
        let mut index = StructureIndex::scan(temp_dir.path(), &matcher());
        touch(temp_dir.path(), "ja/app.json");

        expect_that!(index.has_language("ja"), eq(false));
        index.refresh(temp_dir.path(), &matcher());
        expect_that!(index.has_language("ja"), eq(true));
    }

    #[rstest]
    fn schema_is_always_contained() {
        let index = StructureIndex::new();

        assert!(index.contains(&LanguageRef::Schema));
        assert!(!index.contains(&LanguageRef::real("en")));
    }

    #[rstest]
    fn languages_with_schema_ends_with_schema() {
        let mut index = StructureIndex::new();
        index.insert_language("en");
        index.insert_language("de");

        let languages: Vec<_> = index.languages_with_schema().collect();

        assert_eq!(
            languages,
            vec![LanguageRef::real("de"), LanguageRef::real("en"), LanguageRef::Schema]
        );
    }
}
