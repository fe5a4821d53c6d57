//! Creating, deleting and renaming languages and namespaces.

use crate::config::DirectoryMatcher;
use crate::error::HubError;
use crate::indexer::StructureIndex;
use crate::ops::SchemaSynchronizer;
use crate::storage::{
    FileStore,
    TranslationStore,
};
use crate::types::{
    EntityKind,
    FileRef,
    JsonFormat,
    LanguageRef,
    OpReport,
    TranslationMap,
    namespace_stem,
    normalize_namespace,
    validate_identifier,
};

/// Structural operations on a translation root.
///
/// Every operation checks its preconditions against the index before touching the disk and
/// keeps the index in step with what it changed.
#[derive(Debug)]
pub struct StructureManager<'a> {
    files: &'a FileStore,
    index: &'a mut StructureIndex,
    matcher: &'a DirectoryMatcher,
    format: JsonFormat,
}

impl<'a> StructureManager<'a> {
    #[must_use]
    pub fn new(
        files: &'a FileStore,
        index: &'a mut StructureIndex,
        matcher: &'a DirectoryMatcher,
        format: JsonFormat,
    ) -> Self {
        Self { files, index, matcher, format }
    }

    fn store(&self) -> TranslationStore<'_> {
        TranslationStore::new(self.files, &*self.index, self.format)
    }

    /// Rescans the root directory.
    pub fn refresh(&mut self) {
        self.index.refresh(self.files.root(), self.matcher);
    }

    /// Creates the schema directory if needed and adds every language key to it.
    ///
    /// # Returns
    /// Number of keys added to schema files.
    ///
    /// # Errors
    /// `File` when the schema directory cannot be created.
    pub fn ensure_schema_directory(&self) -> Result<usize, HubError> {
        self.files.create_language_dir(&LanguageRef::Schema)?;
        Ok(SchemaSynchronizer::new(self.store()).synchronize_schema())
    }

    /// Key set a new language starts with for `namespace`, all values empty.
    ///
    /// Taken from the schema when its file is non-empty, otherwise from the first real
    /// language in ascending order whose file is non-empty.
    #[must_use]
    pub fn template_for(&self, namespace: &str) -> TranslationMap {
        let store = self.store();
        let source = std::iter::once(LanguageRef::Schema)
            .chain(self.index.real_languages())
            .map(|language| store.read(&language, namespace))
            .find(|data| !data.is_empty())
            .unwrap_or_default();

        source.into_keys().map(|key| (key, String::new())).collect()
    }

    /// Creates a language directory holding every known namespace.
    ///
    /// # Errors
    /// - `InvalidName` when `code` is not a usable directory name or is excluded by settings
    /// - `Reserved` when `code` is the schema directory name
    /// - `Conflict` when the language already exists
    /// - `File` when the directory cannot be created
    ///
    /// Failures writing individual namespace files are collected in the report.
    pub fn create_language(&mut self, code: &str) -> Result<OpReport, HubError> {
        validate_identifier(EntityKind::Language, code)?;
        if code == self.files.schema_dir_name() {
            return Err(HubError::Reserved(code.to_string()));
        }
        if self.index.has_language(code) {
            return Err(HubError::conflict(EntityKind::Language, code));
        }
        if !self.matcher.is_language_dir(code) {
            return Err(HubError::InvalidName {
                kind: EntityKind::Language,
                name: code.to_string(),
            });
        }

        let language = LanguageRef::real(code);
        self.files.create_language_dir(&language)?;

        let mut report = OpReport::new();
        let store = self.store();
        for namespace in self.index.namespaces() {
            let template = self.template_for(namespace);
            let result = store.write(&language, namespace, &template);
            report.record(FileRef::new(language.clone(), namespace.clone()), result);
        }

        self.index.insert_language(code);
        tracing::info!(language = code, files = report.succeeded.len(), "Created language");
        Ok(report)
    }

    /// Creates an empty namespace in every language and in the schema.
    ///
    /// `.json` is appended to `name` when missing. Files that already exist on disk are
    /// left as they are.
    ///
    /// # Errors
    /// - `InvalidName` when `name` is not a usable file name
    /// - `Conflict` when the namespace already exists
    pub fn create_namespace(&mut self, name: &str) -> Result<OpReport, HubError> {
        let namespace = normalize_namespace(name);
        validate_identifier(EntityKind::Namespace, namespace_stem(&namespace))?;
        validate_identifier(EntityKind::Namespace, &namespace)?;
        if self.index.has_namespace(&namespace) {
            return Err(HubError::conflict(EntityKind::Namespace, namespace));
        }

        let mut report = OpReport::new();
        let store = self.store();
        for language in self.index.languages_with_schema() {
            if self.files.exists(&language, &namespace) {
                tracing::debug!(%language, %namespace, "Keeping existing namespace file");
                continue;
            }
            let result = store.write(&language, &namespace, &TranslationMap::new());
            report.record(FileRef::new(language, namespace.clone()), result);
        }

        tracing::info!(%namespace, files = report.succeeded.len(), "Created namespace");
        self.index.insert_namespace(namespace);
        Ok(report)
    }

    /// Removes a language directory with everything in it.
    ///
    /// # Errors
    /// - `Reserved` for the schema directory name
    /// - `NotFound` when the language is unknown
    /// - `File` when the directory cannot be removed
    pub fn delete_language(&mut self, code: &str) -> Result<(), HubError> {
        if code == self.files.schema_dir_name() {
            return Err(HubError::Reserved(code.to_string()));
        }
        if !self.index.has_language(code) {
            return Err(HubError::not_found(EntityKind::Language, code));
        }

        self.files.remove_language_dir(&LanguageRef::real(code))?;
        self.index.remove_language(code);
        tracing::info!(language = code, "Deleted language");
        Ok(())
    }

    /// Renames a language directory.
    ///
    /// # Errors
    /// - `Reserved` when either name is the schema directory name
    /// - `NotFound` when `old` is unknown
    /// - `Conflict` when `new` is a known language or an existing directory
    /// - `InvalidName` when `new` is not a usable directory name or is excluded by settings
    /// - `File` when the rename fails
    pub fn rename_language(&mut self, old: &str, new: &str) -> Result<(), HubError> {
        let schema_dir_name = self.files.schema_dir_name();
        if old == schema_dir_name || new == schema_dir_name {
            return Err(HubError::Reserved(schema_dir_name.to_string()));
        }
        if !self.index.has_language(old) {
            return Err(HubError::not_found(EntityKind::Language, old));
        }
        validate_identifier(EntityKind::Language, new)?;
        let new_language = LanguageRef::real(new);
        if self.index.has_language(new) || self.files.language_dir(&new_language).exists() {
            return Err(HubError::conflict(EntityKind::Language, new));
        }
        if !self.matcher.is_language_dir(new) {
            return Err(HubError::InvalidName { kind: EntityKind::Language, name: new.to_string() });
        }

        self.files.rename_language_dir(&LanguageRef::real(old), &new_language)?;
        self.index.remove_language(old);
        self.index.insert_language(new);
        tracing::info!(old, new, "Renamed language");
        Ok(())
    }

    /// Deletes a namespace file from every language and from the schema.
    ///
    /// Files already missing count as deleted. When some deletions fail the others are not
    /// undone, and the index is rebuilt from disk.
    ///
    /// # Errors
    /// `NotFound` when the namespace is unknown.
    pub fn delete_namespace(&mut self, name: &str) -> Result<OpReport, HubError> {
        let namespace = normalize_namespace(name);
        if !self.index.has_namespace(&namespace) {
            return Err(HubError::not_found(EntityKind::Namespace, namespace));
        }

        let mut report = OpReport::new();
        for language in self.index.languages_with_schema() {
            let result = self.files.delete(&language, &namespace);
            report.record(FileRef::new(language, namespace.clone()), result);
        }

        if report.is_success() {
            self.index.remove_namespace(&namespace);
            tracing::info!(%namespace, "Deleted namespace");
        } else {
            tracing::warn!(%namespace, failed = report.failed.len(), "Namespace partially deleted");
            self.refresh();
        }
        Ok(report)
    }

    /// Renames a namespace file in every language and in the schema.
    ///
    /// `.json` is appended to `new` when missing. When some renames fail the others are
    /// not undone, and the index is rebuilt from disk.
    ///
    /// # Errors
    /// - `NotFound` when `old` is unknown
    /// - `InvalidName` when `new` is not a usable file name
    /// - `Conflict` when `new` is a known namespace or a file of that name already exists
    pub fn rename_namespace(&mut self, old: &str, new: &str) -> Result<OpReport, HubError> {
        let old_namespace = normalize_namespace(old);
        let new_namespace = normalize_namespace(new);
        if !self.index.has_namespace(&old_namespace) {
            return Err(HubError::not_found(EntityKind::Namespace, old_namespace));
        }
        validate_identifier(EntityKind::Namespace, namespace_stem(&new_namespace))?;
        validate_identifier(EntityKind::Namespace, &new_namespace)?;
        let taken = self.index.has_namespace(&new_namespace)
            || self
                .index
                .languages_with_schema()
                .any(|language| self.files.exists(&language, &new_namespace));
        if taken {
            return Err(HubError::conflict(EntityKind::Namespace, new_namespace));
        }

        let mut report = OpReport::new();
        for language in self.index.languages_with_schema() {
            let result = self.files.rename(&language, &old_namespace, &new_namespace);
            report.record(FileRef::new(language, new_namespace.clone()), result);
        }

        if report.is_success() {
            self.index.remove_namespace(&old_namespace);
            self.index.insert_namespace(new_namespace.clone());
            tracing::info!(old = %old_namespace, new = %new_namespace, "Renamed namespace");
        } else {
            tracing::warn!(
                old = %old_namespace,
                new = %new_namespace,
                failed = report.failed.len(),
                "Namespace partially renamed"
            );
            self.refresh();
        }
        Ok(report)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use rstest::*;

    use super::*;
    use crate::test_utils::{
        TestRoot,
        en_de_root,
        map,
        matcher,
    };

    #[googletest::test]
    fn create_language_copies_schema_keys() {
        let root = en_de_root().with_file("_schema", "app.json", &[("a", ""), ("b", "")]);
        let (files, mut index, matcher) = (root.file_store(), root.index(), matcher());
        let mut manager = StructureManager::new(&files, &mut index, &matcher, JsonFormat::Pretty);

        let report = manager.create_language("fr").unwrap();

        expect_that!(report.is_success(), eq(true));
        expect_that!(report.succeeded.len(), eq(1));
        assert_eq!(root.read("fr", "app.json").unwrap(), map(&[("a", ""), ("b", "")]));
        expect_that!(index.has_language("fr"), eq(true));
    }

    #[rstest]
    fn create_language_without_schema_uses_first_language_with_data() {
        let root = TestRoot::new()
            .with_file("de", "app.json", &[])
            .with_file("en", "app.json", &[("x", "X")])
            .with_file("es", "app.json", &[("y", "Y")]);
        let (files, mut index, matcher) = (root.file_store(), root.index(), matcher());
        let mut manager = StructureManager::new(&files, &mut index, &matcher, JsonFormat::Pretty);

        manager.create_language("fr").unwrap();

        assert_eq!(root.read("fr", "app.json").unwrap(), map(&[("x", "")]));
    }

    #[rstest]
    fn create_language_with_no_template_writes_empty_files() {
        let root = TestRoot::new().with_file("en", "app.json", &[]);
        let (files, mut index, matcher) = (root.file_store(), root.index(), matcher());
        let mut manager = StructureManager::new(&files, &mut index, &matcher, JsonFormat::Pretty);

        manager.create_language("fr").unwrap();

        assert_eq!(root.read("fr", "app.json").unwrap(), TranslationMap::new());
    }

    #[googletest::test]
    fn create_language_refuses_schema_name() {
        let root = en_de_root();
        let (files, mut index, matcher) = (root.file_store(), root.index(), matcher());
        let mut manager = StructureManager::new(&files, &mut index, &matcher, JsonFormat::Pretty);

        let result = manager.create_language("_schema");

        expect_that!(result, err(displays_as(contains_substring("reserved"))));
    }

    #[googletest::test]
    fn create_language_refuses_existing_language() {
        let root = en_de_root();
        let (files, mut index, matcher) = (root.file_store(), root.index(), matcher());
        let mut manager = StructureManager::new(&files, &mut index, &matcher, JsonFormat::Pretty);

        let result = manager.create_language("de");

        expect_that!(result, err(displays_as(eq("The language 'de' already exists"))));
        assert_eq!(root.read("de", "app.json").unwrap(), map(&[("a", "hallo")]));
    }

    #[rstest]
    #[case("")]
    #[case("../outside")]
    #[case(".hidden")]
    fn create_language_refuses_unusable_names(#[case] code: &str) {
        let root = en_de_root();
        let (files, mut index, matcher) = (root.file_store(), root.index(), matcher());
        let mut manager = StructureManager::new(&files, &mut index, &matcher, JsonFormat::Pretty);

        let result = manager.create_language(code);

        assert!(matches!(result, Err(HubError::InvalidName { .. })));
        assert_eq!(index.languages().len(), 2);
    }

    #[googletest::test]
    fn create_namespace_appends_suffix_and_writes_everywhere() {
        let root = en_de_root();
        let (files, mut index, matcher) = (root.file_store(), root.index(), matcher());
        let mut manager = StructureManager::new(&files, &mut index, &matcher, JsonFormat::Pretty);

        let report = manager.create_namespace("app.home").unwrap();

        expect_that!(report.succeeded.len(), eq(3));
        expect_that!(root.exists("en", "app.home.json"), eq(true));
        expect_that!(root.exists("de", "app.home.json"), eq(true));
        expect_that!(root.exists("_schema", "app.home.json"), eq(true));
        expect_that!(root.read_raw("en", "app.home.json"), eq("{}\n\n"));
        expect_that!(index.has_namespace("app.home.json"), eq(true));
    }

    #[googletest::test]
    fn create_namespace_keeps_existing_files() {
        let root = en_de_root();
        let (files, mut index, matcher) = (root.file_store(), root.index(), matcher());
        root.write_file("_schema", "extra.json", &[("k", "")]);
        let mut manager = StructureManager::new(&files, &mut index, &matcher, JsonFormat::Pretty);

        let report = manager.create_namespace("extra").unwrap();

        expect_that!(report.succeeded.len(), eq(2));
        assert_eq!(root.read("_schema", "extra.json").unwrap(), map(&[("k", "")]));
    }

    #[googletest::test]
    fn create_namespace_refuses_existing() {
        let root = en_de_root();
        let (files, mut index, matcher) = (root.file_store(), root.index(), matcher());
        let mut manager = StructureManager::new(&files, &mut index, &matcher, JsonFormat::Pretty);

        expect_that!(
            manager.create_namespace("app"),
            err(displays_as(eq("The namespace 'app.json' already exists")))
        );
    }

    #[googletest::test]
    fn delete_language_removes_directory() {
        let root = en_de_root();
        let (files, mut index, matcher) = (root.file_store(), root.index(), matcher());
        let mut manager = StructureManager::new(&files, &mut index, &matcher, JsonFormat::Pretty);

        manager.delete_language("de").unwrap();

        expect_that!(root.path().join("de").exists(), eq(false));
        expect_that!(index.has_language("de"), eq(false));
    }

    #[rstest]
    #[case("_schema")]
    #[case("fr")]
    fn delete_language_refuses_schema_and_unknown(#[case] code: &str) {
        let root = en_de_root();
        let (files, mut index, matcher) = (root.file_store(), root.index(), matcher());
        let mut manager = StructureManager::new(&files, &mut index, &matcher, JsonFormat::Pretty);

        assert!(manager.delete_language(code).is_err());
        assert_eq!(index.languages().len(), 2);
    }

    #[googletest::test]
    fn rename_language_moves_directory() {
        let root = en_de_root();
        let (files, mut index, matcher) = (root.file_store(), root.index(), matcher());
        let mut manager = StructureManager::new(&files, &mut index, &matcher, JsonFormat::Pretty);

        manager.rename_language("de", "de-DE").unwrap();

        assert_eq!(root.read("de-DE", "app.json").unwrap(), map(&[("a", "hallo")]));
        expect_that!(index.has_language("de"), eq(false));
        expect_that!(index.has_language("de-DE"), eq(true));
    }

    #[rstest]
    #[case("de", "en")]
    #[case("de", "_schema")]
    #[case("_schema", "xx")]
    #[case("fr", "xx")]
    fn rename_language_refusals(#[case] old: &str, #[case] new: &str) {
        let root = en_de_root();
        let (files, mut index, matcher) = (root.file_store(), root.index(), matcher());
        let mut manager = StructureManager::new(&files, &mut index, &matcher, JsonFormat::Pretty);

        assert!(manager.rename_language(old, new).is_err());
        assert_eq!(root.read("de", "app.json").unwrap(), map(&[("a", "hallo")]));
    }

    #[googletest::test]
    fn rename_language_refuses_existing_unindexed_directory() {
        let root = en_de_root();
        fs::create_dir(root.path().join("fr")).unwrap();
        let (files, mut index, matcher) = (root.file_store(), StructureIndex::new(), matcher());
        index.insert_language("de");
        let mut manager = StructureManager::new(&files, &mut index, &matcher, JsonFormat::Pretty);

        expect_that!(
            manager.rename_language("de", "fr"),
            err(displays_as(contains_substring("already exists")))
        );
    }

    #[googletest::test]
    fn delete_namespace_removes_all_files() {
        let root = en_de_root().with_file("_schema", "app.json", &[("a", "")]);
        let (files, mut index, matcher) = (root.file_store(), root.index(), matcher());
        let mut manager = StructureManager::new(&files, &mut index, &matcher, JsonFormat::Pretty);

        let report = manager.delete_namespace("app.json").unwrap();

        expect_that!(report.is_success(), eq(true));
        expect_that!(root.exists("en", "app.json"), eq(false));
        expect_that!(root.exists("de", "app.json"), eq(false));
        expect_that!(root.exists("_schema", "app.json"), eq(false));
        expect_that!(index.has_namespace("app.json"), eq(false));
    }

    #[googletest::test]
    fn delete_namespace_partial_failure_keeps_deleted_files_and_refreshes() {
        let root = en_de_root().with_file("fr", "app.json", &[("a", "salut")]);
        let (files, mut index, matcher) = (root.file_store(), root.index(), matcher());
        // A directory in place of the German file cannot be removed as a file
        fs::remove_file(root.path().join("de/app.json")).unwrap();
        fs::create_dir(root.path().join("de/app.json")).unwrap();
        let mut manager = StructureManager::new(&files, &mut index, &matcher, JsonFormat::Pretty);

        let report = manager.delete_namespace("app.json").unwrap();

        expect_that!(report.is_success(), eq(false));
        expect_that!(report.failed.len(), eq(1));
        assert_eq!(report.failed_paths(), vec![root.path().join("de/app.json")]);
        expect_that!(root.exists("en", "app.json"), eq(false));
        expect_that!(root.exists("fr", "app.json"), eq(false));
        expect_that!(index.has_namespace("app.json"), eq(false));
    }

    #[googletest::test]
    fn rename_namespace_appends_suffix() {
        let root = en_de_root().with_file("_schema", "app.json", &[("a", "")]);
        let (files, mut index, matcher) = (root.file_store(), root.index(), matcher());
        let mut manager = StructureManager::new(&files, &mut index, &matcher, JsonFormat::Pretty);

        let report = manager.rename_namespace("app.json", "main").unwrap();

        expect_that!(report.succeeded.len(), eq(3));
        assert_eq!(root.read("en", "main.json").unwrap(), map(&[("a", "hi"), ("b", "")]));
        expect_that!(root.exists("_schema", "main.json"), eq(true));
        expect_that!(root.exists("en", "app.json"), eq(false));
        expect_that!(index.has_namespace("main.json"), eq(true));
        expect_that!(index.has_namespace("app.json"), eq(false));
    }

    #[rstest]
    #[case("app.json", "common.json")]
    #[case("app.json", "common")]
    #[case("missing.json", "other.json")]
    fn rename_namespace_refusals(#[case] old: &str, #[case] new: &str) {
        let root = en_de_root().with_file("en", "common.json", &[("ok", "OK")]);
        let (files, mut index, matcher) = (root.file_store(), root.index(), matcher());
        let mut manager = StructureManager::new(&files, &mut index, &matcher, JsonFormat::Pretty);

        assert!(manager.rename_namespace(old, new).is_err());
        assert!(root.exists("en", "app.json"));
        assert_eq!(root.read("en", "common.json").unwrap(), map(&[("ok", "OK")]));
    }

    #[googletest::test]
    fn rename_namespace_refuses_schema_only_target() {
        let root = en_de_root().with_file("_schema", "legacy.json", &[("old", "")]);
        let (files, mut index, matcher) = (root.file_store(), root.index(), matcher());
        let mut manager = StructureManager::new(&files, &mut index, &matcher, JsonFormat::Pretty);

        expect_that!(
            manager.rename_namespace("app.json", "legacy.json"),
            err(displays_as(contains_substring("already exists")))
        );
    }

    #[googletest::test]
    fn ensure_schema_directory_creates_and_fills_schema() {
        let root = en_de_root();
        let (files, mut index, matcher) = (root.file_store(), root.index(), matcher());
        let manager = StructureManager::new(&files, &mut index, &matcher, JsonFormat::Pretty);

        let added = manager.ensure_schema_directory().unwrap();

        expect_that!(added, eq(2));
        assert_eq!(root.read("_schema", "app.json").unwrap(), map(&[("a", ""), ("b", "")]));
        assert_eq!(root.read("de", "app.json").unwrap(), map(&[("a", "hallo")]));
    }

    #[googletest::test]
    fn refresh_rescans_disk() {
        let root = en_de_root();
        let (files, mut index, matcher) = (root.file_store(), root.index(), matcher());
        root.write_file("ja", "app.json", &[]);
        let mut manager = StructureManager::new(&files, &mut index, &matcher, JsonFormat::Pretty);

        manager.refresh();

        expect_that!(index.has_language("ja"), eq(true));
    }
}
