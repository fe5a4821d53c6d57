//! Translation maps per (language, namespace), checked against the structure index.

use crate::error::HubError;
use crate::indexer::StructureIndex;
use crate::ops::SchemaSynchronizer;
use crate::storage::{
    FileStore,
    FileStoreError,
};
use crate::types::{
    EntityKind,
    FileStatus,
    JsonFormat,
    LanguageRef,
    TranslationMap,
};

/// Read and write access to translation maps.
///
/// Borrowed view over the file store and the index; create one per operation.
#[derive(Debug, Clone, Copy)]
pub struct TranslationStore<'a> {
    files: &'a FileStore,
    index: &'a StructureIndex,
    format: JsonFormat,
}

impl<'a> TranslationStore<'a> {
    #[must_use]
    pub const fn new(files: &'a FileStore, index: &'a StructureIndex, format: JsonFormat) -> Self {
        Self { files, index, format }
    }

    #[must_use]
    pub const fn files(&self) -> &'a FileStore {
        self.files
    }

    #[must_use]
    pub const fn index(&self) -> &'a StructureIndex {
        self.index
    }

    #[must_use]
    pub const fn format(&self) -> JsonFormat {
        self.format
    }

    /// Whether `(language, namespace)` is known to the index.
    #[must_use]
    pub fn is_known(&self, language: &LanguageRef, namespace: &str) -> bool {
        self.index.contains(language) && self.index.has_namespace(namespace)
    }

    /// Translations of `(language, namespace)`.
    ///
    /// Unknown combinations, missing files and invalid files all read as an empty map.
    #[must_use]
    pub fn get(&self, language: &LanguageRef, namespace: &str) -> TranslationMap {
        if !self.is_known(language, namespace) {
            return TranslationMap::new();
        }
        self.files.read(language, namespace)
    }

    /// On-disk state of `(language, namespace)`.
    #[must_use]
    pub fn status(&self, language: &LanguageRef, namespace: &str) -> FileStatus {
        match self.files.read_checked(language, namespace) {
            Ok(Some(data)) => FileStatus::Valid(data.len()),
            Ok(None) => FileStatus::Missing,
            Err(error) => FileStatus::Corrupt(error.to_string()),
        }
    }

    /// Saves translations with the store's output format.
    ///
    /// See [`Self::save_as`].
    pub fn save(
        &self,
        language: &LanguageRef,
        namespace: &str,
        data: &TranslationMap,
    ) -> Result<(), HubError> {
        self.save_as(language, namespace, data, self.format)
    }

    /// Saves translations, sorted by key.
    ///
    /// Saving a real language propagates its keys to the schema and every other language
    /// afterwards. The saved file keeps exactly `data`.
    ///
    /// # Errors
    /// - `NotFound` when the language or namespace is unknown
    /// - `File` when the write fails
    pub fn save_as(
        &self,
        language: &LanguageRef,
        namespace: &str,
        data: &TranslationMap,
        format: JsonFormat,
    ) -> Result<(), HubError> {
        if !self.index.contains(language) {
            return Err(HubError::not_found(EntityKind::Language, language.to_string()));
        }
        if !self.index.has_namespace(namespace) {
            return Err(HubError::not_found(EntityKind::Namespace, namespace));
        }

        self.files.write(language, namespace, data, format)?;

        if let Some(code) = language.code() {
            SchemaSynchronizer::new(*self).propagate_saved(namespace, code, data);
        }
        Ok(())
    }

    /// Reads a file without consulting the index.
    pub(crate) fn read(&self, language: &LanguageRef, namespace: &str) -> TranslationMap {
        self.files.read(language, namespace)
    }

    /// Writes a file without consulting the index and without synchronizing.
    pub(crate) fn write(
        &self,
        language: &LanguageRef,
        namespace: &str,
        data: &TranslationMap,
    ) -> Result<(), FileStoreError> {
        self.files.write(language, namespace, data, self.format)
    }
}
