//! Entry point tying storage, index and operations together.
//!
//! `TranslationManager` owns every piece of state. Component views such as
//! [`TranslationStore`] or [`KeyOperations`] borrow from it for the duration of a single call.

use std::collections::BTreeMap;
use std::fs;
use std::path::{
    Path,
    PathBuf,
};

use crate::config::{
    ConfigError,
    ConfigManager,
    DirectoryMatcher,
    HubSettings,
};
use crate::error::HubError;
use crate::export::ExportPackager;
use crate::indexer::StructureIndex;
use crate::modified::ModifiedSet;
use crate::ops::{
    KeyOperations,
    SchemaSynchronizer,
    StructureManager,
};
use crate::query::{
    ProgressCalculator,
    SearchEngine,
    SearchResults,
};
use crate::storage::{
    FileStore,
    TranslationStore,
};
use crate::types::{
    ConflictStrategy,
    EntityKind,
    FileStatus,
    JsonFormat,
    LanguageRef,
    MissingTranslation,
    MoveOutcome,
    OpReport,
    Progress,
    TranslationMap,
    normalize_namespace,
    validate_identifier,
};

/// Translation data management for one root directory.
///
/// Mutations take `&mut self` and fail with [`HubError::NoRootDirectory`] while no root is
/// open; queries return empty results in that case.
#[derive(Debug)]
pub struct TranslationManager {
    config: ConfigManager,
    matcher: DirectoryMatcher,
    files: Option<FileStore>,
    index: StructureIndex,
    modified: ModifiedSet,
}

impl TranslationManager {
    /// Creates a manager with default settings and no root.
    ///
    /// # Errors
    /// Never for the default settings; see [`Self::with_settings`].
    pub fn new() -> Result<Self, HubError> {
        Self::with_settings(HubSettings::default())
    }

    /// Creates a manager with the given settings and no root.
    ///
    /// # Errors
    /// `Config` or `Matcher` when the settings are invalid.
    pub fn with_settings(settings: HubSettings) -> Result<Self, HubError> {
        let mut config = ConfigManager::new();
        config.update_settings(settings)?;
        Self::from_config(config)
    }

    fn from_config(config: ConfigManager) -> Result<Self, HubError> {
        let matcher = DirectoryMatcher::new(config.get_settings())?;
        Ok(Self {
            config,
            matcher,
            files: None,
            index: StructureIndex::new(),
            modified: ModifiedSet::new(),
        })
    }

    /// Opens `root` with the settings from its `.translatehub.json`, if any.
    ///
    /// # Errors
    /// - `InvalidRoot` when `root` is not a directory
    /// - `Config` when the settings file cannot be read or is invalid
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, HubError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(HubError::InvalidRoot(root));
        }
        let mut config = ConfigManager::new();
        config.load_settings(Some(root.as_path()))?;

        let mut manager = Self::from_config(config)?;
        manager.set_root_dir(root)?;
        Ok(manager)
    }

    /// Switches to another root directory.
    ///
    /// Scans the directory, creates the schema directory when missing and adds every
    /// language key to the schema. Pending modification marks are dropped.
    ///
    /// # Errors
    /// - `InvalidRoot` when `root` is not a directory
    /// - `File` when the schema directory cannot be created
    pub fn set_root_dir(&mut self, root: impl Into<PathBuf>) -> Result<(), HubError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(HubError::InvalidRoot(root));
        }

        let files = FileStore::new(root.clone(), self.settings().schema_dir_name.clone());
        self.index = StructureIndex::scan(files.root(), &self.matcher);
        self.files = Some(files);
        self.modified.clear();

        let added = self.structure()?.ensure_schema_directory()?;
        tracing::info!(
            root = %root.display(),
            languages = self.index.languages().len(),
            namespaces = self.index.namespaces().len(),
            schema_keys_added = added,
            "Opened translation root"
        );
        Ok(())
    }

    #[must_use]
    pub fn root_dir(&self) -> Option<&Path> {
        self.files.as_ref().map(FileStore::root)
    }

    #[must_use]
    pub fn settings(&self) -> &HubSettings {
        self.config.get_settings()
    }

    /// Rescans the root directory after changes made outside this manager.
    pub fn refresh(&mut self) {
        if let Some(files) = &self.files {
            self.index.refresh(files.root(), &self.matcher);
        }
    }

    /// Renames the schema directory.
    ///
    /// An existing schema directory is renamed on disk; when that fails the old name stays
    /// in effect.
    ///
    /// # Errors
    /// - `InvalidName` or `Config` when `name` is not a usable directory name
    /// - `Conflict` when a language or directory of that name exists
    /// - `Io` when the rename fails
    pub fn set_schema_dir_name(&mut self, name: &str) -> Result<(), HubError> {
        validate_identifier(EntityKind::Language, name)?;
        if name == self.settings().schema_dir_name {
            return Ok(());
        }
        if self.index.has_language(name) {
            return Err(HubError::conflict(EntityKind::Language, name));
        }

        let settings = HubSettings { schema_dir_name: name.to_string(), ..self.settings().clone() };
        settings.validate().map_err(ConfigError::ValidationErrors)?;
        let matcher = DirectoryMatcher::new(&settings)?;

        if let Some(files) = &mut self.files {
            let old_dir = files.language_dir(&LanguageRef::Schema);
            let new_dir = files.root().join(name);
            if new_dir.exists() {
                return Err(HubError::conflict(EntityKind::Language, name));
            }
            if old_dir.is_dir() {
                fs::rename(&old_dir, &new_dir)?;
            }
            files.set_schema_dir_name(name);
        }

        self.config.update_settings(settings)?;
        self.matcher = matcher;
        self.refresh();
        tracing::info!(schema_dir_name = name, "Changed schema directory");
        Ok(())
    }

    /// Replaces the settings, renaming the schema directory if its name changed.
    ///
    /// # Errors
    /// `Config` or `Matcher` for invalid settings, plus the errors of
    /// [`Self::set_schema_dir_name`].
    pub fn update_settings(&mut self, settings: HubSettings) -> Result<(), HubError> {
        settings.validate().map_err(ConfigError::ValidationErrors)?;
        let matcher = DirectoryMatcher::new(&settings)?;
        if settings.schema_dir_name != self.settings().schema_dir_name {
            self.set_schema_dir_name(&settings.schema_dir_name)?;
        }
        self.config.update_settings(settings)?;
        self.matcher = matcher;
        self.refresh();
        Ok(())
    }

    /// Maps a directory name to a language, recognizing the configured schema name.
    #[must_use]
    pub fn language_ref(&self, name: &str) -> LanguageRef {
        LanguageRef::parse(name, &self.settings().schema_dir_name)
    }

    fn format(&self) -> JsonFormat {
        JsonFormat::from_compress_flag(self.settings().compress_json)
    }

    fn store(&self) -> Option<TranslationStore<'_>> {
        let format = self.format();
        self.files.as_ref().map(|files| TranslationStore::new(files, &self.index, format))
    }

    fn require_store(&self) -> Result<TranslationStore<'_>, HubError> {
        self.store().ok_or(HubError::NoRootDirectory)
    }

    fn structure(&mut self) -> Result<StructureManager<'_>, HubError> {
        let format = self.format();
        let files = self.files.as_ref().ok_or(HubError::NoRootDirectory)?;
        Ok(StructureManager::new(files, &mut self.index, &self.matcher, format))
    }

    /// Real languages in ascending order.
    #[must_use]
    pub fn languages(&self) -> Vec<String> {
        self.index.languages().iter().cloned().collect()
    }

    /// Namespaces in ascending order.
    #[must_use]
    pub fn namespaces(&self) -> Vec<String> {
        self.index.namespaces().iter().cloned().collect()
    }

    /// See [`StructureManager::create_language`].
    pub fn create_language(&mut self, code: &str) -> Result<OpReport, HubError> {
        self.structure()?.create_language(code)
    }

    /// See [`StructureManager::create_namespace`].
    pub fn create_namespace(&mut self, name: &str) -> Result<OpReport, HubError> {
        self.structure()?.create_namespace(name)
    }

    /// See [`StructureManager::delete_language`].
    pub fn delete_language(&mut self, code: &str) -> Result<(), HubError> {
        self.structure()?.delete_language(code)
    }

    /// See [`StructureManager::delete_namespace`].
    pub fn delete_namespace(&mut self, name: &str) -> Result<OpReport, HubError> {
        self.structure()?.delete_namespace(name)
    }

    /// See [`StructureManager::rename_language`].
    pub fn rename_language(&mut self, old: &str, new: &str) -> Result<(), HubError> {
        self.structure()?.rename_language(old, new)
    }

    /// See [`StructureManager::rename_namespace`].
    pub fn rename_namespace(&mut self, old: &str, new: &str) -> Result<OpReport, HubError> {
        self.structure()?.rename_namespace(old, new)
    }

    /// Translations of one file; empty when unknown, missing or invalid.
    #[must_use]
    pub fn get_translations(&self, language: &str, namespace: &str) -> TranslationMap {
        self.store().map_or_else(TranslationMap::new, |store| {
            store.get(&self.language_ref(language), &normalize_namespace(namespace))
        })
    }

    /// Saves one file and clears its modification marks.
    ///
    /// See [`TranslationStore::save`].
    pub fn save_translations(
        &mut self,
        language: &str,
        namespace: &str,
        data: &TranslationMap,
    ) -> Result<(), HubError> {
        let namespace = normalize_namespace(namespace);
        self.require_store()?.save(&self.language_ref(language), &namespace, data)?;
        self.modified.clear_file(language, &namespace);
        Ok(())
    }

    /// Whether a file is missing, valid or unreadable.
    ///
    /// # Errors
    /// `NoRootDirectory` when no root is open.
    pub fn file_status(&self, language: &str, namespace: &str) -> Result<FileStatus, HubError> {
        let namespace = normalize_namespace(namespace);
        Ok(self.require_store()?.status(&self.language_ref(language), &namespace))
    }

    fn keys(&self) -> Result<KeyOperations<'_>, HubError> {
        self.require_store().map(KeyOperations::new)
    }

    /// See [`KeyOperations::add_key`].
    pub fn add_key(
        &mut self,
        namespace: &str,
        key: &str,
        default: &str,
    ) -> Result<OpReport, HubError> {
        self.keys()?.add_key(&normalize_namespace(namespace), key, default)
    }

    /// See [`KeyOperations::delete_key`].
    pub fn delete_key(&mut self, namespace: &str, key: &str) -> Result<OpReport, HubError> {
        self.keys()?.delete_key(&normalize_namespace(namespace), key)
    }

    /// See [`KeyOperations::rename_key`].
    pub fn rename_key(
        &mut self,
        namespace: &str,
        old: &str,
        new: &str,
    ) -> Result<OpReport, HubError> {
        self.keys()?.rename_key(&normalize_namespace(namespace), old, new)
    }

    /// See [`KeyOperations::move_keys`].
    pub fn move_keys<I, S>(
        &mut self,
        from: &str,
        to: &str,
        keys: I,
        strategy: ConflictStrategy,
    ) -> Result<MoveOutcome, HubError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.keys()?.move_keys(&normalize_namespace(from), &normalize_namespace(to), keys, strategy)
    }

    /// Synchronizes every namespace; see [`SchemaSynchronizer::synchronize_all`].
    pub fn synchronize_keys(&mut self) -> BTreeMap<String, usize> {
        self.store()
            .map(|store| SchemaSynchronizer::new(store).synchronize_all())
            .unwrap_or_default()
    }

    /// Synchronizes one namespace across every language.
    pub fn synchronize_namespace(&mut self, namespace: &str) -> usize {
        let namespace = normalize_namespace(namespace);
        self.store()
            .map(|store| {
                let sync = SchemaSynchronizer::new(store);
                sync.synchronize_namespace(&namespace, self.index.languages())
            })
            .unwrap_or_default()
    }

    fn progress_calculator(&self) -> Option<ProgressCalculator<'_>> {
        self.store().map(ProgressCalculator::new)
    }

    #[must_use]
    pub fn progress(&self, language: &str, namespace: &str) -> Progress {
        self.progress_calculator()
            .map(|calculator| calculator.progress(language, &normalize_namespace(namespace)))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn language_progress(&self, language: &str) -> Progress {
        self.progress_calculator()
            .map(|calculator| calculator.language_progress(language))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn namespace_progress(&self, namespace: &str) -> BTreeMap<String, Progress> {
        self.progress_calculator()
            .map(|calculator| calculator.namespace_progress(&normalize_namespace(namespace)))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn all_progress(&self) -> BTreeMap<String, BTreeMap<String, Progress>> {
        self.progress_calculator().map(|calculator| calculator.all_progress()).unwrap_or_default()
    }

    #[must_use]
    pub fn missing_translations(&self) -> Vec<MissingTranslation> {
        self.progress_calculator()
            .map(|calculator| calculator.missing_translations())
            .unwrap_or_default()
    }

    /// See [`SearchEngine::search`].
    #[must_use]
    pub fn search(&self, query: &str, case_sensitive: bool) -> SearchResults {
        self.store()
            .map(|store| SearchEngine::new(store).search(query, case_sensitive))
            .unwrap_or_default()
    }

    /// See [`ExportPackager::export`].
    ///
    /// # Errors
    /// `NoRootDirectory` when no root is open, otherwise as for the packager.
    pub fn export(
        &self,
        languages: impl IntoIterator<Item = impl AsRef<str>>,
        namespaces: impl IntoIterator<Item = impl AsRef<str>>,
        include_schema: bool,
        output: Option<&Path>,
    ) -> Result<PathBuf, HubError> {
        let namespaces = namespaces.into_iter().map(|ns| normalize_namespace(ns.as_ref()));
        let packager = ExportPackager::new(self.require_store()?);
        packager.export(languages, namespaces, include_schema, output)
    }

    pub fn mark_modified(&mut self, language: &str, namespace: &str, key: &str) {
        self.modified.mark(language, &normalize_namespace(namespace), key);
    }

    #[must_use]
    pub fn is_modified(&self, language: &str, namespace: &str, key: &str) -> bool {
        self.modified.contains(language, &normalize_namespace(namespace), key)
    }

    pub fn clear_modified(&mut self) {
        self.modified.clear();
    }

    #[must_use]
    pub const fn modified_entries(&self) -> &ModifiedSet {
        &self.modified
    }
}
