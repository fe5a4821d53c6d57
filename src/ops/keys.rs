//! Key changes applied across every language of a namespace.
//!
//! Files are written one by one without an intermediate synchronization, so a partially
//! applied change is reported as such instead of being patched up halfway.

use crate::error::HubError;
use crate::ops::SchemaSynchronizer;
use crate::storage::TranslationStore;
use crate::types::{
    ConflictStrategy,
    EntityKind,
    FileRef,
    LanguageRef,
    MoveOutcome,
    OpReport,
    TranslationMap,
    namespace_stem,
};

/// Add, delete, rename and move keys in every language and in the schema.
#[derive(Debug, Clone, Copy)]
pub struct KeyOperations<'a> {
    store: TranslationStore<'a>,
}

impl<'a> KeyOperations<'a> {
    #[must_use]
    pub const fn new(store: TranslationStore<'a>) -> Self {
        Self { store }
    }

    fn require_namespace(&self, namespace: &str) -> Result<(), HubError> {
        if self.store.index().has_namespace(namespace) {
            Ok(())
        } else {
            Err(HubError::not_found(EntityKind::Namespace, namespace))
        }
    }

    /// Writes `data` back and records the outcome.
    fn write_into(
        &self,
        report: &mut OpReport,
        language: LanguageRef,
        namespace: &str,
        data: &TranslationMap,
    ) {
        let result = self.store.write(&language, namespace, data);
        report.record(FileRef::new(language, namespace), result);
    }

    /// Adds `key` to every language that does not have it yet.
    ///
    /// Real languages get `default`, the schema gets an empty value. Existing values are
    /// never overwritten.
    ///
    /// # Errors
    /// - `NotFound` when the namespace is unknown
    /// - `InvalidName` when `key` is blank
    pub fn add_key(&self, namespace: &str, key: &str, default: &str) -> Result<OpReport, HubError> {
        self.require_namespace(namespace)?;
        if key.trim().is_empty() {
            return Err(HubError::InvalidName { kind: EntityKind::Key, name: key.to_string() });
        }

        let mut report = OpReport::new();
        for language in self.store.index().languages_with_schema() {
            let mut data = self.store.read(&language, namespace);
            if data.contains_key(key) {
                continue;
            }
            let value = if language.is_schema() { "" } else { default };
            data.insert(key.to_string(), value.to_string());
            self.write_into(&mut report, language, namespace, &data);
        }

        tracing::info!(namespace, key, files = report.succeeded.len(), "Added key");
        Ok(report)
    }

    /// Removes `key` from every language and from the schema.
    ///
    /// Deleting a key that exists nowhere succeeds with an empty report.
    ///
    /// # Errors
    /// `NotFound` when the namespace is unknown.
    pub fn delete_key(&self, namespace: &str, key: &str) -> Result<OpReport, HubError> {
        self.require_namespace(namespace)?;

        let mut report = OpReport::new();
        for language in self.store.index().languages_with_schema() {
            let mut data = self.store.read(&language, namespace);
            if data.remove(key).is_some() {
                self.write_into(&mut report, language, namespace, &data);
            }
        }

        tracing::info!(namespace, key, files = report.succeeded.len(), "Deleted key");
        Ok(report)
    }

    /// Renames `old` to `new` wherever `old` exists, keeping each language's value.
    ///
    /// # Errors
    /// - `NotFound` when the namespace is unknown or `old` exists in no language
    /// - `InvalidName` when `new` is blank
    /// - `Conflict` when `new` equals `old` or already exists in a real language
    pub fn rename_key(&self, namespace: &str, old: &str, new: &str) -> Result<OpReport, HubError> {
        self.require_namespace(namespace)?;
        if new.trim().is_empty() {
            return Err(HubError::InvalidName { kind: EntityKind::Key, name: new.to_string() });
        }
        if old == new {
            return Err(HubError::conflict(EntityKind::Key, new));
        }

        let index = self.store.index();
        let taken = index
            .real_languages()
            .any(|language| self.store.read(&language, namespace).contains_key(new));
        if taken {
            return Err(HubError::conflict(EntityKind::Key, new));
        }

        let mut report = OpReport::new();
        for language in index.languages_with_schema() {
            let mut data = self.store.read(&language, namespace);
            if let Some(value) = data.remove(old) {
                data.insert(new.to_string(), value);
                self.write_into(&mut report, language, namespace, &data);
            }
        }

        if report.is_empty() {
            return Err(HubError::not_found(EntityKind::Key, old));
        }
        tracing::info!(namespace, old, new, files = report.succeeded.len(), "Renamed key");
        Ok(report)
    }

    /// Moves `keys` from namespace `from` to namespace `to` in every language.
    ///
    /// A key already present in `to` is handled by `strategy`:
    /// - `Skip`: left alone in both namespaces
    /// - `Replace`: the value in `to` is overwritten
    /// - `KeepBoth`: stored as `{from-stem}_{key}`, skipped if that key exists too
    ///
    /// Per language the target file is written first. When that write fails the source file
    /// is left as it was, so a failure can duplicate keys but never lose them. Both namespaces
    /// and the schema are synchronized afterwards.
    ///
    /// # Errors
    /// - `NotFound` when either namespace is unknown
    /// - `InvalidArgument` when `from` and `to` are the same namespace
    pub fn move_keys<I, S>(
        &self,
        from: &str,
        to: &str,
        keys: I,
        strategy: ConflictStrategy,
    ) -> Result<MoveOutcome, HubError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.require_namespace(from)?;
        self.require_namespace(to)?;
        if from == to {
            return Err(HubError::InvalidArgument(format!(
                "cannot move keys from '{from}' into itself"
            )));
        }
        let keys: Vec<String> = keys.into_iter().map(|key| key.as_ref().to_string()).collect();
        if keys.is_empty() {
            return Ok(MoveOutcome::default());
        }

        let stem = namespace_stem(from);
        let index = self.store.index();
        let mut outcome = MoveOutcome::default();

        for language in index.languages_with_schema() {
            let mut source = self.store.read(&language, from);
            let mut target = self.store.read(&language, to);
            if !move_between(&mut source, &mut target, &keys, stem, strategy) {
                continue;
            }
            outcome.moved = true;
            // The source keeps its keys unless the target holds them.
            let target_written = self.store.write(&language, to, &target);
            let keep_source = target_written.is_err();
            outcome.report.record(FileRef::new(language.clone(), to), target_written);
            if !keep_source {
                self.write_into(&mut outcome.report, language, from, &source);
            }
        }

        let sync = SchemaSynchronizer::new(self.store);
        sync.synchronize_namespace(from, index.languages());
        sync.synchronize_namespace(to, index.languages());
        sync.synchronize_schema();

        tracing::info!(from, to, moved = outcome.moved, "Moved keys");
        Ok(outcome)
    }
}

/// Applies one language's share of a move. Returns whether anything moved.
fn move_between(
    source: &mut TranslationMap,
    target: &mut TranslationMap,
    keys: &[String],
    stem: &str,
    strategy: ConflictStrategy,
) -> bool {
    let mut moved = false;
    for key in keys {
        let Some(value) = source.get(key) else {
            continue;
        };
        let target_key = if target.contains_key(key) {
            match strategy {
                ConflictStrategy::Skip => continue,
                ConflictStrategy::Replace => key.clone(),
                ConflictStrategy::KeepBoth => {
                    let renamed = format!("{stem}_{key}");
                    if target.contains_key(&renamed) {
                        continue;
                    }
                    renamed
                }
            }
        } else {
            key.clone()
        };
        target.insert(target_key, value.clone());
        source.remove(key);
        moved = true;
    }
    moved
}
