//! Counts translated keys per language and namespace.

use std::collections::BTreeMap;

use crate::storage::TranslationStore;
use crate::types::{
    LanguageRef,
    MissingTranslation,
    Progress,
};

/// Translation progress over the real languages.
///
/// A key counts as translated when its value is not blank. The schema is never included.
#[derive(Debug, Clone, Copy)]
pub struct ProgressCalculator<'a> {
    store: TranslationStore<'a>,
}

impl<'a> ProgressCalculator<'a> {
    #[must_use]
    pub const fn new(store: TranslationStore<'a>) -> Self {
        Self { store }
    }

    /// Progress of one file. Unknown combinations report `(0, 0)`.
    #[must_use]
    pub fn progress(&self, language: &str, namespace: &str) -> Progress {
        Progress::of_map(&self.store.get(&LanguageRef::real(language), namespace))
    }

    /// Progress of a language summed over every namespace.
    #[must_use]
    pub fn language_progress(&self, language: &str) -> Progress {
        self.store
            .index()
            .namespaces()
            .iter()
            .map(|namespace| self.progress(language, namespace))
            .sum()
    }

    /// Progress of every language for one namespace.
    #[must_use]
    pub fn namespace_progress(&self, namespace: &str) -> BTreeMap<String, Progress> {
        let index = self.store.index();
        if !index.has_namespace(namespace) {
            return BTreeMap::new();
        }
        index
            .languages()
            .iter()
            .map(|language| (language.clone(), self.progress(language, namespace)))
            .collect()
    }

    /// Language → namespace → progress for the whole root.
    #[must_use]
    pub fn all_progress(&self) -> BTreeMap<String, BTreeMap<String, Progress>> {
        let index = self.store.index();
        index
            .languages()
            .iter()
            .map(|language| {
                let per_namespace = index
                    .namespaces()
                    .iter()
                    .map(|namespace| (namespace.clone(), self.progress(language, namespace)))
                    .collect();
                (language.clone(), per_namespace)
            })
            .collect()
    }

    /// Every key with a blank value, ordered by language, namespace and key.
    #[must_use]
    pub fn missing_translations(&self) -> Vec<MissingTranslation> {
        let index = self.store.index();
        let mut missing = Vec::new();
        for language in index.languages() {
            for namespace in index.namespaces() {
                let data = self.store.get(&LanguageRef::real(language), namespace);
                missing.extend(data.into_iter().filter(|(_, value)| value.trim().is_empty()).map(
                    |(key, _)| MissingTranslation {
                        language: language.clone(),
                        namespace: namespace.clone(),
                        key,
                    },
                ));
            }
        }
        missing
    }
}
