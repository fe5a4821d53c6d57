//! Keeps every language and the schema holding the same key set per namespace.

use std::collections::{
    BTreeMap,
    BTreeSet,
};

use crate::storage::TranslationStore;
use crate::types::{
    LanguageRef,
    TranslationMap,
};

/// Propagates keys between the schema and the real languages.
///
/// Synchronization only ever adds keys with an empty value. It never removes a key or
/// changes an existing value, so running it twice in a row changes nothing the second time.
#[derive(Debug, Clone, Copy)]
pub struct SchemaSynchronizer<'a> {
    store: TranslationStore<'a>,
}

impl<'a> SchemaSynchronizer<'a> {
    #[must_use]
    pub const fn new(store: TranslationStore<'a>) -> Self {
        Self { store }
    }

    /// Brings `namespace` to the same key set in `languages` and the schema.
    ///
    /// The key set is the union of the keys found in the schema file and in every listed
    /// language. Files are rewritten only when keys were added to them.
    ///
    /// # Arguments
    /// * `namespace` - namespace file name (`app.json`)
    /// * `languages` - real language codes to synchronize
    ///
    /// # Returns
    /// Number of keys inserted into real languages. Insertions into the schema are not
    /// counted, and a file whose write failed counts as unchanged.
    pub fn synchronize_namespace<I, S>(&self, namespace: &str, languages: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.synchronize_with(namespace, languages, None)
    }

    /// Propagates the keys of a file that was just saved.
    ///
    /// Every other language and the schema receive the keys of `data` they lack. The saved
    /// file itself is not rewritten, so keys it dropped stay dropped.
    ///
    /// # Returns
    /// Number of keys inserted into the other real languages.
    pub fn propagate_saved(&self, namespace: &str, saved: &str, data: &TranslationMap) -> usize {
        let others = self
            .store
            .index()
            .languages()
            .iter()
            .filter(|code| code.as_str() != saved);
        self.synchronize_with(namespace, others, Some(data))
    }

    fn synchronize_with<I, S>(
        &self,
        namespace: &str,
        languages: I,
        saved: Option<&TranslationMap>,
    ) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut schema = self.store.read(&LanguageRef::Schema, namespace);
        let mut language_maps: Vec<(LanguageRef, TranslationMap)> = languages
            .into_iter()
            .map(|code| {
                let language = LanguageRef::real(code.as_ref());
                let data = self.store.read(&language, namespace);
                (language, data)
            })
            .collect();

        let all_keys: BTreeSet<String> = schema
            .keys()
            .chain(language_maps.iter().flat_map(|(_, data)| data.keys()))
            .chain(saved.into_iter().flat_map(TranslationMap::keys))
            .cloned()
            .collect();

        let mut inserted = 0;
        for (language, data) in &mut language_maps {
            let added = fill_missing(data, &all_keys);
            if added == 0 {
                continue;
            }
            match self.store.write(language, namespace, data) {
                Ok(()) => inserted += added,
                Err(error) => {
                    tracing::warn!(%language, namespace, %error, "Synchronization write failed");
                }
            }
        }

        if fill_missing(&mut schema, &all_keys) > 0
            && let Err(error) = self.store.write(&LanguageRef::Schema, namespace, &schema)
        {
            tracing::warn!(namespace, %error, "Schema synchronization write failed");
        }

        if inserted > 0 {
            tracing::debug!(namespace, inserted, "Synchronized namespace");
        }
        inserted
    }

    /// Synchronizes every known namespace across every known language.
    ///
    /// # Returns
    /// Insertion count per namespace, without the namespaces that needed no change.
    #[must_use]
    pub fn synchronize_all(&self) -> BTreeMap<String, usize> {
        let index = self.store.index();
        index
            .namespaces()
            .iter()
            .filter_map(|namespace| {
                let inserted = self.synchronize_namespace(namespace, index.languages());
                (inserted > 0).then(|| (namespace.clone(), inserted))
            })
            .collect()
    }

    /// Adds every key found in a real language to the schema.
    ///
    /// Language files are left alone. Returns the number of keys added to the schema.
    pub fn synchronize_schema(&self) -> usize {
        let index = self.store.index();
        let mut added_total = 0;

        for namespace in index.namespaces() {
            let keys: BTreeSet<String> = index
                .real_languages()
                .flat_map(|language| self.store.read(&language, namespace).into_keys())
                .collect();

            let mut schema = self.store.read(&LanguageRef::Schema, namespace);
            let added = fill_missing(&mut schema, &keys);
            if added == 0 {
                continue;
            }
            match self.store.write(&LanguageRef::Schema, namespace, &schema) {
                Ok(()) => added_total += added,
                Err(error) => {
                    tracing::warn!(namespace, %error, "Schema synchronization write failed");
                }
            }
        }
        added_total
    }
}

/// Inserts every key of `keys` absent from `data` with an empty value.
fn fill_missing(data: &mut TranslationMap, keys: &BTreeSet<String>) -> usize {
    let mut added = 0;
    for key in keys {
        if !data.contains_key(key) {
            data.insert(key.clone(), String::new());
            added += 1;
        }
    }
    added
}
