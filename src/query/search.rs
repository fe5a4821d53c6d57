//! Substring search over keys and values.

use std::collections::BTreeMap;

use crate::storage::TranslationStore;
use crate::types::{
    LanguageRef,
    TranslationMap,
};

/// Language → namespace → matching entries.
pub type SearchResults = BTreeMap<String, BTreeMap<String, TranslationMap>>;

/// Searches every real language and namespace.
#[derive(Debug, Clone, Copy)]
pub struct SearchEngine<'a> {
    store: TranslationStore<'a>,
}

impl<'a> SearchEngine<'a> {
    #[must_use]
    pub const fn new(store: TranslationStore<'a>) -> Self {
        Self { store }
    }

    /// Entries whose key or value contains `query`.
    ///
    /// An empty query matches nothing. Languages and namespaces without a match are left
    /// out of the result.
    #[must_use]
    pub fn search(&self, query: &str, case_sensitive: bool) -> SearchResults {
        if query.is_empty() {
            return SearchResults::new();
        }
        let matcher = QueryMatcher::new(query, case_sensitive);
        let index = self.store.index();

        let mut results = SearchResults::new();
        for language in index.languages() {
            let per_namespace: BTreeMap<String, TranslationMap> = index
                .namespaces()
                .iter()
                .filter_map(|namespace| {
                    let matches: TranslationMap = self
                        .store
                        .get(&LanguageRef::real(language), namespace)
                        .into_iter()
                        .filter(|(key, value)| matcher.matches(key) || matcher.matches(value))
                        .collect();
                    (!matches.is_empty()).then(|| (namespace.clone(), matches))
                })
                .collect();
            if !per_namespace.is_empty() {
                results.insert(language.clone(), per_namespace);
            }
        }

        tracing::debug!(query, case_sensitive, languages = results.len(), "Searched translations");
        results
    }
}

struct QueryMatcher {
    needle: String,
    case_sensitive: bool,
}

impl QueryMatcher {
    fn new(query: &str, case_sensitive: bool) -> Self {
        let needle = if case_sensitive { query.to_string() } else { query.to_lowercase() };
        Self { needle, case_sensitive }
    }

    fn matches(&self, text: &str) -> bool {
        if self.case_sensitive {
            text.contains(&self.needle)
        } else {
            text.to_lowercase().contains(&self.needle)
        }
    }
}
