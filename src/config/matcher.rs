//! Matcher deciding which directories under the root are language directories.

use std::path::Path;

use globset::{
    Glob,
    GlobSet,
    GlobSetBuilder,
};

use super::HubSettings;

#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidExcludePattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Failed to build glob set: {0}")]
    GlobSetBuild(#[from] globset::Error),
}

/// Matches directory names against `excludePatterns`.
#[derive(Debug, Clone)]
pub struct DirectoryMatcher {
    exclude_set: GlobSet,
    schema_dir_name: String,
}

impl DirectoryMatcher {
    /// Creates a new matcher from settings.
    pub fn new(settings: &HubSettings) -> Result<Self, MatcherError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &settings.exclude_patterns {
            let glob = Glob::new(pattern).map_err(|source| MatcherError::InvalidExcludePattern {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }

        Ok(Self {
            exclude_set: builder.build()?,
            schema_dir_name: settings.schema_dir_name.clone(),
        })
    }

    /// Returns true if a directory with this name is a real language.
    ///
    /// The schema directory and excluded directories are not languages.
    #[must_use]
    pub fn is_language_dir(&self, dir_name: &str) -> bool {
        dir_name != self.schema_dir_name && !self.exclude_set.is_match(Path::new(dir_name))
    }
}
