//! Raw file I/O for translation files.
//!
//! Every translation file lives at `<root>/<language>/<namespace>`. This module knows the
//! on-disk format and nothing about which languages or namespaces exist.

use std::fs;
use std::io;
use std::path::{
    Path,
    PathBuf,
};

use serde_json::Value;
use thiserror::Error;

use crate::types::{
    JsonFormat,
    LanguageRef,
    TranslationMap,
};

/// Errors raised by a single file operation.
#[derive(Error, Debug)]
pub enum FileStoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid translation file {}: {message}", path.display())]
    Corrupt { path: PathBuf, message: String },

    #[error("Failed to serialize {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl FileStoreError {
    /// Path of the file the operation failed on.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } | Self::Corrupt { path, .. } | Self::Serialize { path, .. } => {
                path
            }
        }
    }

    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io { path: path.to_path_buf(), source }
    }
}

/// File primitives rooted at one translation directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStore {
    root: PathBuf,
    schema_dir_name: String,
}

impl FileStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, schema_dir_name: impl Into<String>) -> Self {
        Self { root: root.into(), schema_dir_name: schema_dir_name.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn schema_dir_name(&self) -> &str {
        &self.schema_dir_name
    }

    pub(crate) fn set_schema_dir_name(&mut self, name: impl Into<String>) {
        self.schema_dir_name = name.into();
    }

    /// Directory of a language.
    #[must_use]
    pub fn language_dir(&self, language: &LanguageRef) -> PathBuf {
        self.root.join(language.dir_name(&self.schema_dir_name))
    }

    /// Path of the file for `(language, namespace)`.
    #[must_use]
    pub fn path(&self, language: &LanguageRef, namespace: &str) -> PathBuf {
        self.language_dir(language).join(namespace)
    }

    /// Reads a translation file.
    ///
    /// A missing or invalid file reads as an empty map. Invalid files are logged; use
    /// [`Self::read_checked`] to tell them apart.
    #[must_use]
    pub fn read(&self, language: &LanguageRef, namespace: &str) -> TranslationMap {
        match self.read_checked(language, namespace) {
            Ok(data) => data.unwrap_or_default(),
            Err(error) => {
                tracing::warn!(%error, "Treating unreadable translation file as empty");
                TranslationMap::new()
            }
        }
    }

    /// Reads a translation file, distinguishing a missing file from an invalid one.
    ///
    /// # Returns
    /// - `Ok(Some(map))`: the file was parsed
    /// - `Ok(None)`: the file does not exist
    /// - `Err(Corrupt)`: not UTF-8, not JSON, or not a JSON object
    /// - `Err(Io)`: any other read failure
    pub fn read_checked(
        &self,
        language: &LanguageRef,
        namespace: &str,
    ) -> Result<Option<TranslationMap>, FileStoreError> {
        let path = self.path(language, namespace);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                return Err(FileStoreError::Corrupt { path, message: e.to_string() });
            }
            Err(e) => return Err(FileStoreError::io(&path, e)),
        };

        parse_translation_json(&content)
            .map(Some)
            .map_err(|message| FileStoreError::Corrupt { path, message })
    }

    /// Writes a translation file, creating the language directory if needed.
    pub fn write(
        &self,
        language: &LanguageRef,
        namespace: &str,
        data: &TranslationMap,
        format: JsonFormat,
    ) -> Result<(), FileStoreError> {
        let path = self.path(language, namespace);
        let text = render_translation_json(data, format)
            .map_err(|source| FileStoreError::Serialize { path: path.clone(), source })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| FileStoreError::io(parent, e))?;
        }
        fs::write(&path, text).map_err(|e| FileStoreError::io(&path, e))?;

        tracing::debug!(path = %path.display(), keys = data.len(), "Wrote translation file");
        Ok(())
    }

    #[must_use]
    pub fn exists(&self, language: &LanguageRef, namespace: &str) -> bool {
        self.path(language, namespace).is_file()
    }

    /// Deletes a translation file. Deleting a missing file succeeds.
    pub fn delete(&self, language: &LanguageRef, namespace: &str) -> Result<(), FileStoreError> {
        let path = self.path(language, namespace);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FileStoreError::io(&path, e)),
        }
    }

    /// Renames a namespace file within one language. A missing source succeeds.
    pub fn rename(
        &self,
        language: &LanguageRef,
        old_namespace: &str,
        new_namespace: &str,
    ) -> Result<(), FileStoreError> {
        let old_path = self.path(language, old_namespace);
        if !old_path.exists() {
            return Ok(());
        }
        let new_path = self.path(language, new_namespace);
        fs::rename(&old_path, &new_path).map_err(|e| FileStoreError::io(&old_path, e))
    }

    pub fn create_language_dir(&self, language: &LanguageRef) -> Result<(), FileStoreError> {
        let dir = self.language_dir(language);
        fs::create_dir_all(&dir).map_err(|e| FileStoreError::io(&dir, e))
    }

    /// Removes a language directory and everything in it.
    pub fn remove_language_dir(&self, language: &LanguageRef) -> Result<(), FileStoreError> {
        let dir = self.language_dir(language);
        match fs::remove_dir_all(&dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FileStoreError::io(&dir, e)),
        }
    }

    pub fn rename_language_dir(
        &self,
        old: &LanguageRef,
        new: &LanguageRef,
    ) -> Result<(), FileStoreError> {
        let old_dir = self.language_dir(old);
        fs::rename(&old_dir, self.language_dir(new)).map_err(|e| FileStoreError::io(&old_dir, e))
    }
}

/// Parses the text of a translation file.
///
/// Non-string values are kept as their JSON text (`42` → `"42"`).
///
/// # Errors
/// Returns a message when the text is not JSON or the top level is not an object.
pub fn parse_translation_json(text: &str) -> Result<TranslationMap, String> {
    let value: Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
    let Value::Object(object) = value else {
        return Err("top-level value is not an object".to_string());
    };

    Ok(object
        .into_iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (key, text)
        })
        .collect())
}

/// Serializes a translation map.
///
/// Pretty output uses a 2-space indent, keeps non-ASCII characters literal, and ends
/// with a blank line. Compressed output has no added whitespace.
pub fn render_translation_json(
    data: &TranslationMap,
    format: JsonFormat,
) -> Result<String, serde_json::Error> {
    match format {
        JsonFormat::Pretty => {
            let mut text = serde_json::to_string_pretty(data)?;
            text.push_str("\n\n");
            Ok(text)
        }
        JsonFormat::Compressed => serde_json::to_string(data),
    }
}
