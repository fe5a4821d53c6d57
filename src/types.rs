//! Core types used throughout the project.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::HubError;
use crate::storage::FileStoreError;

/// Key → value map of one translation file.
///
/// A `BTreeMap` keeps keys in ascending order, so every serialized file is sorted.
pub type TranslationMap = BTreeMap<String, String>;

/// File extension every namespace carries.
pub const NAMESPACE_SUFFIX: &str = ".json";

/// A language directory under the root.
///
/// The schema directory is a distinct variant rather than a language whose name happens
/// to match the configured schema directory name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LanguageRef {
    /// A real translation target such as `en-US`.
    Real(String),
    /// The pseudo-language holding the union of all keys.
    Schema,
}

impl LanguageRef {
    /// Creates a reference to a real language.
    #[must_use]
    pub fn real(code: impl Into<String>) -> Self {
        Self::Real(code.into())
    }

    /// Maps a directory name to a language reference.
    #[must_use]
    pub fn parse(name: &str, schema_dir_name: &str) -> Self {
        if name == schema_dir_name { Self::Schema } else { Self::Real(name.to_string()) }
    }

    /// Directory name of this language under the root.
    #[must_use]
    pub fn dir_name<'a>(&'a self, schema_dir_name: &'a str) -> &'a str {
        match self {
            Self::Real(code) => code,
            Self::Schema => schema_dir_name,
        }
    }

    #[must_use]
    pub const fn is_schema(&self) -> bool {
        matches!(self, Self::Schema)
    }

    /// Language code of a real language.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Real(code) => Some(code),
            Self::Schema => None,
        }
    }
}

impl fmt::Display for LanguageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real(code) => f.write_str(code),
            Self::Schema => f.write_str("<schema>"),
        }
    }
}

/// Appends the `.json` suffix when absent.
///
/// # Examples
/// ```
/// use translatehub::types::normalize_namespace;
///
/// assert_eq!(normalize_namespace("app.home"), "app.home.json");
/// assert_eq!(normalize_namespace("common.json"), "common.json");
/// ```
#[must_use]
pub fn normalize_namespace(name: &str) -> String {
    if name.ends_with(NAMESPACE_SUFFIX) {
        name.to_string()
    } else {
        format!("{name}{NAMESPACE_SUFFIX}")
    }
}

/// Namespace name without the `.json` suffix (`app.home.json` → `app.home`).
#[must_use]
pub fn namespace_stem(namespace: &str) -> &str {
    namespace.strip_suffix(NAMESPACE_SUFFIX).unwrap_or(namespace)
}

/// What kind of entity an error or report refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Language,
    Namespace,
    Key,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Language => "language",
            Self::Namespace => "namespace",
            Self::Key => "key",
        })
    }
}

/// Rejects identifiers that cannot be used as a single path component.
///
/// # Errors
/// `HubError::InvalidName` for empty names, `.`/`..`, or names containing a path separator.
pub fn validate_identifier(kind: EntityKind, name: &str) -> Result<(), HubError> {
    let invalid = name.trim().is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\');
    if invalid {
        return Err(HubError::InvalidName { kind, name: name.to_string() });
    }
    Ok(())
}

/// Output formatting of translation files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// 2-space indent followed by a blank line.
    #[default]
    Pretty,
    /// Minified.
    Compressed,
}

impl JsonFormat {
    #[must_use]
    pub const fn from_compress_flag(compress: bool) -> Self {
        if compress { Self::Compressed } else { Self::Pretty }
    }
}

/// One (language, namespace) file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileRef {
    pub language: LanguageRef,
    pub namespace: String,
}

impl FileRef {
    #[must_use]
    pub fn new(language: LanguageRef, namespace: impl Into<String>) -> Self {
        Self { language, namespace: namespace.into() }
    }
}

impl fmt::Display for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.language, self.namespace)
    }
}

/// A file operation that failed inside a multi-file operation.
#[derive(Debug)]
pub struct FileFailure {
    pub file: FileRef,
    pub error: FileStoreError,
}

/// Outcome of an operation touching several files.
///
/// Files are written independently; a failure does not roll back the files already
/// written, it is recorded in `failed`.
#[derive(Debug, Default)]
pub struct OpReport {
    pub succeeded: Vec<FileRef>,
    pub failed: Vec<FileFailure>,
}

impl OpReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the result of writing `file`.
    pub fn record(&mut self, file: FileRef, result: Result<(), FileStoreError>) {
        match result {
            Ok(()) => self.succeeded.push(file),
            Err(error) => {
                tracing::warn!(%file, %error, "File operation failed");
                self.failed.push(FileFailure { file, error });
            }
        }
    }

    /// `true` when no file operation failed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// `true` when nothing was attempted at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.succeeded.is_empty() && self.failed.is_empty()
    }

    /// Paths of the failed files, for reporting.
    #[must_use]
    pub fn failed_paths(&self) -> Vec<PathBuf> {
        self.failed.iter().map(|f| f.error.path().to_path_buf()).collect()
    }
}

/// How `move_keys` treats a key that already exists in the target namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictStrategy {
    /// Leave both namespaces untouched for that key.
    #[default]
    Skip,
    /// Overwrite the target value with the source value.
    Replace,
    /// Store under `{source-stem}_{key}` unless that key also exists.
    KeepBoth,
}

impl FromStr for ConflictStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skip" => Ok(Self::Skip),
            "replace" => Ok(Self::Replace),
            "keep_both" => Ok(Self::KeepBoth),
            other => Err(format!("unknown conflict strategy '{other}'")),
        }
    }
}

/// Result of moving keys between namespaces.
#[derive(Debug, Default)]
pub struct MoveOutcome {
    /// Whether any key was moved in any language.
    pub moved: bool,
    pub report: OpReport,
}

/// Translated / total key counts.
///
/// `total == 0` means the percentage is undefined, not 0%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
}

impl Progress {
    #[must_use]
    pub const fn new(done: usize, total: usize) -> Self {
        Self { done, total }
    }

    /// Counts the non-blank values of a map.
    #[must_use]
    pub fn of_map(map: &TranslationMap) -> Self {
        let done = map.values().filter(|v| !v.trim().is_empty()).count();
        Self { done, total: map.len() }
    }

    /// Whole-number percentage, rounded down. `None` when there are no keys.
    #[must_use]
    pub const fn percent(&self) -> Option<usize> {
        if self.total == 0 { None } else { Some(self.done * 100 / self.total) }
    }

    #[must_use]
    pub const fn missing(&self) -> usize {
        self.total - self.done
    }
}

impl std::ops::Add for Progress {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self { done: self.done + rhs.done, total: self.total + rhs.total }
    }
}

impl std::iter::Sum for Progress {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, p| acc + p)
    }
}

/// A key whose value is blank.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MissingTranslation {
    pub language: String,
    pub namespace: String,
    pub key: String,
}

/// On-disk state of one translation file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    Missing,
    /// Parsed successfully with this many keys.
    Valid(usize),
    /// Exists but cannot be used; reads treat it as empty.
    Corrupt(String),
}
