use std::path::PathBuf;

use thiserror::Error;

use crate::config::{
    ConfigError,
    MatcherError,
};
use crate::storage::FileStoreError;
use crate::types::EntityKind;

/// Errors returned by translation management operations.
///
/// `File`, `Io` and `Zip` report filesystem failures; every other variant is raised
/// before anything on disk is touched.
#[derive(Error, Debug)]
pub enum HubError {
    /// No root directory has been opened
    #[error("No root directory is configured")]
    NoRootDirectory,
    /// The path given as root is not a directory
    #[error("Not a directory: {}", .0.display())]
    InvalidRoot(PathBuf),
    /// Unknown language, namespace or key
    #[error("Unknown {kind} '{name}'")]
    NotFound { kind: EntityKind, name: String },
    /// The target identifier already exists
    #[error("The {kind} '{name}' already exists")]
    Conflict { kind: EntityKind, name: String },
    /// The identifier is the schema directory name
    #[error("'{0}' is reserved for the schema directory")]
    Reserved(String),
    /// The identifier cannot be used as a file or directory name
    #[error("Invalid {kind} name '{name}'")]
    InvalidName { kind: EntityKind, name: String },
    /// The arguments cannot describe a meaningful operation
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// A single-step filesystem operation failed
    #[error(transparent)]
    File(#[from] FileStoreError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Writing the export archive failed
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
    /// Settings could not be loaded or are invalid
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Matcher(#[from] MatcherError),
}

impl HubError {
    pub(crate) fn not_found(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::NotFound { kind, name: name.into() }
    }

    pub(crate) fn conflict(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::Conflict { kind, name: name.into() }
    }
}
