//! Settings for a translation root.
/// Settings file loader
mod loader;
/// Configuration manager
mod manager;
/// Language directory matcher
mod matcher;
/// Configuration types and settings
mod types;

pub use loader::SETTINGS_FILE_NAME;
pub use manager::ConfigManager;
pub use matcher::{
    DirectoryMatcher,
    MatcherError,
};
pub use types::{
    ConfigError,
    HubSettings,
    ValidationError,
};
