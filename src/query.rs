//! Read-only views over the translation data.
/// Translation progress and missing translations
mod progress;
/// Substring search over keys and values
mod search;

pub use progress::ProgressCalculator;
pub use search::{
    SearchEngine,
    SearchResults,
};
