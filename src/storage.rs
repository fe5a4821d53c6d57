//! Translation file storage.
/// Raw file primitives
mod file_store;
/// Index-aware translation CRUD
mod translation_store;

pub use file_store::{
    FileStore,
    FileStoreError,
    parse_translation_json,
    render_translation_json,
};
pub use translation_store::TranslationStore;
