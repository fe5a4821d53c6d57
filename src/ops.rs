//! Operations that change the structure or the keys of a translation root.
/// Structural changes to languages and namespaces
mod structure;
/// Key-level changes across languages
mod keys;
/// Key propagation between the schema and the languages
mod schema;

pub use keys::KeyOperations;
pub use schema::SchemaSynchronizer;
pub use structure::StructureManager;
