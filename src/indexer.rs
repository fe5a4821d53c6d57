//! In-memory index of the languages and namespaces under a root.
/// Directory scan
mod structure;

pub use structure::StructureIndex;
