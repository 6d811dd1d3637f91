//! Semantic model tests: general types, scopes, imports, reference
//! resolution, diagnostics and incremental updates.

pub mod tests_generals;
pub mod tests_imports;
pub mod tests_invalidation;
pub mod tests_resolution;
pub mod tests_scope;
pub mod tests_stdlib;
