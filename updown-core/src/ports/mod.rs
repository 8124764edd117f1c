//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The migration
//! engine depends only on these traits, not on a concrete database driver.

mod repository;

pub use repository::Repository;
