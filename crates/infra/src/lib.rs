//! Infrastructure layer: authoritative storage for the attendee directory.
//!
//! The storage engine itself is pluggable behind [`DirectoryRepository`]; the
//! in-memory implementation backs the admin API in dev/test and the client's
//! in-memory gateway.

pub mod repository;
pub mod seed;

pub use repository::{DirectoryRepository, InMemoryDirectory, RepositoryError, RepositoryResult};
