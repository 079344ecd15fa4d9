//! Authoritative directory storage abstractions.

pub mod in_memory;

use std::sync::Arc;

use thiserror::Error;

use huddle_core::{CategoryId, DomainError, GroupId};
use huddle_directory::{
    AttendeeGroup, CategoryPatch, CategoryWithGroups, EntityKind, GroupPatch, NewCategory,
    NewGroup,
};

pub use in_memory::InMemoryDirectory;

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{kind} `{id}` not found")]
    NotFound { kind: EntityKind, id: String },

    #[error("{kind} `{id}` already exists")]
    Conflict { kind: EntityKind, id: String },

    /// A category referenced a group the store does not hold.
    #[error("unknown attendee group `{0}`")]
    UnknownGroup(GroupId),

    #[error("validation failed: {0}")]
    Validation(String),

    /// Internal lock poisoning.
    #[error("repository state is poisoned")]
    Poisoned,
}

impl RepositoryError {
    pub fn not_found(kind: EntityKind, id: impl core::fmt::Display) -> Self {
        Self::NotFound { kind, id: id.to_string() }
    }

    pub fn conflict(kind: EntityKind, id: impl core::fmt::Display) -> Self {
        Self::Conflict { kind, id: id.to_string() }
    }
}

impl From<DomainError> for RepositoryError {
    fn from(err: DomainError) -> Self {
        // Input validation is the only domain failure that reaches the repository.
        match err {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => Self::Validation(msg),
            other => Self::Validation(other.to_string()),
        }
    }
}

/// The authoritative store for attendee groups and product categories.
///
/// Implementations own referential integrity: every category reference must name
/// an existing group, and deleting a group removes it from every category.
pub trait DirectoryRepository: Send + Sync {
    fn list_groups(&self) -> RepositoryResult<Vec<AttendeeGroup>>;
    fn create_group(&self, new: NewGroup) -> RepositoryResult<AttendeeGroup>;
    fn update_group(&self, id: &GroupId, patch: GroupPatch) -> RepositoryResult<AttendeeGroup>;
    fn delete_group(&self, id: &GroupId) -> RepositoryResult<()>;

    fn list_categories(&self) -> RepositoryResult<Vec<CategoryWithGroups>>;
    fn create_category(&self, new: NewCategory) -> RepositoryResult<CategoryWithGroups>;
    fn update_category(
        &self,
        id: &CategoryId,
        patch: CategoryPatch,
    ) -> RepositoryResult<CategoryWithGroups>;
    fn delete_category(&self, id: &CategoryId) -> RepositoryResult<()>;
}

impl<S> DirectoryRepository for Arc<S>
where
    S: DirectoryRepository + ?Sized,
{
    fn list_groups(&self) -> RepositoryResult<Vec<AttendeeGroup>> {
        (**self).list_groups()
    }

    fn create_group(&self, new: NewGroup) -> RepositoryResult<AttendeeGroup> {
        (**self).create_group(new)
    }

    fn update_group(&self, id: &GroupId, patch: GroupPatch) -> RepositoryResult<AttendeeGroup> {
        (**self).update_group(id, patch)
    }

    fn delete_group(&self, id: &GroupId) -> RepositoryResult<()> {
        (**self).delete_group(id)
    }

    fn list_categories(&self) -> RepositoryResult<Vec<CategoryWithGroups>> {
        (**self).list_categories()
    }

    fn create_category(&self, new: NewCategory) -> RepositoryResult<CategoryWithGroups> {
        (**self).create_category(new)
    }

    fn update_category(
        &self,
        id: &CategoryId,
        patch: CategoryPatch,
    ) -> RepositoryResult<CategoryWithGroups> {
        (**self).update_category(id, patch)
    }

    fn delete_category(&self, id: &CategoryId) -> RepositoryResult<()> {
        (**self).delete_category(id)
    }
}
