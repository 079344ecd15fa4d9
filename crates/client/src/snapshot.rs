//! Pre-mutation state of the one entity a pending mutation touches.

use crate::store::{EntityStore, Stored};

/// Captured by the optimistic apply, consumed by commit (dropped) or rollback
/// ([`MutationSnapshot::restore`]). Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationSnapshot<T: Stored> {
    /// A speculative entry was added. `displaced` holds the local entry it
    /// overwrote, if the id was already present.
    Created {
        id: T::Id,
        displaced: Option<(usize, T)>,
    },
    /// The entry was overwritten by a merged patch.
    Updated { prior: T },
    /// The entry was removed from `position`.
    Deleted { prior: T, position: usize },
}

impl<T: Stored> MutationSnapshot<T> {
    /// Optimistically add `value`, remembering what it replaced.
    pub fn create(store: &mut EntityStore, value: T) -> Self {
        let id = value.id().clone();
        let displaced = store.insert(value);
        Self::Created { id, displaced }
    }

    /// Optimistically replace the entry for `id` with `merge(prior)`.
    ///
    /// Returns `None`, leaving the store untouched, when `id` is not present.
    pub fn update(store: &mut EntityStore, id: &T::Id, merge: impl FnOnce(&T) -> T) -> Option<Self> {
        let prior = store.get::<T>(id)?.clone();
        store.replace(id, Some(merge(&prior)));
        Some(Self::Updated { prior })
    }

    /// Optimistically remove the entry for `id`.
    ///
    /// Returns `None`, leaving the store untouched, when `id` is not present.
    pub fn delete(store: &mut EntityStore, id: &T::Id) -> Option<Self> {
        let position = store.position::<T>(id)?;
        let prior = store.replace::<T>(id, None)?;
        Some(Self::Deleted { prior, position })
    }

    pub fn id(&self) -> &T::Id {
        match self {
            Self::Created { id, .. } => id,
            Self::Updated { prior } | Self::Deleted { prior, .. } => prior.id(),
        }
    }

    /// Undo the optimistic change.
    ///
    /// An update whose entity has meanwhile been removed by another mutation stays
    /// removed; every other case puts the captured value back in its slot.
    ///
    /// Snapshots capture local state, not server state: when an update and a delete
    /// of the same id overlap and both fail, the delete puts back the update's
    /// optimistic value.
    pub fn restore(self, store: &mut EntityStore) {
        match self {
            Self::Created { id, displaced: None } => {
                store.replace::<T>(&id, None);
            }
            Self::Created {
                displaced: Some((position, prior)),
                ..
            }
            | Self::Deleted { prior, position } => restore_at(store, position, prior),
            Self::Updated { prior } => {
                if store.get::<T>(prior.id()).is_some() {
                    store.replace(&prior.id().clone(), Some(prior));
                }
            }
        }
    }
}

fn restore_at<T: Stored>(store: &mut EntityStore, position: usize, prior: T) {
    let id = prior.id().clone();
    if store.get::<T>(&id).is_some() {
        store.replace(&id, Some(prior));
    } else {
        store.insert_at(position, prior);
    }
}
