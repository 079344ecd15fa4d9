//! Local, ordered projection of both directory collections.
//!
//! A plain data holder: no validation, no network, no notifications. Categories are
//! stored with their raw group references; the join is derived on read by
//! [`crate::resolver`].

use indexmap::IndexMap;

use huddle_core::Entity;
use huddle_directory::{AttendeeGroup, EntityKind, ProductCategory};

/// Identifier-keyed sequence that keeps insertion order.
#[derive(Debug, Clone)]
pub struct Collection<T: Entity> {
    items: IndexMap<T::Id, T>,
}

impl<T: Entity> Default for Collection<T> {
    fn default() -> Self {
        Self { items: IndexMap::new() }
    }
}

impl<T: Entity + Clone> Collection<T> {
    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.items.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn position(&self, id: &T::Id) -> Option<usize> {
        self.items.get_index_of(id)
    }

    /// Append `value`. An entry with the same id keeps its slot and is returned
    /// together with that slot.
    pub fn insert(&mut self, value: T) -> Option<(usize, T)> {
        let (index, displaced) = self.items.insert_full(value.id().clone(), value);
        displaced.map(|prior| (index, prior))
    }

    /// Put `value` at `index` (clamped to the current length).
    pub fn insert_at(&mut self, index: usize, value: T) {
        let index = index.min(self.items.len());
        self.items.shift_insert(index, value.id().clone(), value);
    }

    /// Overwrite in place (appending when absent), or remove when `value` is `None`.
    pub fn replace(&mut self, id: &T::Id, value: Option<T>) -> Option<T> {
        match value {
            Some(value) => {
                debug_assert_eq!(value.id(), id);
                self.items.insert(id.clone(), value)
            }
            None => self.items.shift_remove(id),
        }
    }

    pub fn reset(&mut self, values: impl IntoIterator<Item = T>) {
        self.items = values.into_iter().map(|v| (v.id().clone(), v)).collect();
    }
}

/// Entity types the store holds, with the collection each lives in.
pub trait Stored: Entity + Clone + Send + 'static {
    const KIND: EntityKind;

    fn collection(store: &EntityStore) -> &Collection<Self>;
    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self>;
}

impl Stored for AttendeeGroup {
    const KIND: EntityKind = EntityKind::Group;

    fn collection(store: &EntityStore) -> &Collection<Self> {
        &store.groups
    }

    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self> {
        &mut store.groups
    }
}

impl Stored for ProductCategory {
    const KIND: EntityKind = EntityKind::Category;

    fn collection(store: &EntityStore) -> &Collection<Self> {
        &store.categories
    }

    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self> {
        &mut store.categories
    }
}

#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    groups: Collection<AttendeeGroup>,
    categories: Collection<ProductCategory>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<T: Stored>(&self, id: &T::Id) -> Option<&T> {
        T::collection(self).get(id)
    }

    pub fn list<T: Stored>(&self) -> Vec<T> {
        T::collection(self).iter().cloned().collect()
    }

    pub fn iter<T: Stored>(&self) -> impl Iterator<Item = &T> {
        T::collection(self).iter()
    }

    pub fn position<T: Stored>(&self, id: &T::Id) -> Option<usize> {
        T::collection(self).position(id)
    }

    pub fn insert<T: Stored>(&mut self, value: T) -> Option<(usize, T)> {
        T::collection_mut(self).insert(value)
    }

    pub fn insert_at<T: Stored>(&mut self, index: usize, value: T) {
        T::collection_mut(self).insert_at(index, value)
    }

    pub fn replace<T: Stored>(&mut self, id: &T::Id, value: Option<T>) -> Option<T> {
        T::collection_mut(self).replace(id, value)
    }

    pub fn reset<T: Stored>(&mut self, values: impl IntoIterator<Item = T>) {
        T::collection_mut(self).reset(values)
    }
}
